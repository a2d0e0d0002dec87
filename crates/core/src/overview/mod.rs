//! Overview aggregator: coerces the server's summary into numeric figures.

mod overview_model;
mod overview_service;

pub use overview_model::*;
pub use overview_service::*;
