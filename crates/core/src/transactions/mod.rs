//! Transactions: server models, the offline queue record and the service.

mod transactions_model;
mod transactions_service;

pub use transactions_model::*;
pub use transactions_service::*;

pub(crate) use transactions_model::format_timestamp;
