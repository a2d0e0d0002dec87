//! Balance snapshots and their service.

mod balances_model;
mod balances_service;

pub use balances_model::*;
pub use balances_service::*;
