//! Domain core of the fintrack client: models, service traits, the offline
//! queue and its reconciler. Storage and HTTP live in sibling crates.

pub mod balances;
pub mod errors;
pub mod gateway;
pub mod overview;
pub mod session;
pub mod sync;
pub mod transactions;
pub mod utils;

#[cfg(test)]
mod test_support;

pub use errors::{Error, Result};
