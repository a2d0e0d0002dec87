//! Remote API envelope and gateway contract.

mod gateway_model;
mod gateway_traits;

pub use gateway_model::*;
pub use gateway_traits::*;
