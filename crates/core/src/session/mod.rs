//! Session credential, its persistence contract and the sign-in service.

mod session_model;
mod session_service;
mod session_traits;

pub use session_model::*;
pub use session_service::*;
pub use session_traits::*;
