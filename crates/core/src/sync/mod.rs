//! Offline queue models, the local store contract and the drain cycle.

mod connectivity;
mod local_store_model;
mod local_store_traits;
mod sync_reconciler;

pub use connectivity::*;
pub use local_store_model::*;
pub use local_store_traits::*;
pub use sync_reconciler::*;
