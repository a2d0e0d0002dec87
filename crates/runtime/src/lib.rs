//! Composition root of the fintrack client.
//!
//! Reads configuration, wires storage, gateway and services into a
//! [`ServiceContext`], and runs drain cycles when connectivity returns.

pub mod config;
pub mod context;
pub mod engine;

pub use config::RuntimeConfig;
pub use context::{ServiceContext, SyncRuntimeState};
pub use engine::{
    ensure_connectivity_listener_started, ensure_connectivity_listener_stopped,
    last_drain_report, notify_connectivity, pending_counts, run_drain_now,
};
