//! Sync orchestrator: mirror remote collections into the cache.
//!
//! Each resource is walked in full and then written with a single
//! replace-all, so a sync never leaves a table half written. `sync_all` is
//! sequential and not atomic across resources.

mod orchestrator;
mod types;

pub use orchestrator::SyncOrchestrator;
pub use types::{SyncError, SyncReport};
