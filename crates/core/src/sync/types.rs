//! Types for the sync orchestrator.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::cache::CacheError;
use crate::catalog::ResourceKind;
use crate::pagination::StopReason;

/// Errors that can occur while syncing.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Writing the fetched items failed; the table keeps its previous rows.
    #[error("cache error while syncing {kind}: {source}")]
    Cache {
        kind: ResourceKind,
        #[source]
        source: CacheError,
    },
}

impl SyncError {
    /// Resource whose sync failed.
    pub fn kind(&self) -> ResourceKind {
        match self {
            SyncError::Cache { kind, .. } => *kind,
        }
    }
}

/// Outcome of syncing one resource kind.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub kind: ResourceKind,
    /// Rows now in the cache table.
    pub synced: usize,
    pub pages_fetched: u32,
    /// True when the walk stopped on a failed fetch.
    pub partial: bool,
    pub stop_reason: StopReason,
    pub completed_at: DateTime<Utc>,
}
