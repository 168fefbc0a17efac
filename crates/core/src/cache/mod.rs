//! Local cache - a SQLite mirror of the remote catalog.
//!
//! One table per resource kind plus a single-row `config` table holding the
//! API credentials. Tables are only ever written by full replacement during a
//! sync; nested JSON fields are stored as text.

mod report;
mod sqlite;
mod types;

pub use sqlite::SqliteCache;
pub use types::*;

use crate::api::ApiConfig;
use crate::catalog::{CatalogItem, ResourceKind};

/// Trait for catalog cache storage.
pub trait CatalogCache: Send + Sync {
    /// Delete every row of the table for `kind`.
    fn clear(&self, kind: ResourceKind) -> Result<(), CacheError>;

    /// Insert an item, replacing any row with the same id.
    fn upsert(&self, item: &CatalogItem) -> Result<(), CacheError>;

    /// Replace the whole table for `kind` with `items`.
    ///
    /// Runs in a single transaction: readers see either the old or the new
    /// snapshot. Returns the number of rows written.
    fn replace_all(&self, kind: ResourceKind, items: &[CatalogItem]) -> Result<usize, CacheError>;

    /// Number of rows cached for `kind`.
    fn count(&self, kind: ResourceKind) -> Result<u64, CacheError>;

    /// Store the API credentials, replacing any previous ones.
    fn set_api_config(&self, config: &ApiConfig) -> Result<(), CacheError>;

    /// The stored API credentials, if any.
    fn api_config(&self) -> Result<Option<ApiConfig>, CacheError>;
}
