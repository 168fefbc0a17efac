use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use super::{SyncError, SyncReport};
use crate::api::CatalogApi;
use crate::cache::CatalogCache;
use crate::catalog::ResourceKind;
use crate::pagination::PaginationWalker;

/// Copies remote collections into the local cache.
pub struct SyncOrchestrator {
    walker: PaginationWalker,
    cache: Arc<dyn CatalogCache>,
}

impl SyncOrchestrator {
    pub fn new(api: Arc<dyn CatalogApi>, cache: Arc<dyn CatalogCache>) -> Self {
        Self {
            walker: PaginationWalker::new(api),
            cache,
        }
    }

    /// Walk `kind` and replace its cache table with the result.
    ///
    /// A walk cut short by a failed fetch still replaces the table with what
    /// was received; the report is flagged `partial`.
    pub async fn sync_resource(&self, kind: ResourceKind) -> Result<SyncReport, SyncError> {
        info!("Syncing {}...", kind.plural());

        let outcome = self.walker.walk(kind).await;
        let partial = outcome.stop_reason.is_failure();
        if partial {
            warn!(
                "{} walk stopped early after {} pages, caching {} items",
                kind,
                outcome.pages_fetched,
                outcome.items.len()
            );
        }

        let synced = self
            .cache
            .replace_all(kind, &outcome.items)
            .map_err(|source| {
                error!("Failed to store {}: {}", kind.plural(), source);
                SyncError::Cache { kind, source }
            })?;

        info!("Synced {} {}", synced, kind.plural());

        Ok(SyncReport {
            kind,
            synced,
            pages_fetched: outcome.pages_fetched,
            partial,
            stop_reason: outcome.stop_reason,
            completed_at: Utc::now(),
        })
    }

    /// Sync videos, playlists then channels, stopping at the first error.
    ///
    /// Resources synced before the error keep their new contents.
    pub async fn sync_all(&self) -> Result<Vec<SyncReport>, SyncError> {
        let mut reports = Vec::with_capacity(ResourceKind::ALL.len());
        for kind in ResourceKind::ALL {
            reports.push(self.sync_resource(kind).await?);
        }
        Ok(reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, SqliteCache};
    use crate::catalog::CatalogItem;
    use crate::api::ApiConfig;
    use crate::testing::{fixtures, MockCatalogApi};

    /// Cache that refuses to write one resource kind.
    struct FailingCache {
        inner: SqliteCache,
        fail_on: ResourceKind,
    }

    impl CatalogCache for FailingCache {
        fn clear(&self, kind: ResourceKind) -> Result<(), CacheError> {
            self.inner.clear(kind)
        }
        fn upsert(&self, item: &CatalogItem) -> Result<(), CacheError> {
            self.inner.upsert(item)
        }
        fn replace_all(&self, kind: ResourceKind, items: &[CatalogItem]) -> Result<usize, CacheError> {
            if kind == self.fail_on {
                return Err(CacheError::Database("disk I/O error".to_string()));
            }
            self.inner.replace_all(kind, items)
        }
        fn count(&self, kind: ResourceKind) -> Result<u64, CacheError> {
            self.inner.count(kind)
        }
        fn set_api_config(&self, config: &ApiConfig) -> Result<(), CacheError> {
            self.inner.set_api_config(config)
        }
        fn api_config(&self) -> Result<Option<ApiConfig>, CacheError> {
            self.inner.api_config()
        }
    }

    #[tokio::test]
    async fn test_sync_resource_fills_table() {
        let api = Arc::new(MockCatalogApi::new());
        api.set_items(ResourceKind::Video, fixtures::videos(60)).await;
        let cache = Arc::new(SqliteCache::in_memory().unwrap());

        let sync = SyncOrchestrator::new(api.clone(), cache.clone());
        let report = sync.sync_resource(ResourceKind::Video).await.unwrap();

        assert_eq!(report.synced, 60);
        assert_eq!(report.pages_fetched, 2);
        assert!(!report.partial);
        assert_eq!(cache.count(ResourceKind::Video).unwrap(), 60);
    }

    #[tokio::test]
    async fn test_sync_resource_replaces_stale_rows() {
        let api = Arc::new(MockCatalogApi::new());
        let cache = Arc::new(SqliteCache::in_memory().unwrap());
        cache.upsert(&fixtures::video_item("gone", "Deleted upstream")).unwrap();
        api.set_items(ResourceKind::Video, fixtures::videos(3)).await;

        let sync = SyncOrchestrator::new(api, cache.clone());
        sync.sync_resource(ResourceKind::Video).await.unwrap();

        assert_eq!(cache.count(ResourceKind::Video).unwrap(), 3);
        assert!(cache.get_video("gone").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_partial_walk_is_flagged() {
        let api = Arc::new(MockCatalogApi::new());
        api.set_items(ResourceKind::Channel, fixtures::channels(120)).await;
        api.fail_on_page(ResourceKind::Channel, 2).await;
        let cache = Arc::new(SqliteCache::in_memory().unwrap());

        let sync = SyncOrchestrator::new(api, cache.clone());
        let report = sync.sync_resource(ResourceKind::Channel).await.unwrap();

        assert!(report.partial);
        assert_eq!(report.synced, 50);
        assert_eq!(report.pages_fetched, 2);
        assert_eq!(cache.count(ResourceKind::Channel).unwrap(), 50);
    }

    #[tokio::test]
    async fn test_sync_all_runs_in_order() {
        let api = Arc::new(MockCatalogApi::new());
        api.set_items(ResourceKind::Video, fixtures::videos(2)).await;
        api.set_items(ResourceKind::Playlist, fixtures::playlists(3)).await;
        api.set_items(ResourceKind::Channel, fixtures::channels(4)).await;
        let cache = Arc::new(SqliteCache::in_memory().unwrap());

        let sync = SyncOrchestrator::new(api.clone(), cache);
        let reports = sync.sync_all().await.unwrap();

        let kinds: Vec<_> = reports.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, ResourceKind::ALL.to_vec());
        let synced: Vec<_> = reports.iter().map(|r| r.synced).collect();
        assert_eq!(synced, vec![2, 3, 4]);

        let fetch_order: Vec<_> = api.fetches().await.iter().map(|f| f.kind).collect();
        assert_eq!(fetch_order, ResourceKind::ALL.to_vec());
    }

    #[tokio::test]
    async fn test_sync_all_stops_at_first_error() {
        let api = Arc::new(MockCatalogApi::new());
        api.set_items(ResourceKind::Video, fixtures::videos(2)).await;
        api.set_items(ResourceKind::Playlist, fixtures::playlists(2)).await;
        api.set_items(ResourceKind::Channel, fixtures::channels(2)).await;
        let cache = Arc::new(FailingCache {
            inner: SqliteCache::in_memory().unwrap(),
            fail_on: ResourceKind::Playlist,
        });

        let sync = SyncOrchestrator::new(api.clone(), cache.clone());
        let err = sync.sync_all().await.unwrap_err();

        assert_eq!(err.kind(), ResourceKind::Playlist);
        // Videos stay synced, channels were never attempted
        assert_eq!(cache.count(ResourceKind::Video).unwrap(), 2);
        assert_eq!(api.fetch_count(ResourceKind::Channel).await, 0);
    }
}
