pub mod api;
pub mod cache;
pub mod catalog;
pub mod config;
pub mod pagination;
pub mod rate_limit;
pub mod redownload;
pub mod report;
pub mod sync;
pub mod testing;

pub use api::{ApiConfig, ApiError, CatalogApi, TubeArchivistClient};
pub use cache::{
    CacheError, CacheTable, CatalogCache, ChannelHit, ChannelStats, PlaylistHit, PlaylistStats,
    SqliteCache, VideoHit, VideoRef, VideoStats,
};
pub use catalog::{CatalogItem, Channel, PageResult, Playlist, ResourceKind, Video};
pub use config::{load_settings, load_settings_from_str, validate_settings, ConfigError, Settings};
pub use pagination::{PaginationWalker, StopReason, WalkOutcome, WALK_PAGE_SIZE};
pub use redownload::{RedownloadSummary, RedownloadTarget, Redownloader};
pub use sync::{SyncError, SyncOrchestrator, SyncReport};
