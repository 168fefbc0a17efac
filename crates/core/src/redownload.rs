//! Bulk redownload of cached videos.
//!
//! Candidates are selected from the local cache; each one is then queued on
//! the remote service with its own request, paced by a [`TokenBucket`].

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::api::CatalogApi;
use crate::cache::{CacheError, SqliteCache, VideoRef};
use crate::rate_limit::TokenBucket;

/// Default pacing: one request every half second.
pub const DEFAULT_REQUESTS_PER_MINUTE: u32 = 120;

/// Which cached videos to redownload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedownloadTarget {
    /// Videos having a stream of exactly this height.
    Resolution(u32),
    /// Videos that are inactive or have no media file.
    Failed,
}

impl fmt::Display for RedownloadTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RedownloadTarget::Resolution(height) => write!(f, "{}p", height),
            RedownloadTarget::Failed => f.write_str("failed"),
        }
    }
}

/// Totals for a redownload run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RedownloadSummary {
    pub queued: usize,
    pub failed: usize,
    pub total: usize,
}

/// Queues forced redownloads one video at a time.
pub struct Redownloader {
    api: Arc<dyn CatalogApi>,
    requests_per_minute: u32,
}

impl Redownloader {
    pub fn new(api: Arc<dyn CatalogApi>, requests_per_minute: u32) -> Self {
        Self {
            api,
            requests_per_minute,
        }
    }

    /// Select the cached videos matching `target`.
    pub fn candidates(
        cache: &SqliteCache,
        target: RedownloadTarget,
    ) -> Result<Vec<VideoRef>, CacheError> {
        let videos = match target {
            RedownloadTarget::Resolution(height) => cache.videos_with_resolution(height)?,
            RedownloadTarget::Failed => cache.failed_videos()?,
        };
        info!("Found {} videos for {} redownload", videos.len(), target);
        Ok(videos)
    }

    /// Request a redownload of every video, sequentially.
    ///
    /// `on_item` is called with the 1-based position before each request.
    /// A failed request is counted and the run moves on.
    pub async fn run<F>(&self, videos: &[VideoRef], mut on_item: F) -> RedownloadSummary
    where
        F: FnMut(usize, usize, &VideoRef),
    {
        let total = videos.len();
        let mut pacer = TokenBucket::per_minute(self.requests_per_minute);
        let mut summary = RedownloadSummary {
            total,
            ..Default::default()
        };

        for (i, video) in videos.iter().enumerate() {
            pacer.acquire().await;
            on_item(i + 1, total, video);

            if self.api.trigger_redownload(&video.youtube_id).await {
                summary.queued += 1;
            } else {
                warn!("Redownload failed for {} ({})", video.title, video.youtube_id);
                summary.failed += 1;
            }
        }

        info!(
            "Redownload finished: {} queued, {} failed, {} total",
            summary.queued, summary.failed, summary.total
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CatalogCache;
    use crate::catalog::CatalogItem;
    use crate::testing::{fixtures, MockCatalogApi};

    fn video_ref(id: &str) -> VideoRef {
        VideoRef {
            youtube_id: id.to_string(),
            title: format!("Title {}", id),
        }
    }

    #[test]
    fn test_candidates_by_target() {
        let cache = SqliteCache::in_memory().unwrap();
        let mut broken = fixtures::video_with_heights("broken", "Broken", &[720]);
        broken.active = Some(false);
        let items: [CatalogItem; 3] = [
            fixtures::video_with_heights("hd", "HD", &[720]).into(),
            fixtures::video_with_heights("fhd", "FHD", &[1080]).into(),
            broken.into(),
        ];
        for item in items {
            cache.upsert(&item).unwrap();
        }

        let by_height = Redownloader::candidates(&cache, RedownloadTarget::Resolution(720)).unwrap();
        assert_eq!(by_height.len(), 2);

        let failed = Redownloader::candidates(&cache, RedownloadTarget::Failed).unwrap();
        assert_eq!(
            failed,
            vec![VideoRef {
                youtube_id: "broken".to_string(),
                title: "Broken".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_run_counts_successes_and_failures() {
        let api = Arc::new(MockCatalogApi::new());
        api.fail_redownload("b").await;
        let redownloader = Redownloader::new(api.clone(), 6000);

        let videos = vec![video_ref("a"), video_ref("b"), video_ref("c")];
        let mut seen = Vec::new();
        let summary = redownloader
            .run(&videos, |i, total, v| seen.push((i, total, v.youtube_id.clone())))
            .await;

        assert_eq!(
            summary,
            RedownloadSummary {
                queued: 2,
                failed: 1,
                total: 3
            }
        );
        assert_eq!(api.redownloads().await, vec!["a", "b", "c"]);
        assert_eq!(
            seen,
            vec![
                (1, 3, "a".to_string()),
                (2, 3, "b".to_string()),
                (3, 3, "c".to_string())
            ]
        );
    }

    #[tokio::test]
    async fn test_run_with_no_videos() {
        let api = Arc::new(MockCatalogApi::new());
        let redownloader = Redownloader::new(api.clone(), DEFAULT_REQUESTS_PER_MINUTE);

        let summary = redownloader.run(&[], |_, _, _| {}).await;

        assert_eq!(summary, RedownloadSummary::default());
        assert!(api.redownloads().await.is_empty());
    }

    #[tokio::test]
    async fn test_run_is_paced() {
        let api = Arc::new(MockCatalogApi::new());
        // 600 rpm: 100ms between requests after the first
        let redownloader = Redownloader::new(api, 600);
        let videos = vec![video_ref("a"), video_ref("b"), video_ref("c")];

        let start = tokio::time::Instant::now();
        redownloader.run(&videos, |_, _, _| {}).await;

        assert!(start.elapsed() >= std::time::Duration::from_millis(180));
    }

    #[test]
    fn test_target_display() {
        assert_eq!(RedownloadTarget::Resolution(720).to_string(), "720p");
        assert_eq!(RedownloadTarget::Failed.to_string(), "failed");
    }
}
