//! Testing utilities and mock implementations.
//!
//! Provides a scripted [`CatalogApi`](crate::api::CatalogApi) so the walker,
//! the sync orchestrator and the redownloader can be exercised without a
//! Tube Archivist instance.
//!
//! # Example
//!
//! ```rust,ignore
//! use tubearchive_core::testing::{fixtures, MockCatalogApi};
//!
//! let api = MockCatalogApi::new();
//! api.set_items(ResourceKind::Video, fixtures::videos(60)).await;
//!
//! // Page 1 holds 50 videos, page 2 the remaining 10, last_page = 2.
//! let page = api.fetch_page(ResourceKind::Video, 2, 50).await?;
//! assert_eq!(page.items.len(), 10);
//! ```

mod mock_catalog_api;

pub use mock_catalog_api::{MockCatalogApi, PaginationStyle, RecordedFetch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use serde_json::{json, Value};

    use crate::catalog::{CatalogItem, Channel, Playlist, Video};

    /// Create a test video with reasonable defaults.
    pub fn video(youtube_id: &str, title: &str) -> Video {
        Video {
            youtube_id: youtube_id.to_string(),
            title: title.to_string(),
            description: Some(format!("Description of {}", title)),
            published: Some("2024-01-15".to_string()),
            date_downloaded: Some(1_705_312_800),
            active: Some(true),
            vid_last_refresh: Some("2024-02-01".to_string()),
            vid_thumb_url: Some(format!("/cache/videos/{}.jpg", youtube_id)),
            vid_type: Some("videos".to_string()),
            media_url: Some(format!("/media/{}.mp4", youtube_id)),
            media_size: Some(50 * 1024 * 1024),
            comment_count: Some(3),
            category: json!(["Education"]),
            tags: json!(["rust", "tutorial"]),
            channel: json!({"channel_id": "UC-test", "channel_name": "Test Channel"}),
            player: json!({"watched": false, "duration": 600}),
            playlist: json!([]),
            sponsorblock: Value::Null,
            stats: json!({"view_count": 1000, "like_count": 50}),
            streams: json!([
                {"type": "video", "index": 0, "codec": "vp9", "width": 1920, "height": 1080},
                {"type": "audio", "index": 1, "codec": "opus"}
            ]),
            subtitles: json!([]),
            index: Some("ta_video".to_string()),
            score: Some(1.0),
        }
    }

    /// Create a test video whose video streams have the given heights.
    pub fn video_with_heights(youtube_id: &str, title: &str, heights: &[u32]) -> Video {
        let mut v = video(youtube_id, title);
        v.streams = Value::Array(heights.iter().map(|h| json!({"height": h})).collect());
        v
    }

    /// Create a test video as a catalog item.
    pub fn video_item(youtube_id: &str, title: &str) -> CatalogItem {
        CatalogItem::Video(video(youtube_id, title))
    }

    /// Create a test playlist.
    pub fn playlist(playlist_id: &str, name: &str, entries: usize) -> Playlist {
        Playlist {
            playlist_id: playlist_id.to_string(),
            playlist_name: name.to_string(),
            playlist_description: Some(format!("Playlist {}", name)),
            playlist_channel: Some("Test Channel".to_string()),
            playlist_channel_id: Some("UC-test".to_string()),
            playlist_thumbnail: None,
            playlist_last_refresh: Some("2024-02-01".to_string()),
            playlist_entries: Value::Array(
                (0..entries)
                    .map(|i| json!({"youtube_id": format!("{}-{}", playlist_id, i), "downloaded": true}))
                    .collect(),
            ),
            date_downloaded: Some(1_705_312_800),
            active: Some(true),
            index: None,
            score: None,
        }
    }

    /// Create a test channel.
    pub fn channel(channel_id: &str, name: &str) -> Channel {
        Channel {
            channel_id: channel_id.to_string(),
            channel_name: name.to_string(),
            channel_banner_url: None,
            channel_thumb_url: Some(format!("/cache/channels/{}.jpg", channel_id)),
            channel_description: Some(format!("The {} channel", name)),
            channel_last_refresh: Some("2024-02-01".to_string()),
            channel_subscribed: Some(true),
            channel_overwrites: json!({"download_format": "bestvideo[height<=720]"}),
            date_downloaded: Some(1_705_312_800),
            active: Some(true),
            index: None,
            score: None,
        }
    }

    /// `count` videos with ids `video-000`, `video-001`, ...
    pub fn videos(count: usize) -> Vec<CatalogItem> {
        (0..count)
            .map(|i| video_item(&format!("video-{:03}", i), &format!("Video {}", i)))
            .collect()
    }

    /// `count` playlists with ids `playlist-000`, ...
    pub fn playlists(count: usize) -> Vec<CatalogItem> {
        (0..count)
            .map(|i| CatalogItem::Playlist(playlist(&format!("playlist-{:03}", i), &format!("Playlist {}", i), 3)))
            .collect()
    }

    /// `count` channels with ids `channel-000`, ...
    pub fn channels(count: usize) -> Vec<CatalogItem> {
        (0..count)
            .map(|i| CatalogItem::Channel(channel(&format!("channel-{:03}", i), &format!("Channel {}", i))))
            .collect()
    }
}
