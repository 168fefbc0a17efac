//! Read-only reporting queries over the cache.

use rusqlite::params;
use serde_json::Value;

use super::sqlite::{json_column, JsonDefault};
use super::{
    CacheError, ChannelHit, ChannelStats, PlaylistHit, PlaylistStats, SqliteCache, VideoHit,
    VideoRef, VideoStats,
};

const UNKNOWN_CHANNEL: &str = "Unknown Channel";

/// SQLite reads `LIMIT -1` as no limit.
fn sql_limit(limit: Option<u32>) -> i64 {
    limit.map(i64::from).unwrap_or(-1)
}

fn like_pattern(query: &str) -> String {
    format!("%{}%", query)
}

impl SqliteCache {
    pub fn video_stats(&self) -> Result<VideoStats, CacheError> {
        let conn = self.conn()?;

        let (total, active, inactive): (u64, u64, u64) = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN active = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN active = 0 THEN 1 ELSE 0 END), 0)
             FROM videos",
            [],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        let (total_size, avg_size): (Option<i64>, Option<f64>) = conn.query_row(
            "SELECT SUM(media_size), AVG(media_size) FROM videos
             WHERE media_size IS NOT NULL AND media_size > 0",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let latest_download: Option<i64> = conn.query_row(
            "SELECT MAX(date_downloaded) FROM videos WHERE date_downloaded IS NOT NULL",
            [],
            |row| row.get(0),
        )?;

        Ok(VideoStats {
            total,
            active,
            inactive,
            total_size_bytes: total_size.map(|s| s as u64),
            avg_size_bytes: avg_size.map(|a| a as u64),
            latest_download,
        })
    }

    pub fn channel_stats(&self) -> Result<ChannelStats, CacheError> {
        let conn = self.conn()?;
        let stats = conn.query_row(
            "SELECT COUNT(*),
                    COALESCE(SUM(CASE WHEN channel_subscribed = 1 THEN 1 ELSE 0 END), 0),
                    COALESCE(SUM(CASE WHEN active = 1 THEN 1 ELSE 0 END), 0)
             FROM channels",
            [],
            |row| {
                Ok(ChannelStats {
                    total: row.get(0)?,
                    subscribed: row.get(1)?,
                    active: row.get(2)?,
                })
            },
        )?;
        Ok(stats)
    }

    /// Playlist counts plus entry totals; playlists whose entry list is not
    /// a JSON array are left out of the entry figures.
    pub fn playlist_stats(&self) -> Result<PlaylistStats, CacheError> {
        let conn = self.conn()?;

        let (total, active): (u64, u64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(CASE WHEN active = 1 THEN 1 ELSE 0 END), 0)
             FROM playlists",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        let mut stmt =
            conn.prepare("SELECT playlist_entries FROM playlists WHERE playlist_entries IS NOT NULL")?;
        let entry_lists = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        let counts: Vec<u64> = entry_lists
            .into_iter()
            .filter_map(|raw| match json_column(raw, "playlist_entries", JsonDefault::Null) {
                Value::Array(entries) => Some(entries.len() as u64),
                _ => None,
            })
            .collect();

        let total_entries: u64 = counts.iter().sum();
        let avg_entries = if counts.is_empty() {
            None
        } else {
            Some(total_entries as f64 / counts.len() as f64)
        };

        Ok(PlaylistStats {
            total,
            active,
            total_entries,
            avg_entries,
        })
    }

    /// Videos whose title, description or tags contain `query`, by title.
    pub fn search_videos(&self, query: &str, limit: Option<u32>) -> Result<Vec<VideoHit>, CacheError> {
        let conn = self.conn()?;
        let pattern = like_pattern(query);
        let mut stmt = conn.prepare(
            "SELECT youtube_id, title, published, channel, tags FROM videos
             WHERE title LIKE ?1 OR description LIKE ?1 OR tags LIKE ?1
             ORDER BY title
             LIMIT ?2",
        )?;

        let hits = stmt
            .query_map(params![pattern, sql_limit(limit)], |row| {
                let channel = json_column(row.get(3)?, "channel", JsonDefault::Object);
                let tags = json_column(row.get(4)?, "tags", JsonDefault::Array);
                Ok(VideoHit {
                    youtube_id: row.get(0)?,
                    title: row.get(1)?,
                    published: row.get(2)?,
                    channel_name: channel
                        .get("channel_name")
                        .and_then(Value::as_str)
                        .unwrap_or(UNKNOWN_CHANNEL)
                        .to_string(),
                    tags: tags
                        .as_array()
                        .map(|tags| {
                            tags.iter()
                                .filter_map(Value::as_str)
                                .map(str::to_string)
                                .collect()
                        })
                        .unwrap_or_default(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    pub fn search_channels(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<ChannelHit>, CacheError> {
        let conn = self.conn()?;
        let pattern = like_pattern(query);
        let mut stmt = conn.prepare(
            "SELECT channel_id, channel_name, channel_description, channel_subscribed, active
             FROM channels
             WHERE channel_name LIKE ?1 OR channel_description LIKE ?1
             ORDER BY channel_name
             LIMIT ?2",
        )?;

        let hits = stmt
            .query_map(params![pattern, sql_limit(limit)], |row| {
                Ok(ChannelHit {
                    channel_id: row.get(0)?,
                    channel_name: row.get(1)?,
                    channel_description: row.get(2)?,
                    subscribed: row.get::<_, Option<bool>>(3)?.unwrap_or(false),
                    active: row.get::<_, Option<bool>>(4)?.unwrap_or(false),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    pub fn search_playlists(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<Vec<PlaylistHit>, CacheError> {
        let conn = self.conn()?;
        let pattern = like_pattern(query);
        let mut stmt = conn.prepare(
            "SELECT playlist_id, playlist_name, playlist_description, playlist_channel,
                    playlist_entries, active
             FROM playlists
             WHERE playlist_name LIKE ?1 OR playlist_description LIKE ?1
             ORDER BY playlist_name
             LIMIT ?2",
        )?;

        let hits = stmt
            .query_map(params![pattern, sql_limit(limit)], |row| {
                let entries = json_column(row.get(4)?, "playlist_entries", JsonDefault::Array);
                Ok(PlaylistHit {
                    playlist_id: row.get(0)?,
                    playlist_name: row.get(1)?,
                    playlist_description: row.get(2)?,
                    playlist_channel: row.get(3)?,
                    entry_count: entries.as_array().map(Vec::len).unwrap_or(0),
                    active: row.get::<_, Option<bool>>(5)?.unwrap_or(false),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(hits)
    }

    /// Videos with at least one stream of exactly `height` pixels.
    pub fn videos_with_resolution(&self, height: u32) -> Result<Vec<VideoRef>, CacheError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT youtube_id, title, streams FROM videos
             WHERE streams IS NOT NULL AND streams != ''",
        )?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let target = f64::from(height);
        let videos = rows
            .into_iter()
            .filter(|(_, _, streams)| {
                json_column(streams.clone(), "streams", JsonDefault::Array)
                    .as_array()
                    .is_some_and(|streams| {
                        streams
                            .iter()
                            .any(|s| s.get("height").and_then(Value::as_f64) == Some(target))
                    })
            })
            .map(|(youtube_id, title, _)| VideoRef { youtube_id, title })
            .collect();

        Ok(videos)
    }

    /// Videos that are inactive or have no media file.
    pub fn failed_videos(&self) -> Result<Vec<VideoRef>, CacheError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT youtube_id, title FROM videos
             WHERE active = 0 OR media_url IS NULL OR media_url = ''",
        )?;

        let videos = stmt
            .query_map([], |row| {
                Ok(VideoRef {
                    youtube_id: row.get(0)?,
                    title: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(videos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheTable, CatalogCache};
    use crate::catalog::{CatalogItem, ResourceKind};
    use crate::testing::fixtures;
    use serde_json::json;

    fn cache_with(items: Vec<CatalogItem>) -> SqliteCache {
        let cache = SqliteCache::in_memory().unwrap();
        for item in &items {
            cache.upsert(item).unwrap();
        }
        cache
    }

    #[test]
    fn test_video_stats_on_empty_cache() {
        let cache = SqliteCache::in_memory().unwrap();
        let stats = cache.video_stats().unwrap();
        assert_eq!(stats, VideoStats::default());
    }

    #[test]
    fn test_video_stats_sizes_and_activity() {
        let mut a = fixtures::video("a", "A");
        a.media_size = Some(100);
        a.date_downloaded = Some(10);
        let mut b = fixtures::video("b", "B");
        b.media_size = Some(300);
        b.active = Some(false);
        b.date_downloaded = Some(20);
        let mut c = fixtures::video("c", "C");
        c.media_size = None;
        c.date_downloaded = None;

        let cache = cache_with(vec![a.into(), b.into(), c.into()]);
        let stats = cache.video_stats().unwrap();

        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 2);
        assert_eq!(stats.inactive, 1);
        assert_eq!(stats.total_size_bytes, Some(400));
        assert_eq!(stats.avg_size_bytes, Some(200));
        assert_eq!(stats.latest_download, Some(20));
    }

    #[test]
    fn test_channel_stats() {
        let mut unsubscribed = fixtures::channel("UC2", "Two");
        unsubscribed.channel_subscribed = Some(false);
        unsubscribed.active = Some(false);
        let cache = cache_with(vec![fixtures::channel("UC1", "One").into(), unsubscribed.into()]);

        let stats = cache.channel_stats().unwrap();
        assert_eq!(
            stats,
            ChannelStats {
                total: 2,
                subscribed: 1,
                active: 1
            }
        );
    }

    #[test]
    fn test_playlist_stats_skips_unreadable_entries() {
        let mut broken = fixtures::playlist("PL3", "Broken", 0);
        broken.playlist_entries = json!({"not": "a list"});
        let cache = cache_with(vec![
            fixtures::playlist("PL1", "One", 2).into(),
            fixtures::playlist("PL2", "Two", 4).into(),
            broken.into(),
        ]);

        let stats = cache.playlist_stats().unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.active, 3);
        assert_eq!(stats.total_entries, 6);
        assert_eq!(stats.avg_entries, Some(3.0));
    }

    #[test]
    fn test_search_videos_matches_title_description_and_tags() {
        let mut tagged = fixtures::video("t", "Zebra facts");
        tagged.tags = json!(["cooking"]);
        tagged.description = None;
        let cache = cache_with(vec![
            fixtures::video_item("r", "Rust basics"),
            fixtures::video_item("p", "Python basics"),
            tagged.into(),
        ]);

        let by_title = cache.search_videos("rust", None).unwrap();
        // "rust" is also a fixture tag, so every default-tag video matches
        assert_eq!(by_title.len(), 2);
        assert_eq!(by_title[0].title, "Python basics");
        assert_eq!(by_title[1].title, "Rust basics");
        assert_eq!(by_title[0].channel_name, "Test Channel");

        let by_tag = cache.search_videos("cooking", None).unwrap();
        assert_eq!(by_tag.len(), 1);
        assert_eq!(by_tag[0].youtube_id, "t");
        assert_eq!(by_tag[0].tags, vec!["cooking"]);
    }

    #[test]
    fn test_search_videos_limit_and_unknown_channel() {
        let mut orphan = fixtures::video("o", "Orphan");
        orphan.channel = json!({});
        let cache = cache_with(vec![
            orphan.into(),
            fixtures::video_item("a", "Another"),
            fixtures::video_item("b", "Basics"),
        ]);

        let hits = cache.search_videos("", Some(2)).unwrap();
        assert_eq!(hits.len(), 2);

        let orphan_hit = cache.search_videos("Orphan", None).unwrap();
        assert_eq!(orphan_hit[0].channel_name, "Unknown Channel");
    }

    #[test]
    fn test_search_channels_and_playlists() {
        let cache = cache_with(vec![
            fixtures::channel("UC1", "Rustaceans").into(),
            fixtures::channel("UC2", "Gardening").into(),
            fixtures::playlist("PL1", "Rust talks", 5).into(),
            fixtures::playlist("PL2", "Roses", 1).into(),
        ]);

        let channels = cache.search_channels("rust", None).unwrap();
        assert_eq!(channels.len(), 1);
        assert_eq!(channels[0].channel_id, "UC1");
        assert!(channels[0].subscribed);

        let playlists = cache.search_playlists("rust", None).unwrap();
        assert_eq!(playlists.len(), 1);
        assert_eq!(playlists[0].entry_count, 5);

        assert!(cache.search_channels("nothing-here", None).unwrap().is_empty());
    }

    #[test]
    fn test_videos_with_resolution() {
        let cache = cache_with(vec![
            fixtures::video_with_heights("a", "A", &[360, 720]).into(),
            fixtures::video_with_heights("b", "B", &[1080]).into(),
            fixtures::video_with_heights("c", "C", &[720]).into(),
        ]);

        let matches = cache.videos_with_resolution(720).unwrap();
        let ids: Vec<_> = matches.iter().map(|v| v.youtube_id.as_str()).collect();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains(&"a"));
        assert!(ids.contains(&"c"));

        assert!(cache.videos_with_resolution(480).unwrap().is_empty());
    }

    #[test]
    fn test_videos_with_resolution_skips_malformed_streams() {
        let cache = cache_with(vec![fixtures::video_with_heights("a", "A", &[720]).into()]);
        cache
            .conn()
            .unwrap()
            .execute("UPDATE videos SET streams = '{broken'", [])
            .unwrap();

        assert!(cache.videos_with_resolution(720).unwrap().is_empty());
    }

    #[test]
    fn test_failed_videos() {
        let mut inactive = fixtures::video("inactive", "Inactive");
        inactive.active = Some(false);
        let mut no_media = fixtures::video("no-media", "No media");
        no_media.media_url = None;
        let mut empty_media = fixtures::video("empty-media", "Empty media");
        empty_media.media_url = Some(String::new());

        let cache = cache_with(vec![
            fixtures::video_item("fine", "Fine"),
            inactive.into(),
            no_media.into(),
            empty_media.into(),
        ]);

        let failed = cache.failed_videos().unwrap();
        assert_eq!(failed.len(), 3);
        assert!(failed.iter().all(|v| v.youtube_id != "fine"));
        assert_eq!(cache.table_count(CacheTable::Videos).unwrap(), 4);
        assert_eq!(cache.count(ResourceKind::Video).unwrap(), 4);
    }
}
