//! SQLite-backed catalog cache implementation.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use tracing::{debug, info};

use super::{CacheError, CacheTable, CatalogCache};
use crate::api::ApiConfig;
use crate::catalog::{CatalogItem, Channel, Playlist, ResourceKind, Video};

const VIDEO_COLUMNS: &str = "youtube_id, title, description, published, date_downloaded, active,
    vid_last_refresh, vid_thumb_url, vid_type, media_url, media_size,
    comment_count, category, tags, channel, player, playlist,
    sponsorblock, stats, streams, subtitles, _index, _score";

const PLAYLIST_COLUMNS: &str = "playlist_id, playlist_name, playlist_description, playlist_channel,
    playlist_channel_id, playlist_thumbnail, playlist_last_refresh,
    playlist_entries, date_downloaded, active, _index, _score";

const CHANNEL_COLUMNS: &str = "channel_id, channel_name, channel_banner_url, channel_thumb_url,
    channel_description, channel_last_refresh, channel_subscribed,
    channel_overwrites, date_downloaded, active, _index, _score";

/// SQLite-backed catalog cache.
pub struct SqliteCache {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteCache {
    /// Open the cache file, creating it and its tables if needed.
    pub fn new(path: &Path) -> Result<Self, CacheError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        debug!("Opened cache database at {:?}", path);
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Create an in-memory cache (useful for testing).
    pub fn in_memory() -> Result<Self, CacheError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Path of the database file; `None` for in-memory caches.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CacheError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS videos (
                youtube_id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT,
                published TEXT,
                date_downloaded INTEGER,
                active BOOLEAN,
                vid_last_refresh TEXT,
                vid_thumb_url TEXT,
                vid_type TEXT,
                media_url TEXT,
                media_size INTEGER,
                comment_count INTEGER,
                category TEXT,
                tags TEXT,
                channel TEXT,
                player TEXT,
                playlist TEXT,
                sponsorblock TEXT,
                stats TEXT,
                streams TEXT,
                subtitles TEXT,
                _index TEXT,
                _score REAL
            );

            CREATE TABLE IF NOT EXISTS playlists (
                playlist_id TEXT PRIMARY KEY,
                playlist_name TEXT NOT NULL,
                playlist_description TEXT,
                playlist_channel TEXT,
                playlist_channel_id TEXT,
                playlist_thumbnail TEXT,
                playlist_last_refresh TEXT,
                playlist_entries TEXT,
                date_downloaded INTEGER,
                active BOOLEAN,
                _index TEXT,
                _score REAL
            );

            CREATE TABLE IF NOT EXISTS channels (
                channel_id TEXT PRIMARY KEY,
                channel_name TEXT NOT NULL,
                channel_banner_url TEXT,
                channel_thumb_url TEXT,
                channel_description TEXT,
                channel_last_refresh TEXT,
                channel_subscribed BOOLEAN,
                channel_overwrites TEXT,
                date_downloaded INTEGER,
                active BOOLEAN,
                _index TEXT,
                _score REAL
            );

            -- Single row: the Tube Archivist instance and its API token
            CREATE TABLE IF NOT EXISTS config (
                tubearchivist_url TEXT PRIMARY KEY,
                api_key TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    /// Lock the connection.
    pub(super) fn conn(&self) -> Result<MutexGuard<'_, Connection>, CacheError> {
        self.conn
            .lock()
            .map_err(|_| CacheError::Internal("cache connection lock poisoned".to_string()))
    }

    /// Write one item with INSERT OR REPLACE.
    fn insert_item(conn: &Connection, item: &CatalogItem) -> Result<(), CacheError> {
        match item {
            CatalogItem::Video(v) => {
                conn.execute(
                    &format!(
                        "INSERT OR REPLACE INTO videos ({VIDEO_COLUMNS})
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                    ),
                    params![
                        &v.youtube_id,
                        &v.title,
                        &v.description,
                        &v.published,
                        v.date_downloaded,
                        v.active,
                        &v.vid_last_refresh,
                        &v.vid_thumb_url,
                        &v.vid_type,
                        &v.media_url,
                        v.media_size,
                        v.comment_count,
                        v.category.to_string(),
                        v.tags.to_string(),
                        v.channel.to_string(),
                        v.player.to_string(),
                        v.playlist.to_string(),
                        v.sponsorblock.to_string(),
                        v.stats.to_string(),
                        v.streams.to_string(),
                        v.subtitles.to_string(),
                        &v.index,
                        v.score,
                    ],
                )?;
            }
            CatalogItem::Playlist(p) => {
                conn.execute(
                    &format!(
                        "INSERT OR REPLACE INTO playlists ({PLAYLIST_COLUMNS})
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                    ),
                    params![
                        &p.playlist_id,
                        &p.playlist_name,
                        &p.playlist_description,
                        &p.playlist_channel,
                        &p.playlist_channel_id,
                        &p.playlist_thumbnail,
                        &p.playlist_last_refresh,
                        p.playlist_entries.to_string(),
                        p.date_downloaded,
                        p.active,
                        &p.index,
                        p.score,
                    ],
                )?;
            }
            CatalogItem::Channel(c) => {
                conn.execute(
                    &format!(
                        "INSERT OR REPLACE INTO channels ({CHANNEL_COLUMNS})
                         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
                    ),
                    params![
                        &c.channel_id,
                        &c.channel_name,
                        &c.channel_banner_url,
                        &c.channel_thumb_url,
                        &c.channel_description,
                        &c.channel_last_refresh,
                        c.channel_subscribed,
                        c.channel_overwrites.to_string(),
                        c.date_downloaded,
                        c.active,
                        &c.index,
                        c.score,
                    ],
                )?;
            }
        }
        Ok(())
    }

    /// Get a cached video by id.
    pub fn get_video(&self, youtube_id: &str) -> Result<Option<Video>, CacheError> {
        let conn = self.conn()?;
        let video = conn
            .query_row(
                &format!("SELECT {VIDEO_COLUMNS} FROM videos WHERE youtube_id = ?"),
                params![youtube_id],
                Self::row_to_video,
            )
            .optional()?;
        Ok(video)
    }

    /// Get a cached playlist by id.
    pub fn get_playlist(&self, playlist_id: &str) -> Result<Option<Playlist>, CacheError> {
        let conn = self.conn()?;
        let playlist = conn
            .query_row(
                &format!("SELECT {PLAYLIST_COLUMNS} FROM playlists WHERE playlist_id = ?"),
                params![playlist_id],
                Self::row_to_playlist,
            )
            .optional()?;
        Ok(playlist)
    }

    /// Get a cached channel by id.
    pub fn get_channel(&self, channel_id: &str) -> Result<Option<Channel>, CacheError> {
        let conn = self.conn()?;
        let channel = conn
            .query_row(
                &format!("SELECT {CHANNEL_COLUMNS} FROM channels WHERE channel_id = ?"),
                params![channel_id],
                Self::row_to_channel,
            )
            .optional()?;
        Ok(channel)
    }

    fn row_to_video(row: &rusqlite::Row) -> rusqlite::Result<Video> {
        Ok(Video {
            youtube_id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            published: row.get(3)?,
            date_downloaded: row.get(4)?,
            active: row.get(5)?,
            vid_last_refresh: row.get(6)?,
            vid_thumb_url: row.get(7)?,
            vid_type: row.get(8)?,
            media_url: row.get(9)?,
            media_size: row.get(10)?,
            comment_count: row.get(11)?,
            category: json_column(row.get(12)?, "category", JsonDefault::Array),
            tags: json_column(row.get(13)?, "tags", JsonDefault::Array),
            channel: json_column(row.get(14)?, "channel", JsonDefault::Object),
            player: json_column(row.get(15)?, "player", JsonDefault::Object),
            playlist: json_column(row.get(16)?, "playlist", JsonDefault::Array),
            sponsorblock: json_column(row.get(17)?, "sponsorblock", JsonDefault::Null),
            stats: json_column(row.get(18)?, "stats", JsonDefault::Object),
            streams: json_column(row.get(19)?, "streams", JsonDefault::Array),
            subtitles: json_column(row.get(20)?, "subtitles", JsonDefault::Array),
            index: row.get(21)?,
            score: row.get(22)?,
        })
    }

    fn row_to_playlist(row: &rusqlite::Row) -> rusqlite::Result<Playlist> {
        Ok(Playlist {
            playlist_id: row.get(0)?,
            playlist_name: row.get(1)?,
            playlist_description: row.get(2)?,
            playlist_channel: row.get(3)?,
            playlist_channel_id: row.get(4)?,
            playlist_thumbnail: row.get(5)?,
            playlist_last_refresh: row.get(6)?,
            playlist_entries: json_column(row.get(7)?, "playlist_entries", JsonDefault::Array),
            date_downloaded: row.get(8)?,
            active: row.get(9)?,
            index: row.get(10)?,
            score: row.get(11)?,
        })
    }

    fn row_to_channel(row: &rusqlite::Row) -> rusqlite::Result<Channel> {
        Ok(Channel {
            channel_id: row.get(0)?,
            channel_name: row.get(1)?,
            channel_banner_url: row.get(2)?,
            channel_thumb_url: row.get(3)?,
            channel_description: row.get(4)?,
            channel_last_refresh: row.get(5)?,
            channel_subscribed: row.get(6)?,
            channel_overwrites: json_column(row.get(7)?, "channel_overwrites", JsonDefault::Object),
            date_downloaded: row.get(8)?,
            active: row.get(9)?,
            index: row.get(10)?,
            score: row.get(11)?,
        })
    }

    /// Row count of any cache table.
    pub fn table_count(&self, table: CacheTable) -> Result<u64, CacheError> {
        let conn = self.conn()?;
        let count: u64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}

/// Fallback for a JSON column that is missing or unreadable.
#[derive(Debug, Clone, Copy)]
pub(super) enum JsonDefault {
    Array,
    Object,
    Null,
}

impl JsonDefault {
    fn value(self) -> Value {
        match self {
            JsonDefault::Array => Value::Array(Vec::new()),
            JsonDefault::Object => Value::Object(serde_json::Map::new()),
            JsonDefault::Null => Value::Null,
        }
    }
}

/// Decode a JSON text column, falling back to `default` when it is malformed.
pub(super) fn json_column(raw: Option<String>, column: &str, default: JsonDefault) -> Value {
    match raw {
        Some(text) if !text.is_empty() => serde_json::from_str(&text).unwrap_or_else(|e| {
            debug!("Ignoring malformed JSON in column {}: {}", column, e);
            default.value()
        }),
        _ => default.value(),
    }
}

impl CatalogCache for SqliteCache {
    fn clear(&self, kind: ResourceKind) -> Result<(), CacheError> {
        let conn = self.conn()?;
        conn.execute(&format!("DELETE FROM {}", kind.table()), [])?;
        Ok(())
    }

    fn upsert(&self, item: &CatalogItem) -> Result<(), CacheError> {
        let conn = self.conn()?;
        Self::insert_item(&conn, item)
    }

    fn replace_all(&self, kind: ResourceKind, items: &[CatalogItem]) -> Result<usize, CacheError> {
        if let Some(item) = items.iter().find(|item| item.kind() != kind) {
            return Err(CacheError::KindMismatch {
                item: item.kind(),
                table: kind,
            });
        }

        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute(&format!("DELETE FROM {}", kind.table()), [])?;
        for item in items {
            Self::insert_item(&tx, item)?;
        }
        tx.commit()?;

        info!("Replaced {} table with {} rows", kind.table(), items.len());
        Ok(items.len())
    }

    fn count(&self, kind: ResourceKind) -> Result<u64, CacheError> {
        self.table_count(kind.into())
    }

    fn set_api_config(&self, config: &ApiConfig) -> Result<(), CacheError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM config", [])?;
        tx.execute(
            "INSERT INTO config (tubearchivist_url, api_key) VALUES (?, ?)",
            params![&config.base_url, &config.api_token],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn api_config(&self) -> Result<Option<ApiConfig>, CacheError> {
        let conn = self.conn()?;
        let config = conn
            .query_row(
                "SELECT tubearchivist_url, api_key FROM config LIMIT 1",
                [],
                |row| {
                    Ok(ApiConfig {
                        base_url: row.get(0)?,
                        api_token: row.get(1)?,
                    })
                },
            )
            .optional()?;
        Ok(config)
    }
}
