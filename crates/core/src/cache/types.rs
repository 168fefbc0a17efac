//! Types for the cache store and its reporting queries.

use serde::Serialize;
use thiserror::Error;

use crate::catalog::ResourceKind;

/// Every table in the cache database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheTable {
    Videos,
    Channels,
    Playlists,
    Config,
}

impl CacheTable {
    /// Display order used by `stats database`.
    pub const ALL: [CacheTable; 4] = [
        CacheTable::Videos,
        CacheTable::Channels,
        CacheTable::Playlists,
        CacheTable::Config,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CacheTable::Videos => "videos",
            CacheTable::Channels => "channels",
            CacheTable::Playlists => "playlists",
            CacheTable::Config => "config",
        }
    }
}

impl From<ResourceKind> for CacheTable {
    fn from(kind: ResourceKind) -> Self {
        match kind {
            ResourceKind::Video => CacheTable::Videos,
            ResourceKind::Playlist => CacheTable::Playlists,
            ResourceKind::Channel => CacheTable::Channels,
        }
    }
}

/// A video selected for redownload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRef {
    pub youtube_id: String,
    pub title: String,
}

/// A video search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoHit {
    pub youtube_id: String,
    pub title: String,
    pub published: Option<String>,
    /// From the nested channel summary; "Unknown Channel" when absent.
    pub channel_name: String,
    pub tags: Vec<String>,
}

/// A channel search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelHit {
    pub channel_id: String,
    pub channel_name: String,
    pub channel_description: Option<String>,
    pub subscribed: bool,
    pub active: bool,
}

/// A playlist search result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaylistHit {
    pub playlist_id: String,
    pub playlist_name: String,
    pub playlist_description: Option<String>,
    pub playlist_channel: Option<String>,
    pub entry_count: usize,
    pub active: bool,
}

/// Video statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VideoStats {
    pub total: u64,
    pub active: u64,
    pub inactive: u64,
    /// Sum of `media_size` over videos with a known, non-zero size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_size_bytes: Option<u64>,
    /// Most recent `date_downloaded` (unix seconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latest_download: Option<i64>,
}

/// Channel statistics.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChannelStats {
    pub total: u64,
    pub subscribed: u64,
    pub active: u64,
}

/// Playlist statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlaylistStats {
    pub total: u64,
    pub active: u64,
    /// Entries summed over playlists whose entry list could be read.
    pub total_entries: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_entries: Option<f64>,
}

/// Errors for cache operations.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Cannot store a {item} in the {table} table")]
    KindMismatch {
        item: ResourceKind,
        table: ResourceKind,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<rusqlite::Error> for CacheError {
    fn from(e: rusqlite::Error) -> Self {
        CacheError::Database(e.to_string())
    }
}
