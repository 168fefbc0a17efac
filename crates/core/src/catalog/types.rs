//! Types for catalog items and pages.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::de;

/// The three catalog entity types mirrored from the remote service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Video,
    Playlist,
    Channel,
}

impl ResourceKind {
    /// Sync order used by `sync all`.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Video,
        ResourceKind::Playlist,
        ResourceKind::Channel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Video => "video",
            ResourceKind::Playlist => "playlist",
            ResourceKind::Channel => "channel",
        }
    }

    /// Plural label used in user-facing messages.
    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Video => "videos",
            ResourceKind::Playlist => "playlists",
            ResourceKind::Channel => "channels",
        }
    }

    /// REST collection path on the remote service.
    pub fn api_path(&self) -> &'static str {
        match self {
            ResourceKind::Video => "/api/video/",
            ResourceKind::Playlist => "/api/playlist/",
            ResourceKind::Channel => "/api/channel/",
        }
    }

    /// Name of the stable identifier field in API payloads and cache rows.
    pub fn id_field(&self) -> &'static str {
        match self {
            ResourceKind::Video => "youtube_id",
            ResourceKind::Playlist => "playlist_id",
            ResourceKind::Channel => "channel_id",
        }
    }

    /// Cache table holding this kind.
    pub fn table(&self) -> &'static str {
        self.plural()
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown resource kind: {0}")]
pub struct UnknownResourceKind(pub String);

impl FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "video" | "videos" => Ok(ResourceKind::Video),
            "playlist" | "playlists" => Ok(ResourceKind::Playlist),
            "channel" | "channels" => Ok(ResourceKind::Channel),
            _ => Err(UnknownResourceKind(s.to_string())),
        }
    }
}

/// A downloaded video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Video {
    #[serde(deserialize_with = "de::text")]
    pub youtube_id: String,
    #[serde(default, deserialize_with = "de::text")]
    pub title: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub published: Option<String>,
    /// Unix timestamp of the download.
    #[serde(default, deserialize_with = "de::opt_int")]
    pub date_downloaded: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub active: Option<bool>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub vid_last_refresh: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub vid_thumb_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub vid_type: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub media_url: Option<String>,
    /// Size of the media file in bytes.
    #[serde(default, deserialize_with = "de::opt_int")]
    pub media_size: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub comment_count: Option<i64>,
    #[serde(default = "de::empty_array")]
    pub category: Value,
    #[serde(default = "de::empty_array")]
    pub tags: Value,
    /// Nested channel summary (`channel_name`, `channel_id`, ...).
    #[serde(default = "de::empty_object")]
    pub channel: Value,
    #[serde(default = "de::empty_object")]
    pub player: Value,
    #[serde(default = "de::empty_array")]
    pub playlist: Value,
    #[serde(default)]
    pub sponsorblock: Value,
    #[serde(default = "de::empty_object")]
    pub stats: Value,
    /// Stream descriptors; video streams carry `height`.
    #[serde(default = "de::empty_array")]
    pub streams: Value,
    #[serde(default = "de::empty_array")]
    pub subtitles: Value,
    #[serde(rename = "_index", default, deserialize_with = "de::opt_text")]
    pub index: Option<String>,
    #[serde(rename = "_score", default, deserialize_with = "de::opt_float")]
    pub score: Option<f64>,
}

/// A playlist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    #[serde(deserialize_with = "de::text")]
    pub playlist_id: String,
    #[serde(default, deserialize_with = "de::text")]
    pub playlist_name: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub playlist_description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub playlist_channel: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub playlist_channel_id: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub playlist_thumbnail: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub playlist_last_refresh: Option<String>,
    #[serde(default = "de::empty_array")]
    pub playlist_entries: Value,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub date_downloaded: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub active: Option<bool>,
    #[serde(rename = "_index", default, deserialize_with = "de::opt_text")]
    pub index: Option<String>,
    #[serde(rename = "_score", default, deserialize_with = "de::opt_float")]
    pub score: Option<f64>,
}

/// A channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Channel {
    #[serde(deserialize_with = "de::text")]
    pub channel_id: String,
    #[serde(default, deserialize_with = "de::text")]
    pub channel_name: String,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub channel_banner_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub channel_thumb_url: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub channel_description: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub channel_last_refresh: Option<String>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub channel_subscribed: Option<bool>,
    #[serde(default = "de::empty_object")]
    pub channel_overwrites: Value,
    #[serde(default, deserialize_with = "de::opt_int")]
    pub date_downloaded: Option<i64>,
    #[serde(default, deserialize_with = "de::opt_bool")]
    pub active: Option<bool>,
    #[serde(rename = "_index", default, deserialize_with = "de::opt_text")]
    pub index: Option<String>,
    #[serde(rename = "_score", default, deserialize_with = "de::opt_float")]
    pub score: Option<f64>,
}

/// One catalog entity of any kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogItem {
    Video(Video),
    Playlist(Playlist),
    Channel(Channel),
}

/// Error decoding a single item out of a page.
#[derive(Debug, Error)]
pub enum ItemError {
    #[error("Malformed {kind} item: {source}")]
    Malformed {
        kind: ResourceKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("{kind} item has an empty {field}")]
    MissingId {
        kind: ResourceKind,
        field: &'static str,
    },
}

impl CatalogItem {
    /// Decode one raw API object as an item of `kind`.
    pub fn from_value(kind: ResourceKind, value: Value) -> Result<Self, ItemError> {
        let malformed = |source| ItemError::Malformed { kind, source };
        let item = match kind {
            ResourceKind::Video => {
                CatalogItem::Video(serde_json::from_value(value).map_err(malformed)?)
            }
            ResourceKind::Playlist => {
                CatalogItem::Playlist(serde_json::from_value(value).map_err(malformed)?)
            }
            ResourceKind::Channel => {
                CatalogItem::Channel(serde_json::from_value(value).map_err(malformed)?)
            }
        };

        if item.id().trim().is_empty() {
            return Err(ItemError::MissingId {
                kind,
                field: kind.id_field(),
            });
        }
        Ok(item)
    }

    pub fn kind(&self) -> ResourceKind {
        match self {
            CatalogItem::Video(_) => ResourceKind::Video,
            CatalogItem::Playlist(_) => ResourceKind::Playlist,
            CatalogItem::Channel(_) => ResourceKind::Channel,
        }
    }

    /// The stable identifier (`youtube_id`, `playlist_id` or `channel_id`).
    pub fn id(&self) -> &str {
        match self {
            CatalogItem::Video(v) => &v.youtube_id,
            CatalogItem::Playlist(p) => &p.playlist_id,
            CatalogItem::Channel(c) => &c.channel_id,
        }
    }

    /// Display name (video title, playlist or channel name).
    pub fn name(&self) -> &str {
        match self {
            CatalogItem::Video(v) => &v.title,
            CatalogItem::Playlist(p) => &p.playlist_name,
            CatalogItem::Channel(c) => &c.channel_name,
        }
    }
}

impl From<Video> for CatalogItem {
    fn from(video: Video) -> Self {
        CatalogItem::Video(video)
    }
}

impl From<Playlist> for CatalogItem {
    fn from(playlist: Playlist) -> Self {
        CatalogItem::Playlist(playlist)
    }
}

impl From<Channel> for CatalogItem {
    fn from(channel: Channel) -> Self {
        CatalogItem::Channel(channel)
    }
}

/// One page of a collection, as returned by a single fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult {
    pub items: Vec<CatalogItem>,
    /// Page number the server says it returned.
    pub current_page: u32,
    /// Last page number, when the server reports one.
    pub last_page: Option<u32>,
    /// True when the server lists further pages (`next_pages` non-empty).
    pub has_more: bool,
}
