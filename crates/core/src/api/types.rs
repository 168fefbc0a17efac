//! Wire types for the Tube Archivist API.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::ApiError;
use crate::catalog::{de, CatalogItem, PageResult, ResourceKind};

/// Credentials for the remote service, as stored in the cache's config table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the instance, e.g. `https://tube.example.org`.
    pub base_url: String,
    /// API token sent as `Authorization: Token <api_token>`.
    pub api_token: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    /// Token with all but the last four characters masked.
    pub fn masked_token(&self) -> String {
        let chars: Vec<char> = self.api_token.chars().collect();
        if chars.len() <= 4 {
            return "*".repeat(chars.len());
        }
        let visible: String = chars[chars.len() - 4..].iter().collect();
        format!("{}{}", "*".repeat(chars.len() - 4), visible)
    }
}

/// Response envelope shared by all collection endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct PageEnvelope {
    #[serde(default)]
    pub data: Option<Vec<Value>>,
    #[serde(default)]
    pub paginate: Option<Paginate>,
}

/// Page metadata. Fields of an unexpected type decode as unknown instead of
/// failing the page.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct Paginate {
    #[serde(default, deserialize_with = "de::opt_page")]
    pub current_page: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_page")]
    pub last_page: Option<u32>,
    #[serde(default, deserialize_with = "de::opt_list")]
    pub next_pages: Option<Vec<Value>>,
}

/// Body of `POST /api/download/`.
#[derive(Debug, Serialize)]
pub(crate) struct DownloadRequest<'a> {
    pub data: Vec<DownloadEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub(crate) struct DownloadEntry<'a> {
    pub youtube_id: &'a str,
    pub status: &'static str,
}

impl<'a> DownloadRequest<'a> {
    /// A single-item "set to pending" request.
    pub fn pending(youtube_id: &'a str) -> Self {
        Self {
            data: vec![DownloadEntry {
                youtube_id,
                status: "pending",
            }],
        }
    }
}

/// Decode a page body into a [`PageResult`].
///
/// Individual items that fail to decode are skipped with a warning; duplicate
/// ids within the page keep their first occurrence. A body that is not the
/// envelope, or has no `data` list, is a parse error.
pub(crate) fn parse_page(
    kind: ResourceKind,
    requested_page: u32,
    body: &str,
) -> Result<PageResult, ApiError> {
    let envelope: PageEnvelope = serde_json::from_str(body)
        .map_err(|e| ApiError::ParseError(format!("Failed to parse {} page: {}", kind, e)))?;

    let data = envelope.data.ok_or_else(|| {
        ApiError::ParseError(format!("{} page {} has no data list", kind, requested_page))
    })?;

    let mut seen = HashSet::new();
    let mut items = Vec::with_capacity(data.len());
    for value in data {
        match CatalogItem::from_value(kind, value) {
            Ok(item) => {
                if seen.insert(item.id().to_string()) {
                    items.push(item);
                } else {
                    debug!("Dropping duplicate {} {} on page {}", kind, item.id(), requested_page);
                }
            }
            Err(e) => warn!("Skipping item on {} page {}: {}", kind, requested_page, e),
        }
    }

    let paginate = envelope.paginate.unwrap_or_default();
    Ok(PageResult {
        items,
        current_page: paginate.current_page.unwrap_or(requested_page),
        last_page: paginate.last_page,
        has_more: paginate.next_pages.is_some_and(|pages| !pages.is_empty()),
    })
}
