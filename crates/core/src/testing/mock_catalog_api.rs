//! Mock remote catalog for testing.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::api::{ApiError, CatalogApi};
use crate::catalog::{CatalogItem, PageResult, ResourceKind};

/// A recorded page fetch for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedFetch {
    pub kind: ResourceKind,
    pub page: u32,
    pub page_size: u32,
}

/// How the mock reports pagination for items set with `set_items`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaginationStyle {
    /// `last_page` and `next_pages` both present.
    #[default]
    Full,
    /// Only `next_pages`, `last_page` absent.
    NextPagesOnly,
    /// Always serves page 1, whatever page was asked for.
    IgnoresPage,
}

/// Mock implementation of the CatalogApi trait.
///
/// Provides controllable behavior for testing:
/// - Serve a collection split into pages of the requested size
/// - Serve hand-written pages verbatim
/// - Fail selected pages or redownloads
/// - Track fetches and redownloads for assertions
#[derive(Debug, Clone, Default)]
pub struct MockCatalogApi {
    /// Collections served by slicing on the requested page size.
    items: Arc<RwLock<HashMap<ResourceKind, Vec<CatalogItem>>>>,
    /// Scripted pages, served as-is (page N is index N-1).
    scripted: Arc<RwLock<HashMap<ResourceKind, Vec<PageResult>>>>,
    style: Arc<RwLock<PaginationStyle>>,
    /// Pages that fail with an API error.
    failing_pages: Arc<RwLock<HashSet<(ResourceKind, u32)>>>,
    /// Video ids whose redownload request fails.
    failing_redownloads: Arc<RwLock<HashSet<String>>>,
    connected: Arc<RwLock<Option<bool>>>,
    fetches: Arc<RwLock<Vec<RecordedFetch>>>,
    redownloads: Arc<RwLock<Vec<String>>>,
}

impl MockCatalogApi {
    /// Create a new empty mock (every collection is empty, connection ok).
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Serve `items` for `kind`, paginated by the requested page size.
    pub async fn set_items(&self, kind: ResourceKind, items: Vec<CatalogItem>) {
        self.items.write().await.insert(kind, items);
    }

    /// Serve these pages for `kind` verbatim; pages past the end are empty.
    pub async fn set_pages(&self, kind: ResourceKind, pages: Vec<PageResult>) {
        self.scripted.write().await.insert(kind, pages);
    }

    pub async fn set_pagination_style(&self, style: PaginationStyle) {
        *self.style.write().await = style;
    }

    /// Make every fetch of `page` for `kind` fail.
    pub async fn fail_on_page(&self, kind: ResourceKind, page: u32) {
        self.failing_pages.write().await.insert((kind, page));
    }

    /// Make the redownload of `youtube_id` fail.
    pub async fn fail_redownload(&self, youtube_id: &str) {
        self.failing_redownloads
            .write()
            .await
            .insert(youtube_id.to_string());
    }

    /// Control the result of `test_connection`.
    pub async fn set_connected(&self, connected: bool) {
        *self.connected.write().await = Some(connected);
    }

    // =========================================================================
    // Recording
    // =========================================================================

    /// All page fetches, in call order.
    pub async fn fetches(&self) -> Vec<RecordedFetch> {
        self.fetches.read().await.clone()
    }

    /// Number of fetches made for `kind`.
    pub async fn fetch_count(&self, kind: ResourceKind) -> usize {
        self.fetches
            .read()
            .await
            .iter()
            .filter(|f| f.kind == kind)
            .count()
    }

    /// Every redownload request received, in call order (failed ones too).
    pub async fn redownloads(&self) -> Vec<String> {
        self.redownloads.read().await.clone()
    }

    async fn sliced_page(&self, kind: ResourceKind, page: u32, page_size: u32) -> PageResult {
        let style = *self.style.read().await;
        let page = if style == PaginationStyle::IgnoresPage { 1 } else { page };
        let items = self.items.read().await;
        let all = items.get(&kind).map(Vec::as_slice).unwrap_or_default();

        let page_size = page_size.max(1) as usize;
        let last_page = all.len().div_ceil(page_size).max(1) as u32;
        let start = (page.saturating_sub(1) as usize).saturating_mul(page_size);
        let slice = all.iter().skip(start).take(page_size).cloned().collect();
        let has_more = page < last_page;

        match style {
            PaginationStyle::Full | PaginationStyle::IgnoresPage => PageResult {
                items: slice,
                current_page: page,
                last_page: Some(last_page),
                has_more,
            },
            PaginationStyle::NextPagesOnly => PageResult {
                items: slice,
                current_page: page,
                last_page: None,
                has_more,
            },
        }
    }
}

#[async_trait]
impl CatalogApi for MockCatalogApi {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult, ApiError> {
        self.fetches.write().await.push(RecordedFetch {
            kind,
            page,
            page_size,
        });

        if self.failing_pages.read().await.contains(&(kind, page)) {
            return Err(ApiError::ApiError {
                status: 500,
                message: format!("mock failure for {} page {}", kind, page),
            });
        }

        if let Some(pages) = self.scripted.read().await.get(&kind) {
            return Ok(pages
                .get(page.saturating_sub(1) as usize)
                .cloned()
                .unwrap_or(PageResult {
                    items: Vec::new(),
                    current_page: page,
                    last_page: None,
                    has_more: false,
                }));
        }

        Ok(self.sliced_page(kind, page, page_size).await)
    }

    async fn trigger_redownload(&self, youtube_id: &str) -> bool {
        self.redownloads.write().await.push(youtube_id.to_string());
        !self.failing_redownloads.read().await.contains(youtube_id)
    }

    async fn test_connection(&self) -> bool {
        self.connected.read().await.unwrap_or(true)
    }
}
