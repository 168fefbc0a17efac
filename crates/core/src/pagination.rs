//! Pagination walker - drains a paged collection into memory.
//!
//! The walk starts at page 1 and stops on the first of:
//! - a failed fetch or an empty page (partial result, not an error),
//! - `current_page >= last_page` when the server reports a last page,
//! - no `next_pages` when it does not,
//! - a page reporting a lower number than the one requested.
//!
//! `last_page` is authoritative whenever it is present; `next_pages` is only
//! consulted without it. There is no retry: a failed page ends the walk.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::api::CatalogApi;
use crate::catalog::{CatalogItem, PageResult, ResourceKind};

/// Page size used for every walk, independent of the API default.
pub const WALK_PAGE_SIZE: u32 = 50;

/// Why a walk ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The fetch for `page` failed; earlier pages were kept.
    FetchFailed { page: u32 },
    /// `page` came back without items.
    EmptyPage { page: u32 },
    /// The server reported `current >= last`.
    ReachedLastPage { current: u32, last: u32 },
    /// No last page known and no further pages listed after `page`.
    NoMorePages { page: u32 },
    /// Page `requested` came back numbered `reported`; its items were dropped.
    PageNotAdvanced { requested: u32, reported: u32 },
}

impl StopReason {
    /// True when the walk ended before the server said it was done.
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            StopReason::FetchFailed { .. } | StopReason::PageNotAdvanced { .. }
        )
    }
}

/// Result of a complete walk.
#[derive(Debug, Clone)]
pub struct WalkOutcome {
    /// Items in page order.
    pub items: Vec<CatalogItem>,
    /// Number of fetch calls made, including a failed last one.
    pub pages_fetched: u32,
    pub stop_reason: StopReason,
}

#[derive(Clone, Copy)]
enum Step {
    Continue,
    Stop(StopReason),
}

/// Decide whether to fetch another page after `page` was received for
/// `requested`.
fn next_step(requested: u32, page: &PageResult) -> Step {
    if page.current_page < requested {
        return Step::Stop(StopReason::PageNotAdvanced {
            requested,
            reported: page.current_page,
        });
    }
    match page.last_page {
        Some(last) if page.current_page >= last => Step::Stop(StopReason::ReachedLastPage {
            current: page.current_page,
            last,
        }),
        Some(_) => Step::Continue,
        None if page.has_more => Step::Continue,
        None => Step::Stop(StopReason::NoMorePages {
            page: page.current_page,
        }),
    }
}

/// Drives [`CatalogApi::fetch_page`] until a collection is exhausted.
pub struct PaginationWalker {
    api: Arc<dyn CatalogApi>,
}

impl PaginationWalker {
    pub fn new(api: Arc<dyn CatalogApi>) -> Self {
        Self { api }
    }

    /// Fetch every item of `kind`.
    pub async fn fetch_all(&self, kind: ResourceKind) -> Vec<CatalogItem> {
        self.walk(kind).await.items
    }

    /// Fetch every item of `kind`, reporting how the walk ended.
    pub async fn walk(&self, kind: ResourceKind) -> WalkOutcome {
        let mut items: Vec<CatalogItem> = Vec::new();
        let mut page_number: u32 = 1;
        let mut pages_fetched: u32 = 0;

        let stop_reason = loop {
            info!("Fetching {} page {}...", kind.plural(), page_number);
            pages_fetched += 1;

            let page = match self.api.fetch_page(kind, page_number, WALK_PAGE_SIZE).await {
                Ok(page) => page,
                Err(_) => {
                    // The client has already logged the cause.
                    warn!("No {} data received for page {}", kind, page_number);
                    break StopReason::FetchFailed { page: page_number };
                }
            };

            if page.items.is_empty() {
                info!("No {} found on page {}", kind.plural(), page_number);
                break StopReason::EmptyPage { page: page_number };
            }

            let step = next_step(page_number, &page);
            if let Step::Stop(reason @ StopReason::PageNotAdvanced { reported, .. }) = step {
                warn!(
                    "Asked for {} page {} but got page {}, stopping",
                    kind, page_number, reported
                );
                break reason;
            }

            let received = page.items.len();
            items.extend(page.items);
            info!(
                "Page {}: retrieved {} {} (total so far: {})",
                page_number,
                received,
                kind.plural(),
                items.len()
            );
            debug!(
                "Pagination info: current_page={} last_page={:?} has_more={}",
                page.current_page, page.last_page, page.has_more
            );

            match step {
                Step::Stop(reason) => break reason,
                Step::Continue => page_number += 1,
            }
        };

        info!(
            "Retrieved {} total {} ({:?})",
            items.len(),
            kind.plural(),
            stop_reason
        );

        WalkOutcome {
            items,
            pages_fetched,
            stop_reason,
        }
    }
}
