//! Remote catalog client for the Tube Archivist REST API.
//!
//! Failures are reported, never retried: every method logs what went wrong
//! and hands the caller an error or `false`, and the caller decides whether to
//! stop (the pagination walker always does).

mod client;
mod types;

pub use client::TubeArchivistClient;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::{PageResult, ResourceKind};

/// Errors that can occur when talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No credentials stored, or they are unusable.
    #[error("API not configured: {0}")]
    NotConfigured(String),

    /// The request did not complete in time.
    #[error("Request timed out")]
    Timeout,

    /// The server could not be reached.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The server rejected the token.
    #[error("Authentication rejected (HTTP {0}), check the API token")]
    Unauthorized(u16),

    /// Any other non-2xx status.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// The body was not the expected JSON envelope.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Transport-level failure not covered above.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
}

/// Client for the remote catalog.
///
/// Implemented by [`TubeArchivistClient`] and by the mock in
/// [`crate::testing`].
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Fetch one page of a collection.
    ///
    /// `page` and `page_size` are 1-based; zero is treated as 1.
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult, ApiError>;

    /// Queue a single video for a forced redownload.
    ///
    /// Returns `false` (after logging) when the request fails.
    async fn trigger_redownload(&self, youtube_id: &str) -> bool;

    /// Check that the API is reachable and accepts the token.
    async fn test_connection(&self) -> bool;
}
