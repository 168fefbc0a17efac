//! reqwest-backed client for a Tube Archivist instance.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Response};
use tracing::{debug, error, info, warn};

use super::types::{parse_page, ApiConfig, DownloadRequest};
use super::{ApiError, CatalogApi};
use crate::catalog::{PageResult, ResourceKind};
use crate::config::HttpSettings;

const DOWNLOAD_PATH: &str = "/api/download/";

/// HTTP client for the Tube Archivist REST API.
///
/// Certificate validation follows `HttpSettings::accept_invalid_certs`, which
/// defaults to `true`: self-hosted instances commonly run with self-signed
/// certificates.
pub struct TubeArchivistClient {
    client: Client,
    base_url: String,
}

impl TubeArchivistClient {
    /// Create a client for the configured instance.
    pub fn new(config: &ApiConfig, http: &HttpSettings) -> Result<Self, ApiError> {
        let base_url = config.base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(ApiError::NotConfigured("base URL is empty".to_string()));
        }
        if config.api_token.trim().is_empty() {
            return Err(ApiError::NotConfigured("API token is empty".to_string()));
        }

        let mut token = HeaderValue::from_str(&format!("Token {}", config.api_token.trim()))
            .map_err(|e| ApiError::NotConfigured(format!("invalid API token: {}", e)))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, token);

        if http.accept_invalid_certs {
            debug!("TLS certificate validation disabled for {}", base_url);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(http.timeout_secs))
            .danger_accept_invalid_certs(http.accept_invalid_certs)
            .build()?;

        Ok(Self { client, base_url })
    }

    /// Base URL without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Map a transport error onto the client's error taxonomy.
    fn classify(e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout
        } else if e.is_connect() {
            ApiError::ConnectionFailed(e.to_string())
        } else {
            ApiError::HttpError(e)
        }
    }

    /// Turn a non-2xx response into an error, keeping a short body excerpt.
    async fn check_status(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(ApiError::Unauthorized(status.as_u16()));
        }
        let body = response.text().await.unwrap_or_default();
        Err(ApiError::ApiError {
            status: status.as_u16(),
            message: body.chars().take(200).collect(),
        })
    }

    async fn get_page(
        &self,
        kind: ResourceKind,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult, ApiError> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let url = self.url(kind.api_path());

        debug!("GET {} page={} page_size={}", url, page, page_size);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("page_size", page_size)])
            .send()
            .await
            .map_err(Self::classify)?;
        let response = Self::check_status(response).await?;

        let body = response.text().await.map_err(Self::classify)?;
        parse_page(kind, page, &body)
    }

    async fn post_redownload(&self, youtube_id: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url(DOWNLOAD_PATH))
            .query(&[("autostart", "true"), ("force", "true")])
            .json(&DownloadRequest::pending(youtube_id))
            .send()
            .await
            .map_err(Self::classify)?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn probe(&self) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.url(ResourceKind::Video.api_path()))
            .send()
            .await
            .map_err(Self::classify)?;
        Self::check_status(response).await?;
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for TubeArchivistClient {
    async fn fetch_page(
        &self,
        kind: ResourceKind,
        page: u32,
        page_size: u32,
    ) -> Result<PageResult, ApiError> {
        self.get_page(kind, page, page_size).await.inspect_err(|e| {
            error!("Failed to get {} page {}: {}", kind.plural(), page, e);
        })
    }

    async fn trigger_redownload(&self, youtube_id: &str) -> bool {
        match self.post_redownload(youtube_id).await {
            Ok(()) => {
                info!("Queued video {} for redownload", youtube_id);
                true
            }
            Err(e) => {
                error!("Failed to queue video {} for redownload: {}", youtube_id, e);
                false
            }
        }
    }

    async fn test_connection(&self) -> bool {
        match self.probe().await {
            Ok(()) => {
                info!("Connected to Tube Archivist API at {}", self.base_url);
                true
            }
            Err(e) => {
                warn!("Failed to connect to Tube Archivist API at {}: {}", self.base_url, e);
                false
            }
        }
    }
}
