//! Per-invocation state shared by the command handlers.

use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use tracing::debug;
use tubearchive_core::{CatalogApi, CatalogCache, Settings, SqliteCache, TubeArchivistClient};

pub const NOT_CONFIGURED: &str =
    "Configuration not set. Run `tubearchive config set` to configure the Tube Archivist URL and API token.";

pub struct App {
    pub settings: Settings,
    pub cache: Arc<SqliteCache>,
}

impl App {
    /// Open (or create) the cache database named in `settings`.
    pub fn open(settings: Settings) -> Result<Self> {
        let cache = SqliteCache::new(&settings.database.path).with_context(|| {
            format!(
                "Failed to open cache database {:?}",
                settings.database.path
            )
        })?;
        debug!("Using cache database {:?}", settings.database.path);

        Ok(Self {
            settings,
            cache: Arc::new(cache),
        })
    }

    /// Client built from the stored credentials.
    pub fn api(&self) -> Result<Arc<TubeArchivistClient>> {
        let config = self
            .cache
            .api_config()
            .context("Failed to read the stored configuration")?
            .ok_or_else(|| anyhow!(NOT_CONFIGURED))?;

        let client = TubeArchivistClient::new(&config, &self.settings.http)
            .with_context(|| format!("{} ({})", NOT_CONFIGURED, config.base_url))?;
        Ok(Arc::new(client))
    }

    /// Client built from the stored credentials, after a connection check.
    pub async fn connected_api(&self) -> Result<Arc<TubeArchivistClient>> {
        let api = self.api()?;
        if !api.test_connection().await {
            bail!(
                "Failed to connect to the Tube Archivist API at {}",
                api.base_url()
            );
        }
        Ok(api)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tubearchive_core::ApiConfig;

    fn app_in(dir: &TempDir) -> App {
        let mut settings = Settings::default();
        settings.database.path = dir.path().join("cache.sqlite");
        App::open(settings).unwrap()
    }

    #[test]
    fn test_api_without_config_explains_remediation() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir);

        let err = app.api().err().unwrap();
        assert!(err.to_string().contains("tubearchive config set"));
    }

    #[test]
    fn test_api_with_stored_config() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir);
        app.cache
            .set_api_config(&ApiConfig::new("https://tube.local/", "token"))
            .unwrap();

        let api = app.api().unwrap();
        assert_eq!(api.base_url(), "https://tube.local");
    }

    #[tokio::test]
    async fn test_connected_api_fails_when_unreachable() {
        let dir = TempDir::new().unwrap();
        let app = app_in(&dir);
        app.cache
            .set_api_config(&ApiConfig::new("http://127.0.0.1:9", "token"))
            .unwrap();

        let err = app.connected_api().await.err().unwrap();
        assert!(err.to_string().starts_with("Failed to connect"));
    }
}
