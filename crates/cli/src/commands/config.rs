//! `config set` and `config get`.

use anyhow::{bail, Context, Result};
use tubearchive_core::{ApiConfig, CatalogCache};

use super::prompt;
use crate::app::App;

pub fn set(app: &App, url: Option<String>, token: Option<String>) -> Result<()> {
    let url = match url {
        Some(url) => url,
        None => prompt("Enter Tube Archivist URL: ")?,
    };
    let token = match token {
        Some(token) => token,
        None => prompt("Enter API token: ")?,
    };

    let config = parse_config(&url, &token)?;
    app.cache
        .set_api_config(&config)
        .context("Failed to save the configuration")?;

    println!("Configuration saved successfully.");
    Ok(())
}

pub fn get(app: &App) -> Result<()> {
    match app
        .cache
        .api_config()
        .context("Failed to read the configuration")?
    {
        Some(config) => {
            println!("Tube Archivist URL: {}", config.base_url);
            println!("API Token: {}", config.masked_token());
        }
        None => println!("No configuration found. Run `tubearchive config set` to configure."),
    }
    Ok(())
}

fn parse_config(url: &str, token: &str) -> Result<ApiConfig> {
    let url = url.trim().trim_end_matches('/');
    let token = token.trim();

    if url.is_empty() {
        bail!("The Tube Archivist URL must not be empty");
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("The Tube Archivist URL must start with http:// or https://");
    }
    if token.is_empty() {
        bail!("The API token must not be empty");
    }

    Ok(ApiConfig::new(url, token))
}
