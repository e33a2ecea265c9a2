use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

pub const DEFAULT_API_URL: &str = "https://api.openshift.com";

const TOKEN_MISSING: &str =
    "OCM token not set. Please configure by using the OCM_TOKEN environment variable or the ocm cli";

/// Parse a server URL with validation that it includes the http:// or https:// scheme
pub fn parse_server_url(url_str: &str) -> Result<Url> {
    if !url_str.starts_with("http://") && !url_str.starts_with("https://") {
        anyhow::bail!(
            "API URL must include the scheme prefix (http:// or https://). Got: '{}'",
            url_str
        )
    }
    Url::parse(url_str).context("Invalid API URL format")
}

/// Settings shared with the `ocm` command line tool.
///
/// Only the fields this crate needs are modelled; everything else in
/// `ocm.json` is ignored.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub access_token: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading ocm configuration");
            let content =
                std::fs::read_to_string(config_path).context("Failed to read config file")?;
            serde_json::from_str(&content).context("Failed to parse config file")
        } else {
            tracing::debug!(path = %config_path.display(), "no ocm configuration found");
            Ok(Self::default())
        }
    }

    /// Location of `ocm.json`, following the same lookup order as the `ocm` tool.
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("OCM_CONFIG")
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        if let Some(home) = dirs::home_dir() {
            let legacy = home.join(".ocm.json");
            if legacy.exists() {
                return Ok(legacy);
            }
        }

        let config_dir = dirs::config_dir().context("Failed to get config directory")?;
        Ok(config_dir.join("ocm").join("ocm.json"))
    }

    pub fn api_url(&self) -> Result<Url> {
        match self.url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => parse_server_url(url).context("Invalid OCM API URL"),
            None => parse_server_url(DEFAULT_API_URL),
        }
    }

    pub fn token(&self) -> Result<String> {
        resolve_token(std::env::var("OCM_TOKEN").ok(), self.access_token.as_deref())
    }
}

fn resolve_token(env_token: Option<String>, stored: Option<&str>) -> Result<String> {
    if let Some(token) = env_token.filter(|t| !t.is_empty()) {
        tracing::debug!("using token from OCM_TOKEN");
        return Ok(token);
    }

    let token = stored
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .context(TOKEN_MISSING)?;
    tracing::debug!("using access token from ocm configuration");
    Ok(token)
}
