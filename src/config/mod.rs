use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest page size the search endpoint accepts
pub const MAX_PER_PAGE: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub harvest: HarvestConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    #[serde(skip_serializing)]
    pub token: Option<String>,
    pub per_page: u32,
    pub timeout_seconds: u64,
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    pub keyword: String,
    pub output_dir: PathBuf,
}

impl Settings {
    /// Load settings from environment variables
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("BASE_URL")
            .map_err(|_| Error::Config("BASE_URL must be set on environment variables".to_string()))?;

        let token = std::env::var("GITHUB_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());

        let per_page = std::env::var("PER_PAGE")
            .unwrap_or_else(|_| MAX_PER_PAGE.to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid PER_PAGE value".to_string()))?;

        let timeout_seconds = std::env::var("REQUEST_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|_| Error::Config("Invalid REQUEST_TIMEOUT value".to_string()))?;

        let keyword = std::env::var("SEARCH_KEYWORD").unwrap_or_else(|_| "awesome".to_string());

        let output_dir = std::env::var("OUTPUT_DIR")
            .unwrap_or_else(|_| ".".to_string())
            .into();

        Ok(Settings {
            api: ApiConfig {
                base_url,
                token,
                per_page,
                timeout_seconds,
                user_agent: format!("Harvester/{}", env!("CARGO_PKG_VERSION")),
            },
            harvest: HarvestConfig {
                keyword,
                output_dir,
            },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        let base = url::Url::parse(&self.api.base_url)
            .map_err(|e| Error::Config(format!("Invalid BASE_URL '{}': {e}", self.api.base_url)))?;

        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(Error::Config(format!(
                "BASE_URL must use http or https, got '{}'",
                base.scheme()
            )));
        }

        if self.api.per_page == 0 || self.api.per_page > MAX_PER_PAGE {
            return Err(Error::Config(format!(
                "PER_PAGE must be between 1 and {MAX_PER_PAGE}"
            )));
        }

        if self.api.timeout_seconds == 0 {
            return Err(Error::Config("Request timeout must be non-zero".to_string()));
        }

        if self.harvest.keyword.trim().is_empty() {
            return Err(Error::Config("Search keyword must not be empty".to_string()));
        }

        Ok(())
    }
}
