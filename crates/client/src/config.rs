//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All optional:
//! - `INNOMART_API_URL` - Backend REST base URL (default: `http://localhost:5000/api`)
//! - `INNOMART_CATALOG_URL` - Catalog proxy base URL (default: `http://localhost:3000`)
//! - `INNOMART_PAGE_LIMIT` - Products per feed page (default: 10)
//! - `INNOMART_STATE_DIR` - Directory for the cached session and cart (default: `.innomart`)
//! - `INNOMART_HTTP_TIMEOUT_SECS` - Request timeout; unset or `0` means no timeout

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:5000/api";
const DEFAULT_CATALOG_URL: &str = "http://localhost:3000";
const DEFAULT_PAGE_LIMIT: u32 = 10;
const DEFAULT_STATE_DIR: &str = ".innomart";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend REST API base URL
    pub api_url: Url,
    /// Local catalog proxy base URL
    pub catalog_url: Url,
    /// Products requested per feed page
    pub page_limit: u32,
    /// Where the session and cart are cached between runs
    pub state_dir: PathBuf,
    /// Optional per-request timeout
    pub http_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for the given endpoints with every other setting at its
    /// default.
    #[must_use]
    pub fn new(api_url: Url, catalog_url: Url) -> Self {
        Self {
            api_url,
            catalog_url,
            page_limit: DEFAULT_PAGE_LIMIT,
            state_dir: PathBuf::from(DEFAULT_STATE_DIR),
            http_timeout: None,
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` for unparsable values.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = parse_base_url(
            "INNOMART_API_URL",
            &lookup("INNOMART_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        )?;
        let catalog_url = parse_base_url(
            "INNOMART_CATALOG_URL",
            &lookup("INNOMART_CATALOG_URL").unwrap_or_else(|| DEFAULT_CATALOG_URL.to_string()),
        )?;

        let page_limit = match lookup("INNOMART_PAGE_LIMIT") {
            Some(raw) => parse_page_limit(&raw)?,
            None => DEFAULT_PAGE_LIMIT,
        };

        let state_dir = lookup("INNOMART_STATE_DIR")
            .map_or_else(|| PathBuf::from(DEFAULT_STATE_DIR), PathBuf::from);

        let http_timeout = match lookup("INNOMART_HTTP_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => None,
        };

        Ok(Self {
            api_url,
            catalog_url,
            page_limit,
            state_dir,
            http_timeout,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse an http(s) base URL.
fn parse_base_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

/// Parse a page size, which must be at least 1.
fn parse_page_limit(raw: &str) -> Result<u32, ConfigError> {
    let key = "INNOMART_PAGE_LIMIT".to_string();
    let limit = raw
        .trim()
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.clone(), e.to_string()))?;
    if limit == 0 {
        return Err(ConfigError::InvalidEnvVar(key, "must be at least 1".to_string()));
    }
    Ok(limit)
}

/// Parse a timeout in seconds; `0` disables it.
fn parse_timeout(raw: &str) -> Result<Option<Duration>, ConfigError> {
    let secs = raw.trim().parse::<u64>().map_err(|e| {
        ConfigError::InvalidEnvVar("INNOMART_HTTP_TIMEOUT_SECS".to_string(), e.to_string())
    })?;
    Ok((secs > 0).then(|| Duration::from_secs(secs)))
}
