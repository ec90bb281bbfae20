//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional:
//! - `STOREFRONT_API_URL` - Backend base URL including the version prefix
//!   (default: `http://localhost:8080/api/v1`)
//! - `STOREFRONT_DATA_DIR` - Directory holding the persisted session and cart
//!   (default: `<platform data dir>/kube-ec`)
//! - `STOREFRONT_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: none)
//! - `STOREFRONT_PAGE_SIZE` - Products per listing page (default: 20)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default backend origin for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/v1";

/// Default number of products per listing page.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Name of the application directory under the platform data directory.
const DATA_DIR_NAME: &str = "kube-ec";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("No data directory available; set STOREFRONT_DATA_DIR")]
    NoDataDir,
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend API configuration
    pub api: ApiConfig,
    /// Directory for durable client storage
    pub data_dir: PathBuf,
    /// Products per listing page
    pub page_size: u32,
}

/// Backend API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Versioned base URL, always ending in `/`
    pub base_url: Url,
    /// Optional per-request timeout
    pub timeout: Option<Duration>,
}

impl ApiConfig {
    /// Build an API configuration from a base URL string.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if the URL is malformed or not http(s).
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_base_url("STOREFRONT_API_URL", base_url)?,
            timeout,
        })
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid, or if no
    /// data directory can be determined.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`StorefrontConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup("STOREFRONT_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());

        let timeout = lookup("STOREFRONT_API_TIMEOUT_SECS")
            .map(|raw| parse_positive("STOREFRONT_API_TIMEOUT_SECS", &raw))
            .transpose()?
            .map(|secs| Duration::from_secs(u64::from(secs)));

        let page_size = lookup("STOREFRONT_PAGE_SIZE")
            .map(|raw| parse_positive("STOREFRONT_PAGE_SIZE", &raw))
            .transpose()?
            .unwrap_or(DEFAULT_PAGE_SIZE);

        let data_dir = match lookup("STOREFRONT_DATA_DIR") {
            Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
            _ => default_data_dir()?,
        };

        Ok(Self {
            api: ApiConfig::new(&base_url, timeout)?,
            data_dir,
            page_size,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Platform data directory for the storefront.
fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|dir| dir.join(DATA_DIR_NAME))
        .ok_or(ConfigError::NoDataDir)
}

/// Parse and normalize the API base URL so relative joins keep the version prefix.
fn parse_base_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    if url.cannot_be_a_base() {
        return Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be an absolute URL".to_string(),
        ));
    }

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);

    Ok(url)
}

/// Parse a strictly positive integer variable.
fn parse_positive(var_name: &str, raw: &str) -> Result<u32, ConfigError> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err(ConfigError::InvalidEnvVar(
            var_name.to_string(),
            "must be greater than zero".to_string(),
        )),
        Ok(value) => Ok(value),
        Err(e) => Err(ConfigError::InvalidEnvVar(var_name.to_string(), e.to_string())),
    }
}
