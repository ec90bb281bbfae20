//! End-to-end tests for the Kube EC storefront.
//!
//! Each test drives the page controllers against an `httpmock` gateway, with
//! the session and cart persisted to files in a temporary data directory.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p kube-ec-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `shopping_flow` - Login, cart, checkout and order history
//! - `persistence` - Session and cart surviving a restart
//! - `search` - Superseded product searches

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::Path;
use std::sync::Arc;

use httpmock::MockServer;
use kube_ec_storefront::config::{ApiConfig, ConfigError, StorefrontConfig};
use kube_ec_storefront::error::AppError;
use kube_ec_storefront::state::AppState;
use kube_ec_storefront::storage::FileStorage;
use tempfile::TempDir;

/// A mock gateway plus a scratch data directory.
pub struct TestContext {
    pub server: MockServer,
    data_dir: TempDir,
}

impl TestContext {
    /// Start a mock gateway and create an empty data directory.
    ///
    /// # Panics
    ///
    /// Panics if the temporary directory cannot be created.
    #[allow(clippy::expect_used)]
    pub async fn new() -> Self {
        Self {
            server: MockServer::start_async().await,
            data_dir: TempDir::new().expect("Failed to create data directory"),
        }
    }

    /// Configuration pointing at the mock gateway and the scratch directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the mock server URL is rejected.
    pub fn config(&self) -> Result<StorefrontConfig, ConfigError> {
        Ok(StorefrontConfig {
            api: ApiConfig::new(&self.server.url("/api/v1"), None)?,
            data_dir: self.data_dir.path().to_path_buf(),
            page_size: 20,
        })
    }

    /// Build application state, as a fresh process would on start-up.
    ///
    /// Calling this again simulates a restart over the same data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration or HTTP client is invalid.
    pub fn start(&self) -> Result<AppState, AppError> {
        let storage = Arc::new(FileStorage::new(self.data_dir.path()));
        AppState::with_storage(self.config()?, storage)
    }

    /// Directory holding the persisted records.
    #[must_use]
    pub fn data_dir(&self) -> &Path {
        self.data_dir.path()
    }
}
