//! Application state passed to every page controller.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::StorefrontConfig;
use crate::error::AppError;
use crate::sequencer::RequestSequencer;
use crate::storage::{DurableStorage, FileStorage};
use crate::stores::{CartStore, PersistentCart, PersistentSession, SessionStore};

/// Application state owned by the front end and lent to page controllers.
///
/// Read-only controllers take `&AppState`; controllers that change the
/// session or cart take `&mut AppState`.
pub struct AppState {
    config: StorefrontConfig,
    api: ApiClient,
    session: Box<dyn SessionStore>,
    cart: Box<dyn CartStore>,
    search: RequestSequencer,
}

impl AppState {
    /// Create application state with stores backed by files in the
    /// configured data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: StorefrontConfig) -> Result<Self, AppError> {
        let storage: Arc<dyn DurableStorage> = Arc::new(FileStorage::new(&config.data_dir));
        tracing::debug!(data_dir = %config.data_dir.display(), "Opening durable storage");
        Self::with_storage(config, storage)
    }

    /// Create application state with both stores over `storage`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_storage(
        config: StorefrontConfig,
        storage: Arc<dyn DurableStorage>,
    ) -> Result<Self, AppError> {
        let session = PersistentSession::load(Arc::clone(&storage));
        let cart = PersistentCart::load(storage);
        Self::with_stores(config, Box::new(session), Box::new(cart))
    }

    /// Create application state with caller-supplied stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn with_stores(
        config: StorefrontConfig,
        session: Box<dyn SessionStore>,
        cart: Box<dyn CartStore>,
    ) -> Result<Self, AppError> {
        let api = ApiClient::new(&config.api)?;

        Ok(Self {
            config,
            api,
            session,
            cart,
            search: RequestSequencer::new(),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub const fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Get a reference to the API client.
    #[must_use]
    pub const fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Get a reference to the session store.
    #[must_use]
    pub fn session(&self) -> &dyn SessionStore {
        self.session.as_ref()
    }

    /// Get a mutable reference to the session store.
    pub fn session_mut(&mut self) -> &mut dyn SessionStore {
        self.session.as_mut()
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn cart(&self) -> &dyn CartStore {
        self.cart.as_ref()
    }

    /// Get a mutable reference to the cart store.
    pub fn cart_mut(&mut self) -> &mut dyn CartStore {
        self.cart.as_mut()
    }

    /// Sequencer for product searches.
    #[must_use]
    pub const fn search_sequencer(&self) -> &RequestSequencer {
        &self.search
    }
}
