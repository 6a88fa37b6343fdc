//! Application state shared across handlers.

use std::sync::Arc;

use crate::auth::{CredentialStore, TokenService};
use crate::config::PortalConfig;
use crate::store::RowStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Everything in here is read-only for the
/// process lifetime (the Sheets token cache inside the store is the one
/// internally-mutable exception, and it carries no session state).
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: PortalConfig,
    credentials: CredentialStore,
    tokens: TokenService,
    store: Arc<dyn RowStore>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Builds the credential store and token service from configuration;
    /// the row store is passed in so tests can substitute an in-memory
    /// backend.
    #[must_use]
    pub fn new(config: PortalConfig, store: Arc<dyn RowStore>) -> Self {
        let credentials = CredentialStore::from_config(&config);
        let tokens = TokenService::new(&config.token_secret);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                credentials,
                tokens,
                store,
            }),
        }
    }

    /// Get a reference to the portal configuration.
    #[must_use]
    pub fn config(&self) -> &PortalConfig {
        &self.inner.config
    }

    /// Get a reference to the credential store.
    #[must_use]
    pub fn credentials(&self) -> &CredentialStore {
        &self.inner.credentials
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    /// Get a reference to the row store.
    #[must_use]
    pub fn store(&self) -> &dyn RowStore {
        self.inner.store.as_ref()
    }
}
