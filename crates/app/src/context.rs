//! App Context

use std::sync::Arc;

use printshop::money::{MoneyError, parse_currency};
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    api::{ApiClient, CatalogApi, PricingApi},
    config::AppConfig,
    state::{AppState, FileStateStore, Persistor, StateStore, StateStoreError},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("invalid currency: {0}")]
    Currency(#[from] MoneyError),
}

/// Restored state plus the clients commands work with.
pub struct AppContext {
    pub state: AppState,
    pub client: Arc<ApiClient>,
    pub pricing: Arc<dyn PricingApi>,
    pub catalog: Arc<dyn CatalogApi>,
    pub currency: &'static Currency,
    persistor: Persistor,
}

impl AppContext {
    /// Restores persisted state from the configured file and builds the API client.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured currency is unknown.
    pub fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let store = Arc::new(FileStateStore::new(&config.storefront.state_path));

        Self::with_store(config, store)
    }

    /// Like [`AppContext::from_config`], with an explicit state store.
    ///
    /// # Errors
    ///
    /// Returns an error when the configured currency is unknown.
    pub fn with_store(
        config: &AppConfig,
        store: Arc<dyn StateStore>,
    ) -> Result<Self, AppInitError> {
        let currency = parse_currency(&config.storefront.currency)?;
        let persistor = Persistor::new(store);
        let state = persistor.restore();

        let client = Arc::new(ApiClient::new(
            config.api.api_base_url.clone(),
            state.auth.session.clone(),
        ));

        debug!(
            api = client.base_url(),
            authenticated = state.auth.is_authenticated(),
            "app context ready"
        );

        Ok(Self {
            pricing: Arc::clone(&client) as Arc<dyn PricingApi>,
            catalog: Arc::clone(&client) as Arc<dyn CatalogApi>,
            client,
            state,
            currency,
            persistor,
        })
    }

    /// Copies the client's session (possibly rotated or cleared) into the state.
    ///
    /// Returns `true` if the session changed.
    pub async fn sync_session(&mut self) -> bool {
        let session = self.client.session().await;

        if session == self.state.auth.session {
            return false;
        }

        if session.is_none() {
            info!("session cleared");
        }

        self.state.set_session(session);

        true
    }

    /// Syncs the session and writes the persisted slices.
    ///
    /// # Errors
    ///
    /// Returns the store error if the state cannot be written.
    pub async fn persist(&mut self) -> Result<(), StateStoreError> {
        self.sync_session().await;

        self.persistor.persist(&self.state)
    }
}
