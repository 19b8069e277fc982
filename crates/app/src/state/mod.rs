//! Application state and its persistence.

use std::{fmt, str::FromStr, sync::Arc};

use printshop::cart::{Cart, CartAction};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::api::Session;

mod store;

pub use store::{FileStateStore, MemoryStateStore, MockStateStore, StateStore, StateStoreError};

/// Key the persisted slices are stored under.
pub const ROOT_KEY: &str = "root";

/// Colour theme of the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {other}")),
        }
    }
}

/// Signed-in user as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    pub email: String,

    #[serde(default)]
    pub is_admin: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    /// Profile written by the storefront's login into the shared `auth` slice. This client
    /// never signs in itself; it only carries the profile through restore and persist.
    #[serde(default)]
    pub user: Option<UserProfile>,

    #[serde(default)]
    pub session: Option<Session>,
}

impl AuthState {
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }
}

/// Everything the storefront keeps between runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    #[serde(default)]
    pub auth: AuthState,

    #[serde(default)]
    pub cart: Cart,

    #[serde(default)]
    pub theme: Theme,
}

impl AppState {
    pub fn dispatch(&mut self, action: CartAction) {
        debug!(?action, "cart action");

        self.cart.reduce(action);

        if let Some(error) = self.cart.error() {
            warn!("cart action rejected: {error}");
        }
    }

    /// Replaces the session, keeping the user only if a session remains.
    pub fn set_session(&mut self, session: Option<Session>) {
        if session.is_none() {
            self.auth.user = None;
        }

        self.auth.session = session;
    }

    /// Signs out: forgets the user and tokens.
    pub fn clear_session(&mut self) {
        self.auth = AuthState::default();
    }
}

/// The persisted slices of [`AppState`].
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PersistedSlices<'a> {
    auth: &'a AuthState,
    cart: &'a Cart,
    theme: Theme,
}

/// Saves and restores the whitelisted slices of [`AppState`] as one blob under [`ROOT_KEY`].
#[derive(Clone)]
pub struct Persistor {
    store: Arc<dyn StateStore>,
}

impl Persistor {
    #[must_use]
    pub fn new(store: Arc<dyn StateStore>) -> Self {
        Self { store }
    }

    /// Restores the persisted state; anything missing or unreadable falls back to defaults.
    #[must_use]
    pub fn restore(&self) -> AppState {
        let value = match self.store.load(ROOT_KEY) {
            Ok(Some(value)) => value,
            Ok(None) => {
                debug!("no persisted state; starting fresh");
                return AppState::default();
            }
            Err(error) => {
                warn!("failed to read persisted state, starting fresh: {error}");
                return AppState::default();
            }
        };

        match serde_json::from_value(value) {
            Ok(state) => state,
            Err(error) => {
                warn!("persisted state is corrupt, starting fresh: {error}");
                AppState::default()
            }
        }
    }

    /// Writes the persisted slices of `state`.
    ///
    /// # Errors
    ///
    /// Returns the store error if the blob cannot be encoded or written.
    pub fn persist(&self, state: &AppState) -> Result<(), StateStoreError> {
        let slices = PersistedSlices {
            auth: &state.auth,
            cart: &state.cart,
            theme: state.theme,
        };

        self.store.save(ROOT_KEY, serde_json::to_value(slices)?)?;

        debug!(items = state.cart.len(), "state persisted");

        Ok(())
    }

    /// Deletes the persisted blob.
    ///
    /// # Errors
    ///
    /// Returns the store error if the blob cannot be removed.
    pub fn purge(&self) -> Result<(), StateStoreError> {
        self.store.remove(ROOT_KEY)
    }
}
