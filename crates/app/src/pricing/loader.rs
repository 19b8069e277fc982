//! Pricing grid loader.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use printshop::pricing::PricingGrid;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::api::{ApiError, PricingApi};

/// Message shown when the grid cannot be fetched.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load customization pricing";

/// Loading/error/data state of the pricing grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingGridState {
    /// Last successfully loaded grid; empty until the first load succeeds.
    pub grid: PricingGrid,
    pub loading: bool,
    pub error: Option<String>,
}

/// Clonable handle to a loader's mounted flag.
#[derive(Debug, Clone)]
pub struct MountHandle(Arc<AtomicBool>);

impl MountHandle {
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Marks the owner as gone; responses arriving afterwards are discarded.
    pub fn unmount(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Fetches the pricing grid and publishes its state to subscribers.
///
/// A failed fetch keeps the last-known grid and records a message; there is no retry.
pub struct PricingGridLoader {
    api: Arc<dyn PricingApi>,
    state: watch::Sender<PricingGridState>,
    mounted: MountHandle,
}

impl PricingGridLoader {
    #[must_use]
    pub fn mount(api: Arc<dyn PricingApi>) -> Self {
        let (state, _) = watch::channel(PricingGridState::default());

        Self {
            api,
            state,
            mounted: MountHandle(Arc::new(AtomicBool::new(true))),
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PricingGridState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> PricingGridState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn mount_handle(&self) -> MountHandle {
        self.mounted.clone()
    }

    pub fn unmount(&self) {
        self.mounted.unmount();
    }

    /// Fetches the grid and publishes the outcome.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording it in the published state. A response that
    /// arrives after unmount is discarded and reported as `Ok`.
    pub async fn load(&self) -> Result<(), ApiError> {
        if !self.mounted.is_mounted() {
            return Ok(());
        }

        self.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });

        let result = self.api.get_pricing_grid().await;

        if !self.mounted.is_mounted() {
            debug!("discarding pricing grid response received after unmount");
            return Ok(());
        }

        match result {
            Ok(grid) => {
                self.state.send_modify(|state| {
                    state.grid = grid;
                    state.loading = false;
                });

                Ok(())
            }
            Err(error) => {
                warn!("{LOAD_ERROR_MESSAGE}: {error}");

                self.state.send_modify(|state| {
                    state.loading = false;
                    state.error = Some(format!("{LOAD_ERROR_MESSAGE}: {error}"));
                });

                Err(error)
            }
        }
    }
}

impl Drop for PricingGridLoader {
    fn drop(&mut self) {
        self.unmount();
    }
}

#[cfg(test)]
mod tests {
    use printshop::pricing::{CustomizationType, Placement, PricingRecord};
    use reqwest::StatusCode;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::api::MockPricingApi;

    use super::*;

    fn grid() -> PricingGrid {
        PricingGrid::from_records([PricingRecord::new(
            CustomizationType::Text,
            Placement::Front,
            Decimal::from(5),
        )])
    }

    fn server_error() -> ApiError {
        ApiError::UnexpectedResponse {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: "boom".to_string(),
        }
    }

    #[tokio::test]
    async fn successful_load_publishes_grid() -> TestResult {
        let mut api = MockPricingApi::new();
        api.expect_get_pricing_grid()
            .times(1)
            .returning(|| Ok(grid()));

        let loader = PricingGridLoader::mount(Arc::new(api));
        let mut updates = loader.subscribe();

        loader.load().await?;

        assert!(updates.has_changed()?, "subscribers should be notified");

        let state = updates.borrow_and_update().clone();

        assert_eq!(state.grid, grid());
        assert!(!state.loading);
        assert!(state.error.is_none());

        Ok(())
    }

    #[tokio::test]
    async fn failed_load_keeps_last_known_grid() -> TestResult {
        let mut api = MockPricingApi::new();
        let mut calls = 0;
        api.expect_get_pricing_grid().times(2).returning(move || {
            calls += 1;

            if calls == 1 {
                Ok(grid())
            } else {
                Err(server_error())
            }
        });

        let loader = PricingGridLoader::mount(Arc::new(api));

        loader.load().await?;
        let result = loader.load().await;

        let state = loader.snapshot();

        assert!(result.is_err(), "second load should fail");
        assert_eq!(state.grid, grid());
        assert!(!state.loading);
        assert!(
            state
                .error
                .as_deref()
                .is_some_and(|message| message.starts_with(LOAD_ERROR_MESSAGE)),
            "unexpected error message: {:?}",
            state.error
        );

        Ok(())
    }

    #[tokio::test]
    async fn first_load_failure_leaves_grid_empty() {
        let mut api = MockPricingApi::new();
        api.expect_get_pricing_grid()
            .returning(|| Err(server_error()));

        let loader = PricingGridLoader::mount(Arc::new(api));

        let result = loader.load().await;

        assert!(result.is_err(), "load should fail");
        assert!(loader.snapshot().grid.is_empty());
    }

    #[tokio::test]
    async fn response_after_unmount_is_discarded() -> TestResult {
        let mut api = MockPricingApi::new();
        let handle_slot: Arc<std::sync::OnceLock<MountHandle>> = Arc::default();
        let slot = Arc::clone(&handle_slot);

        api.expect_get_pricing_grid().times(1).returning(move || {
            if let Some(handle) = slot.get() {
                handle.unmount();
            }
            Ok(grid())
        });

        let loader = PricingGridLoader::mount(Arc::new(api));
        assert!(
            handle_slot.set(loader.mount_handle()).is_ok(),
            "mount handle should only be set once"
        );

        loader.load().await?;

        let state = loader.snapshot();

        assert!(state.grid.is_empty(), "late response must not be applied");
        assert!(!loader.mount_handle().is_mounted());

        Ok(())
    }

    #[tokio::test]
    async fn unmounted_loader_does_not_fetch() -> TestResult {
        let mut api = MockPricingApi::new();
        api.expect_get_pricing_grid().times(0);

        let loader = PricingGridLoader::mount(Arc::new(api));
        loader.unmount();

        loader.load().await?;

        assert_eq!(loader.snapshot(), PricingGridState::default());

        Ok(())
    }
}
