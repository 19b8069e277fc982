//! Customization selector: binds a selection to the live pricing grid.

use printshop::{
    cart::AddToCart,
    customization::Customization,
    pricing::{CustomizationSelection, CustomizationTotals, Savings, calculate_totals},
};
use rust_decimal::Decimal;
use tokio::sync::watch;

use crate::{api::Model, pricing::PricingGridState};

/// One of the four customization toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    TextFront,
    TextBack,
    ImageFront,
    ImageBack,
}

/// Customization state for one model.
///
/// Totals are derived on every read from whatever grid the loader has published at that
/// moment, so toggling while the grid is still loading prices against the partial grid.
#[derive(Debug, Clone)]
pub struct CustomizationSelector {
    grid: watch::Receiver<PricingGridState>,
    selection: CustomizationSelection,
    base_model_price: Decimal,
    text: Option<String>,
    image: Option<String>,
}

impl CustomizationSelector {
    #[must_use]
    pub fn new(grid: watch::Receiver<PricingGridState>, base_model_price: Decimal) -> Self {
        Self {
            grid,
            selection: CustomizationSelection::default(),
            base_model_price,
            text: None,
            image: None,
        }
    }

    #[must_use]
    pub fn for_model(grid: watch::Receiver<PricingGridState>, model: &Model) -> Self {
        Self::new(grid, model.base_price)
    }

    #[must_use]
    pub fn selection(&self) -> CustomizationSelection {
        self.selection
    }

    pub fn set_selection(&mut self, selection: CustomizationSelection) {
        self.selection = selection;
    }

    pub fn set(&mut self, toggle: Toggle, enabled: bool) {
        let flag = match toggle {
            Toggle::TextFront => &mut self.selection.text_front,
            Toggle::TextBack => &mut self.selection.text_back,
            Toggle::ImageFront => &mut self.selection.image_front,
            Toggle::ImageBack => &mut self.selection.image_back,
        };

        *flag = enabled;
    }

    pub fn toggle(&mut self, toggle: Toggle) {
        let enabled = match toggle {
            Toggle::TextFront => self.selection.text_front,
            Toggle::TextBack => self.selection.text_back,
            Toggle::ImageFront => self.selection.image_front,
            Toggle::ImageBack => self.selection.image_back,
        };

        self.set(toggle, !enabled);
    }

    pub fn set_text(&mut self, text: Option<String>) {
        self.text = text.filter(|text| !text.trim().is_empty());
    }

    pub fn set_image(&mut self, image: Option<String>) {
        self.image = image.filter(|image| !image.trim().is_empty());
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.grid.borrow().loading
    }

    #[must_use]
    pub fn error(&self) -> Option<String> {
        self.grid.borrow().error.clone()
    }

    #[must_use]
    pub fn totals(&self) -> CustomizationTotals {
        calculate_totals(&self.grid.borrow().grid, &self.selection, self.base_model_price)
    }

    #[must_use]
    pub fn savings(&self) -> Savings {
        Savings::for_selection(&self.grid.borrow().grid, &self.selection)
    }

    /// Snapshot of the customization, priced against the current grid.
    #[must_use]
    pub fn customization(&self) -> Customization {
        Customization {
            selection: self.selection,
            text: self.text.clone(),
            image: self.image.clone(),
            totals: self.totals(),
        }
    }

    /// Add-to-cart payload for the customized model, priced at its grand total.
    #[must_use]
    pub fn add_to_cart(&self, model: &Model, variant_id: Option<&str>, quantity: u32) -> AddToCart {
        let mut payload = AddToCart::customized(&model.id, &model.name, self.customization())
            .with_quantity(quantity);

        if let Some(variant_id) = variant_id {
            payload = payload.with_variant(variant_id);
        }

        if let Some(image) = &model.image {
            payload = payload.with_image(image);
        }

        payload
    }
}
