//! Customization

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{CustomizationSelection, CustomizationTotals};

/// A customization attached to a cart line.
///
/// Equality and hashing cover every field, so two lines of the same product with different
/// text, artwork, placements or priced totals stay distinct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customization {
    /// Selected placements.
    pub selection: CustomizationSelection,

    /// Text to print.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Artwork reference (URL or upload id).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Totals at the time the customization was added.
    pub totals: CustomizationTotals,
}

impl Customization {
    /// Creates a customization from a selection and its priced totals.
    pub fn new(selection: CustomizationSelection, totals: CustomizationTotals) -> Self {
        Self {
            selection,
            text: None,
            image: None,
            totals,
        }
    }

    /// Sets the text to print.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Sets the artwork reference.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Unit price of a model carrying this customization.
    pub fn unit_price(&self) -> Decimal {
        self.totals.grand_total
    }
}
