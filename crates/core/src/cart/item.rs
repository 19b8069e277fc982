//! Cart items

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{cart::CartKey, customization::Customization};

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Line identity.
    pub key: CartKey,

    /// Display name.
    pub name: String,

    /// Unit price used for line totals.
    pub price: Decimal,

    /// Display image.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    /// Quantity, at least 1.
    pub quantity: u32,
}

impl CartItem {
    /// Unit price times quantity.
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }

    /// Customization carried by the line, if any.
    pub fn customization(&self) -> Option<&Customization> {
        self.key.customization()
    }
}

/// Payload of an "add to cart" action.
///
/// `product_id` is optional because payloads come from loosely typed sources; a payload
/// without one is rejected by the cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCart {
    /// Product being added.
    pub product_id: Option<String>,

    /// Selected variant.
    #[serde(default)]
    pub variant_id: Option<String>,

    /// Display name.
    pub name: String,

    /// Unit price.
    pub price: Decimal,

    /// Display image.
    #[serde(default)]
    pub image: Option<String>,

    /// Requested quantity; zero counts as one.
    #[serde(default)]
    pub quantity: u32,

    /// Customization, if any.
    #[serde(default)]
    pub customization: Option<Customization>,
}

impl AddToCart {
    /// Creates a payload for one unit of a product.
    pub fn new(product_id: impl Into<String>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            product_id: Some(product_id.into()),
            name: name.into(),
            price,
            quantity: 1,
            ..Self::default()
        }
    }

    /// Creates a payload for one unit of a customized model, priced at its grand total.
    pub fn customized(
        model_id: impl Into<String>,
        name: impl Into<String>,
        customization: Customization,
    ) -> Self {
        let price = customization.unit_price();

        Self {
            customization: Some(customization),
            ..Self::new(model_id, name, price)
        }
    }

    /// Sets the variant.
    #[must_use]
    pub fn with_variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    /// Sets the image.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Sets the quantity.
    #[must_use]
    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    /// Line identity of the payload, if it names a product.
    pub fn key(&self) -> Option<CartKey> {
        let product_id = self
            .product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())?;

        let mut key = CartKey::new(product_id);

        if let Some(variant_id) = self.variant_id.as_deref().filter(|id| !id.is_empty()) {
            key = key.with_variant(variant_id);
        }

        if let Some(customization) = &self.customization {
            key = key.with_customization(customization.clone());
        }

        Some(key)
    }

    /// Quantity to add, never zero.
    pub fn effective_quantity(&self) -> u32 {
        self.quantity.max(1)
    }
}

#[cfg(test)]
mod tests {
    use crate::pricing::{CustomizationSelection, CustomizationTotals};

    use super::*;

    #[test]
    fn line_total_multiplies_unit_price() {
        let item = CartItem {
            key: CartKey::new("cap"),
            name: "Cap".to_string(),
            price: Decimal::new(1250, 2),
            image: None,
            quantity: 3,
        };

        assert_eq!(item.line_total(), Decimal::new(3750, 2));
    }

    #[test]
    fn key_requires_a_product_id() {
        let mut payload = AddToCart::new("tee", "Tee", Decimal::TEN);
        assert!(payload.key().is_some());

        payload.product_id = Some("   ".to_string());
        assert!(payload.key().is_none());

        payload.product_id = None;
        assert!(payload.key().is_none());
    }

    #[test]
    fn customized_payload_uses_grand_total() {
        let totals = CustomizationTotals {
            customization_price: Decimal::from(15),
            base_model_price: Decimal::new(2999, 2),
            grand_total: Decimal::new(4499, 2),
        };

        let customization =
            Customization::new(CustomizationSelection::new(true, false, true, false), totals);

        let payload = AddToCart::customized("model-1", "Classic Tee", customization.clone());

        assert_eq!(payload.price, Decimal::new(4499, 2));
        assert_eq!(
            payload.key(),
            Some(CartKey::new("model-1").with_customization(customization))
        );
    }

    #[test]
    fn zero_quantity_counts_as_one() {
        let payload = AddToCart::new("mug", "Mug", Decimal::TEN).with_quantity(0);

        assert_eq!(payload.effective_quantity(), 1);
    }
}
