//! Cart line identity

use std::hash::{Hash, Hasher};

use rustc_hash::FxHasher;
use serde::{Deserialize, Serialize};

use crate::customization::Customization;

/// Identity of a cart line: product, optional variant and optional customization.
///
/// Two lines merge only when all three are structurally equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartKey {
    product_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    variant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    customization: Option<Customization>,
}

impl CartKey {
    /// Creates a key for a plain product.
    pub fn new(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            variant_id: None,
            customization: None,
        }
    }

    /// Sets the variant.
    #[must_use]
    pub fn with_variant(mut self, variant_id: impl Into<String>) -> Self {
        self.variant_id = Some(variant_id.into());
        self
    }

    /// Sets the customization.
    #[must_use]
    pub fn with_customization(mut self, customization: Customization) -> Self {
        self.customization = Some(customization);
        self
    }

    /// Product id.
    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    /// Variant id, if any.
    pub fn variant_id(&self) -> Option<&str> {
        self.variant_id.as_deref()
    }

    /// Customization, if any.
    pub fn customization(&self) -> Option<&Customization> {
        self.customization.as_ref()
    }

    /// Short, deterministic handle for referring to the line, e.g. from a command line.
    pub fn line_id(&self) -> String {
        let mut hasher = FxHasher::default();
        self.hash(&mut hasher);

        format!("{:016x}", hasher.finish())
    }
}

#[cfg(test)]
mod tests {
    use crate::pricing::{CustomizationSelection, CustomizationTotals};

    use super::*;

    fn front_text() -> Customization {
        Customization::new(
            CustomizationSelection::new(true, false, false, false),
            CustomizationTotals::default(),
        )
        .with_text("Hello")
    }

    #[test]
    fn equal_parts_make_equal_keys() {
        let a = CartKey::new("tee").with_variant("black-m").with_customization(front_text());
        let b = CartKey::new("tee").with_variant("black-m").with_customization(front_text());

        assert_eq!(a, b);
        assert_eq!(a.line_id(), b.line_id());
    }

    #[test]
    fn customization_distinguishes_lines_of_the_same_product() {
        let plain = CartKey::new("tee");
        let customized = CartKey::new("tee").with_customization(front_text());

        assert_ne!(plain, customized);
        assert_ne!(plain.line_id(), customized.line_id());
    }

    #[test]
    fn variant_distinguishes_lines() {
        assert_ne!(
            CartKey::new("tee").with_variant("s"),
            CartKey::new("tee").with_variant("m")
        );
    }

    #[test]
    fn line_id_is_sixteen_hex_digits() {
        let line_id = CartKey::new("mug").line_id();

        assert_eq!(line_id.len(), 16);
        assert!(line_id.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
