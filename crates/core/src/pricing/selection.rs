//! Customization Selection

use serde::{Deserialize, Serialize};

use crate::pricing::Placement;

/// Which sides carry text and which carry an image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationSelection {
    /// Text on the front.
    pub text_front: bool,

    /// Text on the back.
    pub text_back: bool,

    /// Image on the front.
    pub image_front: bool,

    /// Image on the back.
    pub image_back: bool,
}

impl CustomizationSelection {
    /// Creates a selection from the four flags.
    pub const fn new(text_front: bool, text_back: bool, image_front: bool, image_back: bool) -> Self {
        Self {
            text_front,
            text_back,
            image_front,
            image_back,
        }
    }

    /// Resolved text placement.
    pub const fn text_placement(&self) -> Option<Placement> {
        Placement::from_flags(self.text_front, self.text_back)
    }

    /// Resolved image placement.
    pub const fn image_placement(&self) -> Option<Placement> {
        Placement::from_flags(self.image_front, self.image_back)
    }

    /// Whether text and image are both placed somewhere.
    pub const fn is_combo(&self) -> bool {
        self.text_placement().is_some() && self.image_placement().is_some()
    }

    /// Whether nothing is selected.
    pub const fn is_empty(&self) -> bool {
        self.text_placement().is_none() && self.image_placement().is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_each_pair_independently() {
        let selection = CustomizationSelection::new(true, true, false, true);

        assert_eq!(selection.text_placement(), Some(Placement::Both));
        assert_eq!(selection.image_placement(), Some(Placement::Back));
        assert!(selection.is_combo());
    }

    #[test]
    fn single_type_is_not_a_combo() {
        let selection = CustomizationSelection::new(false, false, true, false);

        assert_eq!(selection.text_placement(), None);
        assert!(!selection.is_combo());
        assert!(!selection.is_empty());
    }

    #[test]
    fn default_selection_is_empty() {
        assert!(CustomizationSelection::default().is_empty());
    }
}
