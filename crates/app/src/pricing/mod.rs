//! Customization pricing: grid loading, shopper-side selection and the admin grid editor.

pub mod editor;
pub mod loader;
pub mod selector;

pub use editor::{EDITABLE_CELLS, EditorError, PricingGridEditor};
pub use loader::{LOAD_ERROR_MESSAGE, MountHandle, PricingGridLoader, PricingGridState};
pub use selector::{CustomizationSelector, Toggle};
