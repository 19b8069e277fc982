//! Customization Pricing

use rust_decimal::{Decimal, RoundingStrategy};

pub mod grid;
pub mod placement;
pub mod selection;
pub mod totals;

pub use grid::{PricingGrid, PricingRecord};
pub use placement::{CustomizationType, ParseError, Placement};
pub use selection::CustomizationSelection;
pub use totals::{CustomizationTotals, Savings, calculate_totals, customization_price, savings};

/// Rounds a price to 2 decimal places, midpoint away from zero.
pub fn round_price(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
