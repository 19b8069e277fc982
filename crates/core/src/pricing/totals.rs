//! Customization Totals

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::pricing::{
    CustomizationSelection, CustomizationType, Placement, PricingGrid, round_price,
};

/// Prices derived from a grid, a selection and a model's base price.
///
/// All fields are rounded to 2 decimal places.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationTotals {
    /// Price of the selected customization.
    pub customization_price: Decimal,

    /// Base price of the model being customized.
    pub base_model_price: Decimal,

    /// Base price plus customization price.
    pub grand_total: Decimal,
}

/// Informational "both sides" savings for the current selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Savings {
    /// Saved on text printed on both sides.
    pub text: Option<Decimal>,

    /// Saved on an image printed on both sides.
    pub image: Option<Decimal>,
}

impl Savings {
    /// Computes the savings shown for a selection.
    pub fn for_selection(grid: &PricingGrid, selection: &CustomizationSelection) -> Self {
        Self {
            text: savings(grid, CustomizationType::Text, selection.text_placement()),
            image: savings(grid, CustomizationType::Image, selection.image_placement()),
        }
    }
}

/// Price of the selected customization.
///
/// When text and image are both placed and the grid has a `combo`/`any` price, that price
/// replaces the sum of the individual prices outright. Missing cells count as zero.
pub fn customization_price(grid: &PricingGrid, selection: &CustomizationSelection) -> Decimal {
    match (selection.is_combo(), grid.combo_price()) {
        (true, Some(combo)) => round_price(combo),
        _ => {
            let text = grid.price_or_zero(CustomizationType::Text, selection.text_placement());
            let image = grid.price_or_zero(CustomizationType::Image, selection.image_placement());

            round_price(text + image)
        }
    }
}

/// Derives the totals for a customized model.
pub fn calculate_totals(
    grid: &PricingGrid,
    selection: &CustomizationSelection,
    base_model_price: Decimal,
) -> CustomizationTotals {
    let customization_price = customization_price(grid, selection);
    let base_model_price = round_price(base_model_price);

    CustomizationTotals {
        customization_price,
        base_model_price,
        grand_total: round_price(base_model_price + customization_price),
    }
}

/// Amount saved by printing on both sides instead of pricing front and back separately.
///
/// Only reported for a placement resolved to [`Placement::Both`], and only when positive.
pub fn savings(
    grid: &PricingGrid,
    kind: CustomizationType,
    placement: Option<Placement>,
) -> Option<Decimal> {
    if placement != Some(Placement::Both) {
        return None;
    }

    let front = grid.price_or_zero(kind, Some(Placement::Front));
    let back = grid.price_or_zero(kind, Some(Placement::Back));
    let both = grid.price_or_zero(kind, Some(Placement::Both));

    let saved = round_price(front + back - both);

    (saved > Decimal::ZERO).then_some(saved)
}

#[cfg(test)]
mod tests {
    use crate::pricing::PricingRecord;

    use super::*;

    fn scenario_grid() -> PricingGrid {
        let cells = [
            (CustomizationType::Text, Placement::Front, 5),
            (CustomizationType::Text, Placement::Back, 5),
            (CustomizationType::Text, Placement::Both, 8),
            (CustomizationType::Image, Placement::Front, 10),
            (CustomizationType::Image, Placement::Back, 10),
            (CustomizationType::Image, Placement::Both, 18),
            (CustomizationType::Combo, Placement::Any, 20),
        ];

        cells
            .into_iter()
            .map(|(kind, placement, price)| {
                PricingRecord::new(kind, placement, Decimal::from(price))
            })
            .collect()
    }

    fn grid_without_combo() -> PricingGrid {
        scenario_grid()
            .records()
            .into_iter()
            .filter(|record| record.kind != CustomizationType::Combo)
            .collect()
    }

    fn all_selections() -> impl Iterator<Item = CustomizationSelection> {
        (0_u8..16).map(|bits| {
            CustomizationSelection::new(
                bits & 0b0001 != 0,
                bits & 0b0010 != 0,
                bits & 0b0100 != 0,
                bits & 0b1000 != 0,
            )
        })
    }

    #[test]
    fn front_text_and_front_image_sum_individual_prices_without_combo() {
        let grid = grid_without_combo();
        let selection = CustomizationSelection::new(true, false, true, false);

        assert_eq!(customization_price(&grid, &selection), Decimal::from(15));
    }

    #[test]
    fn combo_price_overrides_sum_when_both_types_are_placed() {
        let grid = scenario_grid();

        let front_only = CustomizationSelection::new(true, false, true, false);
        let both_sides = CustomizationSelection::new(true, true, true, true);

        // Any text + image pairing is a combo once the grid prices one.
        assert_eq!(customization_price(&grid, &front_only), Decimal::from(20));
        assert_eq!(customization_price(&grid, &both_sides), Decimal::from(20));
    }

    #[test]
    fn single_type_uses_its_own_cell() {
        let grid = scenario_grid();

        assert_eq!(
            customization_price(&grid, &CustomizationSelection::new(true, true, false, false)),
            Decimal::from(8)
        );
        assert_eq!(
            customization_price(&grid, &CustomizationSelection::new(false, false, false, true)),
            Decimal::from(10)
        );
    }

    #[test]
    fn every_flag_combination_follows_the_pricing_rule() {
        let grid = scenario_grid();

        for selection in all_selections() {
            let text = grid.price_or_zero(CustomizationType::Text, selection.text_placement());
            let image = grid.price_or_zero(CustomizationType::Image, selection.image_placement());

            let expected = if selection.is_combo() {
                Decimal::from(20)
            } else {
                text + image
            };

            assert_eq!(
                customization_price(&grid, &selection),
                expected,
                "unexpected price for {selection:?}"
            );
        }
    }

    #[test]
    fn combo_without_combo_cell_falls_back_to_sum() {
        let grid = grid_without_combo();

        let selection = CustomizationSelection::new(true, true, true, true);

        assert_eq!(customization_price(&grid, &selection), Decimal::from(26));
    }

    #[test]
    fn grand_total_adds_base_price() {
        let grid = grid_without_combo();

        let selection = CustomizationSelection::new(true, false, true, false);
        let totals = calculate_totals(&grid, &selection, Decimal::new(2999, 2));

        assert_eq!(totals.customization_price, Decimal::from(15));
        assert_eq!(totals.base_model_price, Decimal::new(2999, 2));
        assert_eq!(totals.grand_total, Decimal::new(4499, 2));
    }

    #[test]
    fn grand_total_is_always_rounded_sum() {
        let grid = scenario_grid();
        let base = Decimal::new(19_995, 3);

        for selection in all_selections() {
            let totals = calculate_totals(&grid, &selection, base);

            assert_eq!(
                totals.grand_total,
                round_price(totals.base_model_price + totals.customization_price),
                "grand total mismatch for {selection:?}"
            );
        }
    }

    #[test]
    fn empty_grid_prices_everything_at_zero() {
        let grid = PricingGrid::new();

        for selection in all_selections() {
            assert_eq!(customization_price(&grid, &selection), Decimal::ZERO);
        }
    }

    #[test]
    fn savings_only_for_both_placements() {
        let grid = scenario_grid();

        assert_eq!(
            savings(&grid, CustomizationType::Text, Some(Placement::Both)),
            Some(Decimal::from(2))
        );
        assert_eq!(
            savings(&grid, CustomizationType::Image, Some(Placement::Both)),
            Some(Decimal::from(2))
        );
        assert_eq!(
            savings(&grid, CustomizationType::Text, Some(Placement::Front)),
            None
        );
        assert_eq!(savings(&grid, CustomizationType::Text, None), None);
    }

    #[test]
    fn savings_hidden_when_not_positive() {
        let mut grid = scenario_grid();
        grid.set(CustomizationType::Text, Placement::Both, Decimal::from(12));

        assert_eq!(
            savings(&grid, CustomizationType::Text, Some(Placement::Both)),
            None
        );
    }

    #[test]
    fn savings_for_selection_reports_each_type() {
        let grid = scenario_grid();
        let selection = CustomizationSelection::new(true, true, true, false);

        let shown = Savings::for_selection(&grid, &selection);

        assert_eq!(shown.text, Some(Decimal::from(2)));
        assert_eq!(shown.image, None);
    }
}
