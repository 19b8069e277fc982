//! Pricing Grid

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::pricing::{CustomizationType, Placement};

/// A single `{type, placement, price}` cell as exchanged with the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRecord {
    /// Customization type of the cell.
    #[serde(rename = "type")]
    pub kind: CustomizationType,

    /// Placement of the cell.
    pub placement: Placement,

    /// Cell price, sent as a JSON number.
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl PricingRecord {
    /// Creates a new record.
    pub const fn new(kind: CustomizationType, placement: Placement, price: Decimal) -> Self {
        Self {
            kind,
            placement,
            price,
        }
    }
}

/// Price table indexed by customization type, then placement.
///
/// Missing cells are absent rather than errors; callers that need a number use
/// [`PricingGrid::price_or_zero`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricingGrid {
    prices: FxHashMap<CustomizationType, FxHashMap<Placement, Decimal>>,
}

impl PricingGrid {
    /// Creates an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds a flat list of records into a grid. Later records overwrite earlier ones for the
    /// same cell.
    pub fn from_records(records: impl IntoIterator<Item = PricingRecord>) -> Self {
        records.into_iter().collect()
    }

    /// Sets the price of a cell.
    pub fn set(&mut self, kind: CustomizationType, placement: Placement, price: Decimal) {
        self.prices
            .entry(kind)
            .or_default()
            .insert(placement, price);
    }

    /// Price of a cell, if the grid has one.
    pub fn price(&self, kind: CustomizationType, placement: Placement) -> Option<Decimal> {
        self.prices
            .get(&kind)
            .and_then(|placements| placements.get(&placement))
            .copied()
    }

    /// Price of a resolved placement, or zero when the placement is unset or the cell is
    /// missing.
    pub fn price_or_zero(&self, kind: CustomizationType, placement: Option<Placement>) -> Decimal {
        placement
            .and_then(|placement| self.price(kind, placement))
            .unwrap_or(Decimal::ZERO)
    }

    /// Flat price charged when text and image are selected together.
    pub fn combo_price(&self) -> Option<Decimal> {
        self.price(CustomizationType::Combo, Placement::Any)
    }

    /// Number of priced cells.
    pub fn len(&self) -> usize {
        self.prices.values().map(FxHashMap::len).sum()
    }

    /// Check if the grid has no priced cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flattens the grid back into records, ordered by type then placement.
    pub fn records(&self) -> Vec<PricingRecord> {
        let mut records: Vec<PricingRecord> = self
            .prices
            .iter()
            .flat_map(|(kind, placements)| {
                placements
                    .iter()
                    .map(|(placement, price)| PricingRecord::new(*kind, *placement, *price))
            })
            .collect();

        records.sort_by_key(|record| (record.kind, record.placement));

        records
    }
}

impl FromIterator<PricingRecord> for PricingGrid {
    fn from_iter<I: IntoIterator<Item = PricingRecord>>(iter: I) -> Self {
        let mut grid = PricingGrid::new();

        for record in iter {
            grid.set(record.kind, record.placement, record.price);
        }

        grid
    }
}
