//! Admin pricing grid editor.

use std::{collections::BTreeMap, fs, io, path::Path, str::FromStr, sync::Arc};

use printshop::pricing::{CustomizationType, ParseError, Placement, PricingGrid, PricingRecord};
use rust_decimal::Decimal;
use serde_norway::Value;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    api::{ApiError, PricingApi},
    pricing::PricingGridLoader,
};

/// Cells an admin can edit, in display order.
pub const EDITABLE_CELLS: [(CustomizationType, Placement); 7] = [
    (CustomizationType::Text, Placement::Front),
    (CustomizationType::Text, Placement::Back),
    (CustomizationType::Text, Placement::Both),
    (CustomizationType::Image, Placement::Front),
    (CustomizationType::Image, Placement::Back),
    (CustomizationType::Image, Placement::Both),
    (CustomizationType::Combo, Placement::Any),
];

#[derive(Debug, Error)]
pub enum EditorError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("invalid price for {kind} {placement}: {value:?}")]
    InvalidPrice {
        kind: CustomizationType,
        placement: Placement,
        value: String,
    },

    #[error("{kind} {placement} is not an editable pricing cell")]
    NotEditable {
        kind: CustomizationType,
        placement: Placement,
    },

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("invalid pricing yaml: {0}")]
    Yaml(#[from] serde_norway::Error),

    #[error("invalid pricing yaml: {0}")]
    YamlShape(String),

    #[error("failed to read pricing file: {0}")]
    Io(#[from] io::Error),
}

/// Text fields for the editable cells of a pricing grid.
///
/// Saving replaces the whole grid on the backend with the non-empty fields.
pub struct PricingGridEditor {
    api: Arc<dyn PricingApi>,
    fields: BTreeMap<(CustomizationType, Placement), String>,
}

impl PricingGridEditor {
    /// Loads the current grid and fills the fields from it.
    ///
    /// # Errors
    ///
    /// Returns the API error if the grid cannot be fetched.
    pub async fn open(api: Arc<dyn PricingApi>) -> Result<Self, EditorError> {
        let loader = PricingGridLoader::mount(Arc::clone(&api));

        loader.load().await?;

        Ok(Self::from_grid(api, &loader.snapshot().grid))
    }

    #[must_use]
    pub fn from_grid(api: Arc<dyn PricingApi>, grid: &PricingGrid) -> Self {
        let fields = EDITABLE_CELLS
            .into_iter()
            .filter_map(|(kind, placement)| {
                grid.price(kind, placement)
                    .map(|price| ((kind, placement), price.to_string()))
            })
            .collect();

        Self { api, fields }
    }

    #[must_use]
    pub fn field(&self, kind: CustomizationType, placement: Placement) -> Option<&str> {
        self.fields.get(&(kind, placement)).map(String::as_str)
    }

    /// Editable cells with their current text, empty cells included.
    pub fn fields(&self) -> impl Iterator<Item = (CustomizationType, Placement, &str)> {
        EDITABLE_CELLS.into_iter().map(|(kind, placement)| {
            (kind, placement, self.field(kind, placement).unwrap_or_default())
        })
    }

    /// Sets the text of a cell. Validation happens on save.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::NotEditable`] for cells outside [`EDITABLE_CELLS`].
    pub fn set_field(
        &mut self,
        kind: CustomizationType,
        placement: Placement,
        value: impl Into<String>,
    ) -> Result<(), EditorError> {
        ensure_editable(kind, placement)?;

        let value = value.into();

        if value.trim().is_empty() {
            self.fields.remove(&(kind, placement));
        } else {
            self.fields.insert((kind, placement), value);
        }

        Ok(())
    }

    pub fn clear_field(&mut self, kind: CustomizationType, placement: Placement) {
        self.fields.remove(&(kind, placement));
    }

    /// Applies field values from YAML keyed by type, then placement.
    ///
    /// ```yaml
    /// text:
    ///   front: 5
    ///   both: "8.00"
    /// combo:
    ///   any: ~
    /// ```
    ///
    /// A null value clears the cell. Returns the number of cells touched.
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML, unknown type or placement names, and cells that are not
    /// editable. No field is changed when an error is returned.
    pub fn apply_yaml(&mut self, source: &str) -> Result<usize, EditorError> {
        let document: BTreeMap<String, BTreeMap<String, Value>> = serde_norway::from_str(source)?;

        let mut updates = Vec::new();

        for (kind, placements) in document {
            let kind = CustomizationType::from_str(&kind)?;

            for (placement, value) in placements {
                let placement = Placement::from_str(&placement)?;

                ensure_editable(kind, placement)?;

                let text = match value {
                    Value::Null => String::new(),
                    Value::Number(number) => number.to_string(),
                    Value::String(text) => text,
                    other => {
                        return Err(EditorError::YamlShape(format!(
                            "{kind} {placement} must be a number, a string or null, got {other:?}"
                        )));
                    }
                };

                updates.push((kind, placement, text));
            }
        }

        let touched = updates.len();

        for (kind, placement, text) in updates {
            self.set_field(kind, placement, text)?;
        }

        debug!(touched, "applied pricing yaml");

        Ok(touched)
    }

    /// Reads a YAML file and applies it with [`PricingGridEditor::apply_yaml`].
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, or as [`PricingGridEditor::apply_yaml`].
    pub fn apply_yaml_file(&mut self, path: &Path) -> Result<usize, EditorError> {
        let source = fs::read_to_string(path)?;

        self.apply_yaml(&source)
    }

    /// Serializes the non-empty fields into records.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidPrice`] for the first field that is not a
    /// non-negative number.
    pub fn records(&self) -> Result<Vec<PricingRecord>, EditorError> {
        EDITABLE_CELLS
            .into_iter()
            .filter_map(|(kind, placement)| {
                self.field(kind, placement)
                    .map(str::trim)
                    .filter(|text| !text.is_empty())
                    .map(|text| parse_price(kind, placement, text))
            })
            .collect()
    }

    /// Replaces the backend grid with the current fields.
    ///
    /// # Errors
    ///
    /// Nothing is sent if a field is invalid; otherwise returns the API error.
    pub async fn save(&self) -> Result<Vec<PricingRecord>, EditorError> {
        let records = self.records()?;

        self.api.replace_pricing_grid(records.clone()).await?;

        info!(cells = records.len(), "pricing grid saved");

        Ok(records)
    }
}

fn ensure_editable(kind: CustomizationType, placement: Placement) -> Result<(), EditorError> {
    if EDITABLE_CELLS.contains(&(kind, placement)) {
        Ok(())
    } else {
        Err(EditorError::NotEditable { kind, placement })
    }
}

fn parse_price(
    kind: CustomizationType,
    placement: Placement,
    text: &str,
) -> Result<PricingRecord, EditorError> {
    let price = Decimal::from_str(text)
        .or_else(|_err| Decimal::from_scientific(text))
        .ok()
        .filter(|price| !price.is_sign_negative());

    match price {
        Some(price) => Ok(PricingRecord::new(kind, placement, price)),
        None => Err(EditorError::InvalidPrice {
            kind,
            placement,
            value: text.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::api::MockPricingApi;

    use super::*;

    fn grid() -> PricingGrid {
        PricingGrid::from_records([
            PricingRecord::new(CustomizationType::Text, Placement::Front, Decimal::from(5)),
            PricingRecord::new(CustomizationType::Image, Placement::Both, Decimal::new(1800, 2)),
            PricingRecord::new(CustomizationType::Combo, Placement::Any, Decimal::from(20)),
        ])
    }

    fn idle_api() -> Arc<dyn PricingApi> {
        let mut api = MockPricingApi::new();
        api.expect_replace_pricing_grid().times(0);

        Arc::new(api)
    }

    #[tokio::test]
    async fn open_fills_fields_from_loaded_grid() -> TestResult {
        let mut api = MockPricingApi::new();
        api.expect_get_pricing_grid()
            .times(1)
            .returning(|| Ok(grid()));

        let editor = PricingGridEditor::open(Arc::new(api)).await?;

        assert_eq!(
            editor.field(CustomizationType::Text, Placement::Front),
            Some("5")
        );
        assert_eq!(
            editor.field(CustomizationType::Image, Placement::Both),
            Some("18.00")
        );
        assert_eq!(editor.field(CustomizationType::Text, Placement::Back), None);
        assert_eq!(editor.fields().count(), EDITABLE_CELLS.len());

        Ok(())
    }

    #[tokio::test]
    async fn save_sends_only_non_empty_fields() -> TestResult {
        let mut api = MockPricingApi::new();
        api.expect_replace_pricing_grid()
            .withf(|records| {
                records
                    == &vec![
                        PricingRecord::new(
                            CustomizationType::Text,
                            Placement::Front,
                            Decimal::from(6),
                        ),
                        PricingRecord::new(
                            CustomizationType::Image,
                            Placement::Both,
                            Decimal::new(1800, 2),
                        ),
                    ]
            })
            .times(1)
            .returning(|_| Ok(()));

        let mut editor = PricingGridEditor::from_grid(Arc::new(api), &grid());

        editor.set_field(CustomizationType::Text, Placement::Front, "6")?;
        editor.set_field(CustomizationType::Combo, Placement::Any, "  ")?;

        let saved = editor.save().await?;

        assert_eq!(saved.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn non_numeric_price_is_rejected_before_sending() -> TestResult {
        let mut editor = PricingGridEditor::from_grid(idle_api(), &grid());

        editor.set_field(CustomizationType::Text, Placement::Back, "five")?;

        let result = editor.save().await;

        assert!(
            matches!(
                result,
                Err(EditorError::InvalidPrice {
                    kind: CustomizationType::Text,
                    placement: Placement::Back,
                    ..
                })
            ),
            "expected InvalidPrice, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn negative_price_is_rejected() -> TestResult {
        let mut editor = PricingGridEditor::from_grid(idle_api(), &PricingGrid::new());

        editor.set_field(CustomizationType::Image, Placement::Front, "-1")?;

        let result = editor.records();

        assert!(
            matches!(result, Err(EditorError::InvalidPrice { .. })),
            "expected InvalidPrice, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn combo_is_only_editable_for_any() {
        let mut editor = PricingGridEditor::from_grid(idle_api(), &PricingGrid::new());

        let result = editor.set_field(CustomizationType::Combo, Placement::Front, "20");

        assert!(
            matches!(result, Err(EditorError::NotEditable { .. })),
            "expected NotEditable, got {result:?}"
        );

        let result = editor.set_field(CustomizationType::Text, Placement::Any, "20");

        assert!(
            matches!(result, Err(EditorError::NotEditable { .. })),
            "expected NotEditable, got {result:?}"
        );
    }

    #[test]
    fn apply_yaml_sets_and_clears_fields() -> TestResult {
        let mut editor = PricingGridEditor::from_grid(idle_api(), &grid());

        let touched = editor.apply_yaml(
            "text:\n  back: 5\n  both: \"8.00\"\nimage:\n  both: 17.5\ncombo:\n  any: ~\n",
        )?;

        assert_eq!(touched, 4);
        assert_eq!(
            editor.field(CustomizationType::Text, Placement::Back),
            Some("5")
        );
        assert_eq!(
            editor.field(CustomizationType::Text, Placement::Both),
            Some("8.00")
        );
        assert_eq!(
            editor.field(CustomizationType::Image, Placement::Both),
            Some("17.5")
        );
        assert_eq!(editor.field(CustomizationType::Combo, Placement::Any), None);

        Ok(())
    }

    #[test]
    fn apply_yaml_is_all_or_nothing() -> TestResult {
        let mut editor = PricingGridEditor::from_grid(idle_api(), &grid());

        let result = editor.apply_yaml("text:\n  front: 9\n  sleeve: 3\n");

        assert!(
            matches!(result, Err(EditorError::Parse(ParseError::UnknownPlacement(_)))),
            "expected UnknownPlacement, got {result:?}"
        );
        assert_eq!(
            editor.field(CustomizationType::Text, Placement::Front),
            Some("5")
        );

        let result = editor.apply_yaml("text:\n  front: [1, 2]\n");

        assert!(
            matches!(result, Err(EditorError::YamlShape(_))),
            "expected YamlShape, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn apply_yaml_file_reads_from_disk() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("pricing.yaml");
        fs::write(&path, "combo:\n  any: 25\n")?;

        let mut editor = PricingGridEditor::from_grid(idle_api(), &grid());

        editor.apply_yaml_file(&path)?;

        assert_eq!(editor.records()?.len(), 3);
        assert_eq!(
            editor.field(CustomizationType::Combo, Placement::Any),
            Some("25")
        );

        Ok(())
    }
}
