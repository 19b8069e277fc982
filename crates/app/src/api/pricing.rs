//! Customization pricing endpoints.

use std::str::FromStr;

use async_trait::async_trait;
use mockall::automock;
use printshop::pricing::{CustomizationType, Placement, PricingGrid, PricingRecord};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::api::{ApiClient, ApiError};

pub const PRICING_PATH: &str = "customization-pricing";

#[automock]
#[async_trait]
pub trait PricingApi: Send + Sync {
    /// Fetches the full customization pricing grid.
    async fn get_pricing_grid(&self) -> Result<PricingGrid, ApiError>;

    /// Replaces the whole grid with the given records.
    async fn replace_pricing_grid(&self, records: Vec<PricingRecord>) -> Result<(), ApiError>;
}

#[async_trait]
impl PricingApi for ApiClient {
    async fn get_pricing_grid(&self) -> Result<PricingGrid, ApiError> {
        let payload: Value = self.get_json(PRICING_PATH).await?;

        let grid = decode_grid(payload)?;

        info!(cells = grid.len(), "customization pricing loaded");

        Ok(grid)
    }

    async fn replace_pricing_grid(&self, records: Vec<PricingRecord>) -> Result<(), ApiError> {
        self.put_json(PRICING_PATH, &records).await?;

        info!(cells = records.len(), "customization pricing replaced");

        Ok(())
    }
}

/// A pricing record as it arrives on the wire, before validation.
#[derive(Debug, Deserialize)]
struct RawPricingRecord {
    #[serde(rename = "type")]
    kind: Option<String>,

    placement: Option<String>,

    price: Option<Value>,
}

/// Decodes a pricing payload: a bare list of records, or one wrapped in `data` or `pricing`.
///
/// Records with an unknown type or placement, or without a numeric price, are skipped.
pub(crate) fn decode_grid(payload: Value) -> Result<PricingGrid, ApiError> {
    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut envelope) => match envelope
            .remove("data")
            .or_else(|| envelope.remove("pricing"))
        {
            Some(Value::Array(records)) => records,
            _ => {
                return Err(ApiError::InvalidPayload(
                    "expected a list of pricing records".to_string(),
                ));
            }
        },
        other => {
            return Err(ApiError::InvalidPayload(format!(
                "expected a list of pricing records, got {other}"
            )));
        }
    };

    Ok(records.into_iter().filter_map(decode_record).collect())
}

fn decode_record(value: Value) -> Option<PricingRecord> {
    let raw = match serde_json::from_value::<RawPricingRecord>(value) {
        Ok(raw) => raw,
        Err(error) => {
            warn!("skipping malformed pricing record: {error}");
            return None;
        }
    };

    let kind = match raw.kind.as_deref().map(CustomizationType::from_str) {
        Some(Ok(kind)) => kind,
        Some(Err(error)) => {
            warn!("skipping pricing record: {error}");
            return None;
        }
        None => {
            warn!("skipping pricing record without a type");
            return None;
        }
    };

    let placement = match raw.placement.as_deref().map(Placement::from_str) {
        Some(Ok(placement)) => placement,
        Some(Err(error)) => {
            warn!(%kind, "skipping pricing record: {error}");
            return None;
        }
        None => {
            warn!(%kind, "skipping pricing record without a placement");
            return None;
        }
    };

    let Some(price) = raw.price.as_ref().and_then(decode_price) else {
        warn!(%kind, %placement, "skipping pricing record without a numeric price");
        return None;
    };

    Some(PricingRecord::new(kind, placement, price))
}

fn decode_price(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(number) => number.to_string(),
        Value::String(text) => text.trim().to_string(),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_err| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn decodes_bare_list() -> TestResult {
        let grid = decode_grid(json!([
            { "type": "text", "placement": "front", "price": 5 },
            { "type": "combo", "placement": "any", "price": 20.5 }
        ]))?;

        assert_eq!(
            grid.price(CustomizationType::Text, Placement::Front),
            Some(Decimal::from(5))
        );
        assert_eq!(grid.combo_price(), Some(Decimal::new(205, 1)));

        Ok(())
    }

    #[test]
    fn decodes_enveloped_list_with_string_prices() -> TestResult {
        let grid = decode_grid(json!({
            "data": [{ "type": "image", "placement": "both", "price": "18.00" }]
        }))?;

        assert_eq!(
            grid.price(CustomizationType::Image, Placement::Both),
            Some(Decimal::new(1800, 2))
        );

        Ok(())
    }

    #[test]
    fn skips_invalid_records_instead_of_failing() -> TestResult {
        let grid = decode_grid(json!([
            { "type": "embroidery", "placement": "front", "price": 9 },
            { "type": "text", "placement": "sleeve", "price": 9 },
            { "type": "text", "placement": "back", "price": "free" },
            { "type": "text", "placement": "back" },
            { "placement": "back", "price": 1 },
            "not a record",
            { "type": "text", "placement": "back", "price": 5 }
        ]))?;

        assert_eq!(grid.len(), 1);
        assert_eq!(
            grid.price(CustomizationType::Text, Placement::Back),
            Some(Decimal::from(5))
        );

        Ok(())
    }

    #[test]
    fn rejects_non_list_payloads() {
        assert!(matches!(
            decode_grid(json!("nope")),
            Err(ApiError::InvalidPayload(_))
        ));
        assert!(matches!(
            decode_grid(json!({ "data": 3 })),
            Err(ApiError::InvalidPayload(_))
        ));
    }

    #[test]
    fn empty_list_is_an_empty_grid() -> TestResult {
        assert!(decode_grid(json!([]))?.is_empty());

        Ok(())
    }
}
