//! Catalog endpoints: customizable models and regular products.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError, Listing, Single};

/// A customizable product template, e.g. a blank t-shirt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Model {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    #[serde(alias = "price")]
    pub base_price: Decimal,

    #[serde(default)]
    pub colors: Vec<String>,

    #[serde(default)]
    pub sizes: Vec<String>,

    #[serde(default)]
    pub image: Option<String>,
}

/// A regular, non-customizable product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    pub price: Decimal,

    #[serde(default)]
    pub image: Option<String>,

    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl Product {
    /// Unit price of a variant, falling back to the product price.
    #[must_use]
    pub fn variant_price(&self, variant_id: Option<&str>) -> Decimal {
        variant_id
            .and_then(|id| self.variants.iter().find(|variant| variant.id == id))
            .and_then(|variant| variant.price)
            .unwrap_or(self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    #[serde(alias = "_id")]
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub price: Option<Decimal>,
}

#[automock]
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Lists customizable models.
    async fn list_models(&self) -> Result<Vec<Model>, ApiError>;

    /// Retrieves a single model.
    async fn get_model(&self, id: &str) -> Result<Model, ApiError>;

    /// Lists regular products.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;
}

#[async_trait]
impl CatalogApi for ApiClient {
    async fn list_models(&self) -> Result<Vec<Model>, ApiError> {
        let listing: Listing<Model> = self.get_json("models").await?;

        Ok(listing.into_vec())
    }

    async fn get_model(&self, id: &str) -> Result<Model, ApiError> {
        let model: Single<Model> = self.get_json(&format!("models/{id}")).await?;

        Ok(model.into_inner())
    }

    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        let listing: Listing<Product> = self.get_json("products").await?;

        Ok(listing.into_vec())
    }
}
