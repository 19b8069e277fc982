//! Cart

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use serde::{Deserialize, Serialize};

use crate::{
    money::{MoneyError, format_amount},
    pricing::round_price,
};

mod item;
mod key;

pub use item::{AddToCart, CartItem};
pub use key::CartKey;

/// Message recorded when an add payload names no product.
pub const MISSING_PRODUCT_ERROR: &str = "cannot add item to cart: missing product id";

/// Actions understood by [`Cart::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub enum CartAction {
    /// Add a line, or increase the quantity of an identical one.
    AddToCart(AddToCart),

    /// Remove a line.
    RemoveFromCart(CartKey),

    /// Set a line's quantity; zero or less removes it.
    UpdateQuantity(CartKey, i64),

    /// Remove every line.
    ClearCart,
}

/// Cart
///
/// `total_quantity` and `total_amount` are derived from `items` after every change and are
/// never set independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "CartSnapshot")]
pub struct Cart {
    items: Vec<CartItem>,
    total_quantity: u64,
    total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an action.
    pub fn reduce(&mut self, action: CartAction) {
        match action {
            CartAction::AddToCart(payload) => self.add_to_cart(payload),
            CartAction::RemoveFromCart(key) => self.remove_from_cart(&key),
            CartAction::UpdateQuantity(key, quantity) => self.update_quantity(&key, quantity),
            CartAction::ClearCart => self.clear_cart(),
        }
    }

    /// Adds a line, merging into an existing line with the same key.
    ///
    /// A payload without a product id leaves the items untouched and records
    /// [`MISSING_PRODUCT_ERROR`] in [`Cart::error`].
    pub fn add_to_cart(&mut self, payload: AddToCart) {
        let Some(key) = payload.key() else {
            self.error = Some(MISSING_PRODUCT_ERROR.to_string());
            return;
        };

        let quantity = payload.effective_quantity();

        if let Some(existing) = self.items.iter_mut().find(|item| item.key == key) {
            existing.quantity = existing.quantity.saturating_add(quantity);
        } else {
            self.items.push(CartItem {
                key,
                name: payload.name,
                price: payload.price,
                image: payload.image,
                quantity,
            });
        }

        self.error = None;
        self.recalculate();
    }

    /// Removes the line with the given key, if present.
    pub fn remove_from_cart(&mut self, key: &CartKey) {
        self.items.retain(|item| &item.key != key);
        self.error = None;
        self.recalculate();
    }

    /// Sets a line's quantity. Zero or negative quantities remove the line.
    pub fn update_quantity(&mut self, key: &CartKey, quantity: i64) {
        if quantity <= 0 {
            self.remove_from_cart(key);
            return;
        }

        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);

        if let Some(item) = self.items.iter_mut().find(|item| &item.key == key) {
            item.quantity = quantity;
        }

        self.error = None;
        self.recalculate();
    }

    /// Removes every line.
    pub fn clear_cart(&mut self) {
        self.items.clear();
        self.error = None;
        self.recalculate();
    }

    /// Lines, in insertion order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Looks up a line by its [`CartKey::line_id`].
    pub fn find_by_line_id(&self, line_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.key.line_id() == line_id)
    }

    /// Sum of line quantities.
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    /// Sum of line totals, rounded to 2 decimal places.
    pub fn total_amount(&self) -> Decimal {
        self.total_amount
    }

    /// Message recorded by the last rejected action, cleared by the next successful one.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total amount formatted in the given currency.
    ///
    /// # Errors
    ///
    /// Returns a [`MoneyError`] if the total cannot be represented in minor units.
    pub fn formatted_total(&self, currency: &'static Currency) -> Result<String, MoneyError> {
        format_amount(self.total_amount, currency)
    }

    fn recalculate(&mut self) {
        self.total_quantity = self.items.iter().map(|item| u64::from(item.quantity)).sum();
        self.total_amount = round_price(self.items.iter().map(CartItem::line_total).sum());
    }
}

/// Persisted form of a cart; totals are recomputed on restore.
#[derive(Debug, Deserialize)]
struct CartSnapshot {
    #[serde(default)]
    items: Vec<CartItem>,
}

impl From<CartSnapshot> for Cart {
    fn from(snapshot: CartSnapshot) -> Self {
        let mut cart = Cart {
            items: snapshot
                .items
                .into_iter()
                .filter(|item| item.quantity > 0)
                .collect(),
            ..Cart::default()
        };

        cart.recalculate();

        cart
    }
}
