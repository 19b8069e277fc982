//! Printshop prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{AddToCart, Cart, CartAction, CartItem, CartKey},
    customization::Customization,
    money::{MoneyError, format_amount, parse_currency},
    pricing::{
        CustomizationSelection, CustomizationTotals, CustomizationType, Placement, PricingGrid,
        PricingRecord, Savings, calculate_totals, round_price,
    },
};
