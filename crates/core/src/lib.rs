//! Printshop
//!
//! Pricing and cart engine for a print-on-demand storefront: resolves the price of a text
//! and/or image customization from an admin-maintained pricing grid, and keeps a cart of
//! customized lines with derived totals.

pub mod cart;
pub mod customization;
pub mod money;
pub mod prelude;
pub mod pricing;
