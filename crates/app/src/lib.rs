//! Storefront client for the printshop pricing and cart engine.
//!
//! REST access to the pricing grid and catalog, the grid loader and admin editor, and the
//! persisted application state the command line drives.

pub mod api;
pub mod config;
pub mod context;
pub mod observability;
pub mod pricing;
pub mod state;
