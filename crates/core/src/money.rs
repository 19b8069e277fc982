//! Money formatting

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{
    Money,
    iso::{CAD, Currency, EUR, GBP, USD},
};
use thiserror::Error;

/// Errors raised while converting amounts to money.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MoneyError {
    /// The currency code is not supported.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// The amount cannot be represented in minor units.
    #[error("amount out of range: {0}")]
    OutOfRange(Decimal),
}

/// Looks up a supported ISO currency by code.
///
/// # Errors
///
/// Returns [`MoneyError::UnknownCurrency`] for codes other than USD, EUR, GBP and CAD.
pub fn parse_currency(code: &str) -> Result<&'static Currency, MoneyError> {
    match code.trim().to_ascii_uppercase().as_str() {
        "USD" => Ok(USD),
        "EUR" => Ok(EUR),
        "GBP" => Ok(GBP),
        "CAD" => Ok(CAD),
        _ => Err(MoneyError::UnknownCurrency(code.to_string())),
    }
}

/// Converts a decimal amount into minor units (cents), rounding to the nearest unit.
///
/// # Errors
///
/// Returns [`MoneyError::OutOfRange`] if the amount does not fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Result<i64, MoneyError> {
    amount
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or(MoneyError::OutOfRange(amount))
}

/// Formats a decimal amount in the given currency, e.g. `$44.99`.
///
/// # Errors
///
/// Returns [`MoneyError::OutOfRange`] if the amount does not fit in minor units.
pub fn format_amount(amount: Decimal, currency: &'static Currency) -> Result<String, MoneyError> {
    let money = Money::from_minor(to_minor_units(amount)?, currency);

    Ok(format!("{money}"))
}
