use printshop::money::format_amount;
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

/// Renders rows with a header, right-aligning columns from `numeric_from` on.
pub(crate) fn render(builder: Builder, numeric_from: usize) -> String {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(numeric_from..), Alignment::right());

    table.to_string()
}

pub(crate) fn amount(value: Decimal, currency: &'static Currency) -> Result<String, String> {
    format_amount(value, currency).map_err(|error| error.to_string())
}
