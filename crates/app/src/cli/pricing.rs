use std::{path::PathBuf, str::FromStr};

use clap::{Args, Subcommand};
use printshop::pricing::{CustomizationType, Placement, PricingRecord};
use printshop_app::{
    context::AppContext,
    pricing::{PricingGridEditor, PricingGridLoader},
};
use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::builder::Builder;

use crate::cli::{
    selection::{self, SelectionArgs},
    table,
};

#[derive(Debug, Args)]
pub(crate) struct PricingCommand {
    #[command(subcommand)]
    command: PricingSubcommand,
}

#[derive(Debug, Subcommand)]
enum PricingSubcommand {
    /// Print the current pricing grid
    Show,

    /// Price a customization
    Quote(QuoteArgs),

    /// Edit the pricing grid (admin)
    Edit(EditArgs),
}

#[derive(Debug, Args)]
pub(crate) struct QuoteArgs {
    /// Model to customize; its base price is used
    #[arg(long, required_unless_present = "base_price", conflicts_with = "base_price")]
    model: Option<String>,

    /// Base price to quote against instead of a model
    #[arg(long)]
    base_price: Option<Decimal>,

    #[command(flatten)]
    selection: SelectionArgs,
}

#[derive(Debug, Args)]
pub(crate) struct EditArgs {
    /// YAML file of prices keyed by type, then placement
    #[arg(long)]
    file: Option<PathBuf>,

    /// Set a cell, e.g. `text.front=5`
    #[arg(long = "set", value_name = "TYPE.PLACEMENT=PRICE")]
    sets: Vec<String>,

    /// Clear a cell, e.g. `combo.any`
    #[arg(long = "clear", value_name = "TYPE.PLACEMENT")]
    clears: Vec<String>,

    /// Print the resulting grid without saving it
    #[arg(long)]
    dry_run: bool,
}

pub(crate) async fn run(command: PricingCommand, context: &mut AppContext) -> Result<(), String> {
    match command.command {
        PricingSubcommand::Show => show(context).await,
        PricingSubcommand::Quote(args) => quote(args, context).await,
        PricingSubcommand::Edit(args) => edit(args, context).await,
    }
}

async fn show(context: &AppContext) -> Result<(), String> {
    let loader = PricingGridLoader::mount(context.pricing.clone());

    loader
        .load()
        .await
        .map_err(|error| format!("failed to load pricing grid: {error}"))?;

    let records = loader.snapshot().grid.records();

    if records.is_empty() {
        println!("no customization prices configured");
        return Ok(());
    }

    println!("{}", records_table(&records, context.currency)?);

    Ok(())
}

async fn quote(args: QuoteArgs, context: &AppContext) -> Result<(), String> {
    let (label, base_price) = match (&args.model, args.base_price) {
        (Some(id), _) => {
            let model = selection::model(context, id).await?;
            (model.name, model.base_price)
        }
        (None, Some(base_price)) => ("base price".to_string(), base_price),
        (None, None) => return Err("either --model or --base-price is required".to_string()),
    };

    let selector = selection::selector(context, base_price, args.selection).await?;
    let totals = selector.totals();
    let savings = selector.savings();
    let currency = context.currency;

    let mut builder = Builder::default();
    builder.push_record(["", "Amount"]);
    builder.push_record([label, table::amount(totals.base_model_price, currency)?]);
    builder.push_record([
        "Customization".to_string(),
        table::amount(totals.customization_price, currency)?,
    ]);
    builder.push_record([
        "Total".to_string(),
        table::amount(totals.grand_total, currency)?,
    ]);

    println!("{}", table::render(builder, 1));

    if let Some(saved) = savings.text {
        println!(
            "text on both sides saves {}",
            table::amount(saved, currency)?
        );
    }

    if let Some(saved) = savings.image {
        println!(
            "image on both sides saves {}",
            table::amount(saved, currency)?
        );
    }

    Ok(())
}

async fn edit(args: EditArgs, context: &AppContext) -> Result<(), String> {
    let mut editor = PricingGridEditor::open(context.pricing.clone())
        .await
        .map_err(|error| format!("failed to load pricing grid: {error}"))?;

    if let Some(path) = &args.file {
        editor
            .apply_yaml_file(path)
            .map_err(|error| format!("{}: {error}", path.display()))?;
    }

    for assignment in &args.sets {
        let (cell, price) = assignment
            .split_once('=')
            .ok_or_else(|| format!("expected TYPE.PLACEMENT=PRICE, got {assignment:?}"))?;
        let (kind, placement) = parse_cell(cell)?;

        editor
            .set_field(kind, placement, price)
            .map_err(|error| error.to_string())?;
    }

    for cell in &args.clears {
        let (kind, placement) = parse_cell(cell)?;

        editor.clear_field(kind, placement);
    }

    let saved = if args.dry_run {
        editor.records()
    } else {
        editor.save().await
    };

    let records = saved.map_err(|error| error.to_string())?;

    println!("{}", records_table(&records, context.currency)?);

    if args.dry_run {
        println!("dry run: pricing grid not saved");
    } else {
        println!("pricing grid saved ({} cells)", records.len());
    }

    Ok(())
}

fn parse_cell(cell: &str) -> Result<(CustomizationType, Placement), String> {
    let (kind, placement) = cell
        .split_once('.')
        .ok_or_else(|| format!("expected TYPE.PLACEMENT, got {cell:?}"))?;

    let kind = CustomizationType::from_str(kind).map_err(|error| error.to_string())?;
    let placement = Placement::from_str(placement).map_err(|error| error.to_string())?;

    Ok((kind, placement))
}

fn records_table(records: &[PricingRecord], currency: &'static Currency) -> Result<String, String> {
    let mut builder = Builder::default();
    builder.push_record(["Type", "Placement", "Price"]);

    for record in records {
        builder.push_record([
            record.kind.to_string(),
            record.placement.to_string(),
            table::amount(record.price, currency)?,
        ]);
    }

    Ok(table::render(builder, 2))
}
