use clap::{Args, Subcommand};
use printshop_app::context::AppContext;
use tabled::builder::Builder;

use crate::cli::table;

#[derive(Debug, Args)]
pub(crate) struct CatalogCommand {
    #[command(subcommand)]
    command: CatalogSubcommand,
}

#[derive(Debug, Subcommand)]
enum CatalogSubcommand {
    /// List customizable models
    Models,

    /// List regular products and their variants
    Products,
}

pub(crate) async fn run(command: CatalogCommand, context: &AppContext) -> Result<(), String> {
    match command.command {
        CatalogSubcommand::Models => models(context).await,
        CatalogSubcommand::Products => products(context).await,
    }
}

async fn models(context: &AppContext) -> Result<(), String> {
    let models = context
        .catalog
        .list_models()
        .await
        .map_err(|error| format!("failed to load models: {error}"))?;

    if models.is_empty() {
        println!("no models available");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Name", "Colors", "Sizes", "Base price"]);

    for model in models {
        builder.push_record([
            model.id,
            model.name,
            model.colors.join(", "),
            model.sizes.join(", "),
            table::amount(model.base_price, context.currency)?,
        ]);
    }

    println!("{}", table::render(builder, 4));

    Ok(())
}

async fn products(context: &AppContext) -> Result<(), String> {
    let products = context
        .catalog
        .list_products()
        .await
        .map_err(|error| format!("failed to load products: {error}"))?;

    if products.is_empty() {
        println!("no products available");
        return Ok(());
    }

    let mut builder = Builder::default();
    builder.push_record(["Id", "Name", "Variant", "Price"]);

    for product in &products {
        builder.push_record([
            product.id.clone(),
            product.name.clone(),
            "-".to_string(),
            table::amount(product.price, context.currency)?,
        ]);

        for variant in &product.variants {
            builder.push_record([
                String::new(),
                String::new(),
                format!("{} ({})", variant.name, variant.id),
                table::amount(product.variant_price(Some(&variant.id)), context.currency)?,
            ]);
        }
    }

    println!("{}", table::render(builder, 3));

    Ok(())
}
