use clap::{Parser, Subcommand};
use printshop_app::{config::AppConfig, context::AppContext, observability};
use tracing::warn;

mod cart;
mod catalog;
mod pricing;
mod selection;
mod session;
mod table;
mod theme;

#[derive(Debug, Parser)]
#[command(name = "printshop", about = "Printshop storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Customization pricing grid
    Pricing(pricing::PricingCommand),

    /// Shopping cart
    Cart(cart::CartCommand),

    /// Models and products on sale
    Catalog(catalog::CatalogCommand),

    /// API session tokens
    Session(session::SessionCommand),

    /// Colour theme
    Theme(theme::ThemeCommand),
}

impl Cli {
    /// Parses arguments, reading `.env` first if present.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    pub(crate) async fn run(self) -> Result<(), String> {
        observability::init_subscriber(&self.config.logging).map_err(|error| error.to_string())?;

        let mut context = AppContext::from_config(&self.config).map_err(|error| error.to_string())?;

        let result = match self.command {
            Commands::Pricing(command) => pricing::run(command, &mut context).await,
            Commands::Cart(command) => cart::run(command, &mut context).await,
            Commands::Catalog(command) => catalog::run(command, &context).await,
            Commands::Session(command) => session::run(command, &mut context).await,
            Commands::Theme(command) => theme::run(command, &mut context),
        };

        // A failed command may still have rotated or cleared the session.
        let persisted = context.persist().await;

        if let (Err(_), Err(error)) = (&result, &persisted) {
            warn!("failed to save state: {error}");
        }

        result?;

        persisted.map_err(|error| format!("failed to save state: {error}"))
    }
}
