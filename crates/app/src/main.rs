//! Printshop storefront CLI

use std::process;

mod cli;

#[tokio::main]
pub async fn main() {
    let cli = match cli::Cli::load() {
        Ok(cli) => cli,
        Err(error) => error.exit(),
    };

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
