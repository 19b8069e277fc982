//! Storefront Config

use std::path::PathBuf;

use clap::Args;

/// Local state and display settings.
#[derive(Debug, Clone, Args)]
pub struct StorefrontConfig {
    /// Path of the persisted state file
    #[arg(
        long,
        env = "STATE_PATH",
        default_value = ".printshop/state.json",
        global = true
    )]
    pub state_path: PathBuf,

    /// ISO currency code used to display amounts
    #[arg(long, env = "CURRENCY", default_value = "USD", global = true)]
    pub currency: String,
}
