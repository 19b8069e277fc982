//! API Config

use clap::Args;

/// Storefront REST API settings.
#[derive(Debug, Clone, Args)]
pub struct ApiConfig {
    /// Base URL of the storefront API
    #[arg(
        long,
        env = "API_BASE_URL",
        default_value = "http://localhost:5000/api",
        global = true
    )]
    pub api_base_url: String,
}
