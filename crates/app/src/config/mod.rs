//! Storefront client configuration.

use clap::Args;

pub mod api;
pub mod observability;
pub mod storefront;

pub use api::ApiConfig;
pub use observability::{LogFormat, LoggingConfig};
pub use storefront::StorefrontConfig;

/// Settings shared by every command.
#[derive(Debug, Clone, Args)]
pub struct AppConfig {
    /// Storefront API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Local state and display settings.
    #[command(flatten)]
    pub storefront: StorefrontConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
