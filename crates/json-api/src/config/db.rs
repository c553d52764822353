//! Database Config

use clap::{ArgAction, Args};

/// Product storage settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// Storage connection string (`postgres://...` or `memory://`)
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: String,

    /// Insert the sample products when the store is empty
    #[arg(
        long,
        env = "SEED_PRODUCTS",
        default_value_t = true,
        action = ArgAction::Set
    )]
    pub seed_products: bool,
}
