//! Server configuration module

use clap::Parser;

use crate::config::{
    cors::CorsConfig, db::DatabaseConfig, observability::LoggingConfig, relay::RelayConfig,
    server::ServerRuntimeConfig,
};

pub(crate) mod cors;
pub(crate) mod db;
pub(crate) mod observability;
pub(crate) mod relay;
pub(crate) mod server;

/// Catalog JSON API Server configuration
#[derive(Debug, Parser)]
#[command(name = "catalog-json", about = "Catalog JSON API Server", long_about = None)]
pub struct ServerConfig {
    /// Server network settings.
    #[command(flatten)]
    pub server: ServerRuntimeConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Product storage settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Cross-origin settings.
    #[command(flatten)]
    pub cors: CorsConfig,

    /// Push channel settings.
    #[command(flatten)]
    pub relay: RelayConfig,
}

impl ServerConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Get the socket address for binding
    #[must_use]
    pub fn socket_addr(&self) -> String {
        self.server.socket_addr()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_apply_when_only_database_url_is_given() -> TestResult {
        let config =
            ServerConfig::try_parse_from(["catalog-json", "--database-url", "memory://"])?;

        assert_eq!(config.socket_addr(), "0.0.0.0:5000");
        assert_eq!(config.database.database_url, "memory://");
        assert!(config.database.seed_products);
        assert_eq!(config.cors.allowed_origin, "http://localhost:3000");
        assert_eq!(config.relay.relay_capacity, 256);
        assert!(!config.relay.announce_mutations);
        assert_eq!(config.logging.slow_request_threshold_ms, 1_000);

        Ok(())
    }

    #[test]
    fn seeding_can_be_disabled() -> TestResult {
        let config = ServerConfig::try_parse_from([
            "catalog-json",
            "--database-url",
            "memory://",
            "--seed-products",
            "false",
        ])?;

        assert!(!config.database.seed_products);

        Ok(())
    }

    #[test]
    fn zero_relay_capacity_is_rejected() {
        let result = ServerConfig::try_parse_from([
            "catalog-json",
            "--database-url",
            "memory://",
            "--relay-capacity",
            "0",
        ]);

        assert!(result.is_err(), "relay capacity must be positive");
    }
}
