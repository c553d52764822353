//! Client configuration

use clap::{ArgAction, Args, Parser, Subcommand};
use reqwest::Url;
use thiserror::Error;

use crate::models::ProductDraft;

/// Catalog terminal client
#[derive(Debug, Parser)]
#[command(name = "catalog-client", about = "Catalog terminal client", long_about = None)]
pub struct ClientConfig {
    /// Public API base URL
    #[arg(long, env = "CATALOG_API_URL", default_value = "http://localhost:5000/api")]
    pub api_url: String,

    /// Push channel URL; derived from the API URL when omitted
    #[arg(long, env = "CATALOG_PUSH_URL")]
    pub push_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List every product
    List,

    /// Show one product
    Get {
        id: u64,
    },

    /// Create a product
    Create(ProductArgs),

    /// Update the given fields of a product
    Update {
        id: u64,

        #[command(flatten)]
        fields: ProductArgs,
    },

    /// Delete a product
    Delete {
        id: u64,
    },

    /// Stay connected and print notifications until interrupted
    Watch,
}

/// Product fields accepted on the command line.
#[derive(Debug, Args)]
pub struct ProductArgs {
    #[arg(long)]
    pub name: Option<String>,

    /// Product category, e.g. `phone`
    #[arg(long = "type")]
    pub kind: Option<String>,

    #[arg(long)]
    pub price: Option<f64>,

    #[arg(long)]
    pub rating: Option<f64>,

    #[arg(long)]
    pub warranty_years: Option<u32>,

    #[arg(long, action = ArgAction::Set)]
    pub available: Option<bool>,
}

impl From<ProductArgs> for ProductDraft {
    fn from(args: ProductArgs) -> Self {
        Self {
            name: args.name,
            kind: args.kind,
            price: args.price,
            rating: args.rating,
            warranty_years: args.warranty_years,
            available: args.available,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),

    #[error("API URL must use http or https, got {0}")]
    UnsupportedScheme(String),
}

impl ClientConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// The push channel URL, explicit or derived from the API URL.
    ///
    /// # Errors
    ///
    /// Fails when the API URL cannot be turned into a WebSocket URL.
    pub fn push_url(&self) -> Result<String, ConfigError> {
        match &self.push_url {
            Some(url) => Ok(url.clone()),
            None => derive_push_url(&self.api_url),
        }
    }
}

/// `http://host:5000/api` becomes `ws://host:5000/ws`.
///
/// # Errors
///
/// Fails for unparseable URLs and schemes other than http and https.
pub fn derive_push_url(api_url: &str) -> Result<String, ConfigError> {
    let mut url = Url::parse(api_url).map_err(|error| ConfigError::InvalidUrl(error.to_string()))?;

    let scheme = match url.scheme() {
        "http" => "ws",
        "https" => "wss",
        other => return Err(ConfigError::UnsupportedScheme(other.to_owned())),
    };

    url.set_scheme(scheme)
        .map_err(|()| ConfigError::UnsupportedScheme(scheme.to_owned()))?;
    url.set_path("/ws");
    url.set_query(None);
    url.set_fragment(None);

    Ok(url.into())
}
