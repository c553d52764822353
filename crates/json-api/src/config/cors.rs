//! CORS Config

use clap::Args;

/// Cross-origin settings.
#[derive(Debug, Args)]
pub struct CorsConfig {
    /// Web origin allowed to call the API and open push sessions
    #[arg(long, env = "CORS_ORIGIN", default_value = "http://localhost:3000")]
    pub allowed_origin: String,
}
