//! Cross-origin policy

use salvo::{
    cors::{Cors, CorsHandler},
    http::Method,
};

/// Allow exactly one web origin to call the API.
///
/// Requests from any other origin get no `access-control-allow-origin` header.
pub(crate) fn cors_handler(allowed_origin: &str) -> CorsHandler {
    Cors::new()
        .allow_origin([allowed_origin])
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(vec!["accept", "content-type", "x-request-id"])
        .expose_headers(vec!["location", "x-request-id"])
        .into_handler()
}
