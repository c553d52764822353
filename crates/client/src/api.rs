//! Typed REST client for the catalog API.

use std::error::Error as StdError;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{Client, RequestBuilder, StatusCode, header::ACCEPT};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use crate::models::{Deleted, Product, ProductDraft};

/// Shown when the server could not be reached at all.
pub const NETWORK_UNREACHABLE_MESSAGE: &str = "No response from server";

const FALLBACK_MESSAGE: &str = "An error occurred";

type BoxError = Box<dyn StdError + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response was received.
    #[error("no response from server")]
    NetworkUnreachable(#[source] BoxError),

    /// The server answered with a failure status.
    #[error("server responded with {status}: {message}")]
    Server { status: u16, message: String },

    /// The server answered successfully with an unexpected body.
    #[error("unexpected response body")]
    Decode(#[source] BoxError),
}

impl ApiError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::NetworkUnreachable(_) => NETWORK_UNREACHABLE_MESSAGE.to_owned(),
            Self::Server { message, .. } => message.clone(),
            Self::Decode(_) => "Unexpected response from server".to_owned(),
        }
    }
}

/// Catalog REST operations.
#[automock]
#[async_trait]
pub trait ProductsApi: Send + Sync {
    /// Fetch every product.
    async fn list_products(&self) -> Result<Vec<Product>, ApiError>;

    /// Fetch one product.
    async fn get_product(&self, id: u64) -> Result<Product, ApiError>;

    /// Create a product; the server assigns the identifier.
    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ApiError>;

    /// Replace the fields present in `draft`.
    async fn update_product(&self, id: u64, draft: ProductDraft) -> Result<Product, ApiError>;

    /// Delete a product, returning its identifier.
    async fn delete_product(&self, id: u64) -> Result<u64, ApiError>;
}

/// HTTP implementation of [`ProductsApi`].
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_url`, e.g.
    /// `http://localhost:5000/api`.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: Client::new(),
        }
    }

    fn collection_url(&self) -> String {
        format!("{}/products", self.base_url)
    }

    fn product_url(&self, id: u64) -> String {
        format!("{}/products/{id}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|source| ApiError::NetworkUnreachable(Box::new(source)))?;

        let status = response.status();

        debug!(status = status.as_u16(), url = %response.url(), "api response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();

            return Err(ApiError::Server {
                status: status.as_u16(),
                message: server_message(status, &body),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::Decode(Box::new(source)))
    }
}

#[async_trait]
impl ProductsApi for ApiClient {
    async fn list_products(&self) -> Result<Vec<Product>, ApiError> {
        self.send(self.http.get(self.collection_url())).await
    }

    async fn get_product(&self, id: u64) -> Result<Product, ApiError> {
        self.send(self.http.get(self.product_url(id))).await
    }

    async fn create_product(&self, draft: ProductDraft) -> Result<Product, ApiError> {
        self.send(self.http.post(self.collection_url()).json(&draft))
            .await
    }

    async fn update_product(&self, id: u64, draft: ProductDraft) -> Result<Product, ApiError> {
        self.send(self.http.put(self.product_url(id)).json(&draft))
            .await
    }

    async fn delete_product(&self, id: u64) -> Result<u64, ApiError> {
        let deleted: Deleted = self.send(self.http.delete(self.product_url(id))).await?;

        Ok(deleted.id)
    }
}

/// Pull a human-readable message out of an error body.
fn server_message(status: StatusCode, body: &str) -> String {
    let parsed = serde_json::from_str::<Value>(body).ok();

    let from_body = parsed.as_ref().and_then(|value| {
        [
            value.pointer("/error/brief"),
            value.get("message"),
            value.get("error"),
        ]
        .into_iter()
        .flatten()
        .find_map(Value::as_str)
        .map(str::trim)
        .filter(|message| !message.is_empty())
    });

    from_body
        .or_else(|| status.canonical_reason())
        .unwrap_or(FALLBACK_MESSAGE)
        .to_owned()
}
