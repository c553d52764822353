//! Products Repository
//!
//! Storage backends for product records. The backend is chosen from the
//! connection string at startup; both honour the same contract:
//!
//! - `insert_product` fails with [`ProductsServiceError::Conflict`] when the
//!   identifier is already taken and never overwrites.
//! - `get_product` and `update_product` fail with
//!   [`ProductsServiceError::NotFound`] for unknown identifiers.
//! - `delete_product` reports how many records were removed.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;

use crate::domain::products::{
    errors::ProductsServiceError,
    models::{Product, ProductId},
    validation::ProductFields,
};

mod memory;
mod postgres;

pub use memory::MemoryProductsRepository;
pub use postgres::PgProductsRepository;

#[automock]
#[async_trait]
pub trait ProductsRepository: Send + Sync {
    /// Largest identifier currently stored, if any.
    async fn max_product_id(&self) -> Result<Option<ProductId>, ProductsServiceError>;

    /// Number of stored products.
    async fn count_products(&self) -> Result<u64, ProductsServiceError>;

    /// All products ordered by ascending identifier.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// A single product.
    async fn get_product(&self, id: ProductId) -> Result<Product, ProductsServiceError>;

    /// Persists a new product under `id`.
    async fn insert_product(
        &self,
        id: ProductId,
        fields: ProductFields,
        created_at: Timestamp,
    ) -> Result<Product, ProductsServiceError>;

    /// Replaces the mutable fields of an existing product.
    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Product, ProductsServiceError>;

    /// Removes a product, returning the number of rows removed.
    async fn delete_product(&self, id: ProductId) -> Result<u64, ProductsServiceError>;
}
