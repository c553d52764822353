//! Products service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::debug;

use crate::domain::products::{
    allocator::IdAllocator,
    data::{NewProduct, ProductUpdate},
    errors::ProductsServiceError,
    models::{Product, ProductId},
    repository::ProductsRepository,
    validation::ProductFields,
};

#[derive(Clone)]
pub struct CatalogProductsService {
    repository: Arc<dyn ProductsRepository>,
    allocator: IdAllocator,
}

impl CatalogProductsService {
    #[must_use]
    pub fn new(repository: Arc<dyn ProductsRepository>) -> Self {
        Self {
            repository,
            allocator: IdAllocator::new(),
        }
    }
}

impl std::fmt::Debug for CatalogProductsService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogProductsService")
            .field("allocator", &self.allocator)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ProductsService for CatalogProductsService {
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        self.repository.list_products().await
    }

    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError> {
        self.repository.get_product(product).await
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError> {
        let fields = ProductFields::from_new(product)?;

        let id = self.allocator.next_id(self.repository.as_ref()).await?;

        debug!(product_id = %id, "allocated product identifier");

        self.repository
            .insert_product(id, fields, Timestamp::now())
            .await
    }

    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError> {
        let existing = self.repository.get_product(product).await?;

        if update.is_empty() {
            return Ok(existing);
        }

        let fields = ProductFields::merge(&existing, update)?;

        self.repository.update_product(product, fields).await
    }

    async fn delete_product(&self, product: ProductId) -> Result<ProductId, ProductsServiceError> {
        let rows_affected = self.repository.delete_product(product).await?;

        if rows_affected == 0 {
            return Err(ProductsServiceError::NotFound);
        }

        Ok(product)
    }
}

#[automock]
#[async_trait]
pub trait ProductsService: Send + Sync {
    /// Retrieves all products ordered by ascending identifier.
    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError>;

    /// Retrieve a single product.
    async fn get_product(&self, product: ProductId) -> Result<Product, ProductsServiceError>;

    /// Validates, allocates an identifier for, and stores a new product.
    async fn create_product(&self, product: NewProduct) -> Result<Product, ProductsServiceError>;

    /// Applies the fields present in `update` to an existing product.
    async fn update_product(
        &self,
        product: ProductId,
        update: ProductUpdate,
    ) -> Result<Product, ProductsServiceError>;

    /// Deletes a product, returning its identifier for downstream signalling.
    async fn delete_product(&self, product: ProductId) -> Result<ProductId, ProductsServiceError>;
}
