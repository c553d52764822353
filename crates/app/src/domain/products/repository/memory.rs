//! In-memory products repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use jiff::Timestamp;
use tokio::sync::RwLock;

use crate::domain::products::{
    errors::ProductsServiceError,
    models::{Product, ProductId},
    validation::ProductFields,
};

use super::ProductsRepository;

/// Process-local store selected by `memory://` connection strings.
///
/// Individual writes are serialised by the lock; nothing spans two calls.
#[derive(Debug, Default)]
pub struct MemoryProductsRepository {
    products: RwLock<BTreeMap<ProductId, Product>>,
}

impl MemoryProductsRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductsRepository for MemoryProductsRepository {
    async fn max_product_id(&self) -> Result<Option<ProductId>, ProductsServiceError> {
        Ok(self.products.read().await.keys().next_back().copied())
    }

    async fn count_products(&self) -> Result<u64, ProductsServiceError> {
        let count = self.products.read().await.len();

        u64::try_from(count).map_err(|_overflow| ProductsServiceError::invalid("too many products"))
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(self.products.read().await.values().cloned().collect())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ProductsServiceError> {
        self.products
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ProductsServiceError::NotFound)
    }

    async fn insert_product(
        &self,
        id: ProductId,
        fields: ProductFields,
        created_at: Timestamp,
    ) -> Result<Product, ProductsServiceError> {
        let mut products = self.products.write().await;

        if products.contains_key(&id) {
            return Err(ProductsServiceError::Conflict);
        }

        let product = Product {
            id,
            name: fields.name,
            kind: fields.kind,
            price: fields.price,
            rating: fields.rating,
            warranty_years: fields.warranty_years,
            available: fields.available,
            created_at,
        };

        products.insert(id, product.clone());

        Ok(product)
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Product, ProductsServiceError> {
        let mut products = self.products.write().await;

        let product = products.get_mut(&id).ok_or(ProductsServiceError::NotFound)?;

        product.name = fields.name;
        product.kind = fields.kind;
        product.price = fields.price;
        product.rating = fields.rating;
        product.warranty_years = fields.warranty_years;
        product.available = fields.available;

        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<u64, ProductsServiceError> {
        Ok(u64::from(self.products.write().await.remove(&id).is_some()))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn fields(name: &str) -> ProductFields {
        ProductFields {
            name: name.to_string(),
            kind: "phone".to_string(),
            price: 10.0,
            rating: 0.0,
            warranty_years: 1,
            available: true,
        }
    }

    #[tokio::test]
    async fn insert_existing_id_returns_conflict_and_keeps_original() -> TestResult {
        let repository = MemoryProductsRepository::new();
        let id = ProductId::new(1);

        repository
            .insert_product(id, fields("first"), Timestamp::UNIX_EPOCH)
            .await?;

        let result = repository
            .insert_product(id, fields("second"), Timestamp::UNIX_EPOCH)
            .await;

        assert!(
            matches!(result, Err(ProductsServiceError::Conflict)),
            "expected Conflict, got {result:?}"
        );
        assert_eq!(repository.get_product(id).await?.name, "first");

        Ok(())
    }

    #[tokio::test]
    async fn list_is_ordered_by_id() -> TestResult {
        let repository = MemoryProductsRepository::new();

        for id in [3, 1, 2] {
            repository
                .insert_product(ProductId::new(id), fields("p"), Timestamp::UNIX_EPOCH)
                .await?;
        }

        let ids: Vec<u64> = repository
            .list_products()
            .await?
            .into_iter()
            .map(|product| product.id.get())
            .collect();

        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(repository.max_product_id().await?, Some(ProductId::new(3)));
        assert_eq!(repository.count_products().await?, 3);

        Ok(())
    }

    #[tokio::test]
    async fn delete_reports_rows_removed() -> TestResult {
        let repository = MemoryProductsRepository::new();
        let id = ProductId::new(1);

        repository
            .insert_product(id, fields("p"), Timestamp::UNIX_EPOCH)
            .await?;

        assert_eq!(repository.delete_product(id).await?, 1);
        assert_eq!(repository.delete_product(id).await?, 0);

        Ok(())
    }
}
