//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    database::{self, OpenRepositoryError},
    domain::products::{
        CatalogProductsService, ProductsService, ProductsServiceError,
        repository::ProductsRepository,
    },
    relay::{BroadcastRelay, DEFAULT_RELAY_CAPACITY},
    seed,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open product storage")]
    Storage(#[source] OpenRepositoryError),

    #[error("failed to seed sample products")]
    Seed(#[source] ProductsServiceError),
}

/// Startup options for [`AppContext`].
#[derive(Debug, Clone, Copy)]
pub struct AppOptions {
    /// Insert the sample products when the store is empty.
    pub seed_products: bool,

    /// Events buffered per push session.
    pub relay_capacity: usize,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            seed_products: false,
            relay_capacity: DEFAULT_RELAY_CAPACITY,
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub products: Arc<dyn ProductsService>,
    pub relay: BroadcastRelay,
}

impl AppContext {
    #[must_use]
    pub fn new(products: Arc<dyn ProductsService>, relay: BroadcastRelay) -> Self {
        Self { products, relay }
    }

    /// Build application context from a storage connection string.
    ///
    /// Fails instead of returning a context backed by an unreachable store.
    ///
    /// # Errors
    ///
    /// Returns an error when the store cannot be opened or seeding fails.
    pub async fn from_database_url(url: &str, options: AppOptions) -> Result<Self, AppInitError> {
        let repository = database::open_products_repository(url)
            .await
            .map_err(AppInitError::Storage)?;

        Self::from_repository(repository, options).await
    }

    /// Build application context around an already opened repository.
    ///
    /// # Errors
    ///
    /// Returns an error when seeding fails.
    pub async fn from_repository(
        repository: Arc<dyn ProductsRepository>,
        options: AppOptions,
    ) -> Result<Self, AppInitError> {
        if options.seed_products {
            let seeded = seed::seed_products(repository.as_ref())
                .await
                .map_err(AppInitError::Seed)?;

            info!(seeded, "sample product check complete");
        }

        Ok(Self::new(
            Arc::new(CatalogProductsService::new(repository)),
            BroadcastRelay::new(options.relay_capacity),
        ))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::database::MEMORY_STORE_URL;

    use super::*;

    #[tokio::test]
    async fn memory_context_with_seed_lists_sample_products() -> TestResult {
        let app = AppContext::from_database_url(
            MEMORY_STORE_URL,
            AppOptions {
                seed_products: true,
                ..AppOptions::default()
            },
        )
        .await?;

        assert_eq!(app.products.list_products().await?.len(), 4);

        Ok(())
    }

    #[tokio::test]
    async fn memory_context_without_seed_starts_empty() -> TestResult {
        let app = AppContext::from_database_url(MEMORY_STORE_URL, AppOptions::default()).await?;

        assert!(app.products.list_products().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn unsupported_url_fails_fast() {
        let result = AppContext::from_database_url("mongodb://localhost", AppOptions::default()).await;

        assert!(
            matches!(result, Err(AppInitError::Storage(OpenRepositoryError::Unsupported(_)))),
            "expected unsupported store error"
        );
    }
}
