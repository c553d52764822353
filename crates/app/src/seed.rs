//! Sample catalog data.

use jiff::Timestamp;
use tracing::info;

use crate::domain::products::{
    ProductsServiceError,
    models::ProductId,
    repository::ProductsRepository,
    validation::ProductFields,
};

struct SeedProduct {
    id: u64,
    name: &'static str,
    price: f64,
    rating: f64,
    warranty_years: u32,
    available: bool,
}

const SEED_PRODUCTS: [SeedProduct; 4] = [
    SeedProduct {
        id: 1,
        name: "AC1 Phone1",
        price: 200.05,
        rating: 3.8,
        warranty_years: 1,
        available: true,
    },
    SeedProduct {
        id: 2,
        name: "AC2 Phone2",
        price: 147.21,
        rating: 1.0,
        warranty_years: 3,
        available: false,
    },
    SeedProduct {
        id: 3,
        name: "AC3 Phone3",
        price: 150.0,
        rating: 2.0,
        warranty_years: 1,
        available: true,
    },
    SeedProduct {
        id: 4,
        name: "AC4 Phone4",
        price: 50.20,
        rating: 3.0,
        warranty_years: 2,
        available: true,
    },
];

/// Insert the sample products when the store is empty.
///
/// Returns the number of products inserted; a non-empty store is left alone.
///
/// # Errors
///
/// Propagates storage errors from counting or inserting.
pub async fn seed_products(repository: &dyn ProductsRepository) -> Result<usize, ProductsServiceError> {
    if repository.count_products().await? > 0 {
        return Ok(0);
    }

    let created_at = Timestamp::now();

    for seed in &SEED_PRODUCTS {
        repository
            .insert_product(
                ProductId::new(seed.id),
                ProductFields {
                    name: seed.name.to_string(),
                    kind: "phone".to_string(),
                    price: seed.price,
                    rating: seed.rating,
                    warranty_years: seed.warranty_years,
                    available: seed.available,
                },
                created_at,
            )
            .await?;
    }

    info!(count = SEED_PRODUCTS.len(), "seeded sample products");

    Ok(SEED_PRODUCTS.len())
}
