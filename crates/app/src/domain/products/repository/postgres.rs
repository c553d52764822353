//! PostgreSQL products repository.

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};

use crate::domain::products::{
    errors::ProductsServiceError,
    models::{Product, ProductId},
    validation::ProductFields,
};

use super::ProductsRepository;

const MAX_PRODUCT_ID_SQL: &str = include_str!("sql/max_product_id.sql");
const COUNT_PRODUCTS_SQL: &str = include_str!("sql/count_products.sql");
const LIST_PRODUCTS_SQL: &str = include_str!("sql/list_products.sql");
const GET_PRODUCT_SQL: &str = include_str!("sql/get_product.sql");
const INSERT_PRODUCT_SQL: &str = include_str!("sql/insert_product.sql");
const UPDATE_PRODUCT_SQL: &str = include_str!("sql/update_product.sql");
const DELETE_PRODUCT_SQL: &str = include_str!("sql/delete_product.sql");

#[derive(Debug, Clone)]
pub struct PgProductsRepository {
    pool: PgPool,
}

impl PgProductsRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductsRepository for PgProductsRepository {
    async fn max_product_id(&self) -> Result<Option<ProductId>, ProductsServiceError> {
        let max_id: Option<i64> = query_scalar(MAX_PRODUCT_ID_SQL)
            .fetch_one(&self.pool)
            .await?;

        max_id.map(id_from_column).transpose().map_err(Into::into)
    }

    async fn count_products(&self) -> Result<u64, ProductsServiceError> {
        let count: i64 = query_scalar(COUNT_PRODUCTS_SQL)
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(count).map_err(|e| {
            ProductsServiceError::from(sqlx::Error::ColumnDecode {
                index: "count".to_string(),
                source: Box::new(e),
            })
        })
    }

    async fn list_products(&self) -> Result<Vec<Product>, ProductsServiceError> {
        Ok(query_as::<Postgres, Product>(LIST_PRODUCTS_SQL)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn get_product(&self, id: ProductId) -> Result<Product, ProductsServiceError> {
        Ok(query_as::<Postgres, Product>(GET_PRODUCT_SQL)
            .bind(id_to_column(id)?)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn insert_product(
        &self,
        id: ProductId,
        fields: ProductFields,
        created_at: Timestamp,
    ) -> Result<Product, ProductsServiceError> {
        Ok(query_as::<Postgres, Product>(INSERT_PRODUCT_SQL)
            .bind(id_to_column(id)?)
            .bind(fields.name)
            .bind(fields.kind)
            .bind(fields.price)
            .bind(fields.rating)
            .bind(i64::from(fields.warranty_years))
            .bind(fields.available)
            .bind(SqlxTimestamp::from(created_at))
            .fetch_one(&self.pool)
            .await?)
    }

    async fn update_product(
        &self,
        id: ProductId,
        fields: ProductFields,
    ) -> Result<Product, ProductsServiceError> {
        Ok(query_as::<Postgres, Product>(UPDATE_PRODUCT_SQL)
            .bind(id_to_column(id)?)
            .bind(fields.name)
            .bind(fields.kind)
            .bind(fields.price)
            .bind(fields.rating)
            .bind(i64::from(fields.warranty_years))
            .bind(fields.available)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn delete_product(&self, id: ProductId) -> Result<u64, ProductsServiceError> {
        let rows_affected = query(DELETE_PRODUCT_SQL)
            .bind(id_to_column(id)?)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn id_to_column(id: ProductId) -> Result<i64, sqlx::Error> {
    i64::try_from(id.get()).map_err(|e| sqlx::Error::Encode(Box::new(e)))
}

fn id_from_column(id: i64) -> Result<ProductId, sqlx::Error> {
    u64::try_from(id)
        .map(ProductId::new)
        .map_err(|e| sqlx::Error::ColumnDecode {
            index: "id".to_string(),
            source: Box::new(e),
        })
}

impl<'r> FromRow<'r, PgRow> for Product {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let warranty_years: i64 = row.try_get("warranty_years")?;

        let warranty_years =
            u32::try_from(warranty_years).map_err(|e| sqlx::Error::ColumnDecode {
                index: "warranty_years".to_string(),
                source: Box::new(e),
            })?;

        Ok(Self {
            id: id_from_column(row.try_get("id")?)?,
            name: row.try_get("name")?,
            kind: row.try_get("type")?,
            price: row.try_get("price")?,
            rating: row.try_get("rating")?,
            warranty_years,
            available: row.try_get("available")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}
