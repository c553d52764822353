//! Product request and response bodies

use jiff::Timestamp;
use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

use catalog_app::domain::products::{
    data::{NewProduct, ProductUpdate},
    models::Product,
};

/// Product as returned by the API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductResponse {
    /// Product identifier
    pub id: u64,

    pub name: String,

    /// Product category, e.g. `phone`
    #[serde(rename = "type")]
    pub kind: String,

    pub price: f64,

    /// Rating between 0 and 5
    pub rating: f64,

    pub warranty_years: u32,

    pub available: bool,

    /// RFC 3339 creation time
    #[salvo(schema(value_type = String, format = DateTime))]
    pub created_at: Timestamp,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.get(),
            name: product.name,
            kind: product.kind,
            price: product.price,
            rating: product.rating,
            warranty_years: product.warranty_years,
            available: product.available,
            created_at: product.created_at,
        }
    }
}

/// Product fields accepted on create and update
///
/// `null` and missing fields are treated alike. Unknown fields such as `id`
/// and `createdAt` are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProductPayload {
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub price: Option<f64>,

    pub rating: Option<f64>,

    #[serde(alias = "warranty_years")]
    pub warranty_years: Option<i64>,

    pub available: Option<bool>,
}

impl From<ProductPayload> for NewProduct {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            kind: payload.kind,
            price: payload.price,
            rating: payload.rating,
            warranty_years: payload.warranty_years,
            available: payload.available,
        }
    }
}

impl From<ProductPayload> for ProductUpdate {
    fn from(payload: ProductPayload) -> Self {
        Self {
            name: payload.name,
            kind: payload.kind,
            price: payload.price,
            rating: payload.rating,
            warranty_years: payload.warranty_years,
            available: payload.available,
        }
    }
}

/// Product Deleted Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProductDeletedResponse {
    pub message: String,

    /// Identifier of the removed product
    pub id: u64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use jiff::Timestamp;

    use catalog_app::domain::products::models::{Product, ProductId};

    pub(crate) fn make_product(id: u64) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("AC{id} Phone{id}"),
            kind: "phone".to_owned(),
            price: 100.0,
            rating: 4.0,
            warranty_years: 2,
            available: true,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }
}
