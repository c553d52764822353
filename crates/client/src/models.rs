//! Product Models

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Product as served by the catalog API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub price: f64,
    pub rating: f64,
    pub warranty_years: u32,
    pub available: bool,
    pub created_at: Timestamp,
}

/// Fields sent on create and update. `None` fields are left out of the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub warranty_years: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

/// Body of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Deleted {
    pub message: String,
    pub id: u64,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use jiff::Timestamp;

    use super::Product;

    pub(crate) fn make_product(id: u64) -> Product {
        Product {
            id,
            name: format!("AC{id} Phone{id}"),
            kind: "phone".to_owned(),
            price: 150.0,
            rating: 2.0,
            warranty_years: 1,
            available: true,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn product_decodes_from_api_json() -> TestResult {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "name": "AC1 Phone1",
            "type": "phone",
            "price": 200.05,
            "rating": 3.8,
            "warrantyYears": 1,
            "available": true,
            "createdAt": "2026-03-01T10:00:00Z",
        }))?;

        assert_eq!(product.id, 1);
        assert_eq!(product.kind, "phone");
        assert_eq!(product.created_at, "2026-03-01T10:00:00Z".parse::<Timestamp>()?);

        Ok(())
    }

    #[test]
    fn draft_omits_absent_fields() -> TestResult {
        let draft = ProductDraft {
            available: Some(false),
            ..ProductDraft::default()
        };

        assert_eq!(serde_json::to_value(draft)?, json!({ "available": false }));

        Ok(())
    }
}
