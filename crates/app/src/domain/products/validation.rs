//! Product field validation.

use crate::domain::products::{
    data::{NewProduct, ProductUpdate},
    errors::ProductsServiceError,
    models::Product,
};

/// Upper bound for `rating`.
pub const MAX_RATING: f64 = 5.0;

/// Validated, trimmed product fields ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductFields {
    pub name: String,
    pub kind: String,
    pub price: f64,
    pub rating: f64,
    pub warranty_years: u32,
    pub available: bool,
}

impl ProductFields {
    /// Validate a creation payload, applying defaults for `rating` and `available`.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::InvalidInput`] naming the first missing or
    /// out-of-range field.
    pub fn from_new(product: NewProduct) -> Result<Self, ProductsServiceError> {
        let name = product
            .name
            .ok_or_else(|| ProductsServiceError::invalid("name is required"))?;

        let kind = product
            .kind
            .ok_or_else(|| ProductsServiceError::invalid("type is required"))?;

        let price = product
            .price
            .ok_or_else(|| ProductsServiceError::invalid("price is required"))?;

        let warranty_years = product
            .warranty_years
            .ok_or_else(|| ProductsServiceError::invalid("warrantyYears is required"))?;

        Ok(Self {
            name: text("name", &name)?,
            kind: text("type", &kind)?,
            price: price_value(price)?,
            rating: rating_value(product.rating.unwrap_or(0.0))?,
            warranty_years: warranty_value(warranty_years)?,
            available: product.available.unwrap_or(true),
        })
    }

    /// Merge an update into an existing product and re-validate the result.
    ///
    /// # Errors
    ///
    /// Returns [`ProductsServiceError::InvalidInput`] when a supplied field is
    /// out of range.
    pub fn merge(existing: &Product, update: ProductUpdate) -> Result<Self, ProductsServiceError> {
        Ok(Self {
            name: match update.name {
                Some(name) => text("name", &name)?,
                None => existing.name.clone(),
            },
            kind: match update.kind {
                Some(kind) => text("type", &kind)?,
                None => existing.kind.clone(),
            },
            price: update
                .price
                .map_or(Ok(existing.price), price_value)?,
            rating: update
                .rating
                .map_or(Ok(existing.rating), rating_value)?,
            warranty_years: update
                .warranty_years
                .map_or(Ok(existing.warranty_years), warranty_value)?,
            available: update.available.unwrap_or(existing.available),
        })
    }
}

fn text(field: &str, value: &str) -> Result<String, ProductsServiceError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(ProductsServiceError::invalid(format!(
            "{field} must not be empty"
        )));
    }

    Ok(trimmed.to_string())
}

fn price_value(price: f64) -> Result<f64, ProductsServiceError> {
    if !price.is_finite() || price < 0.0 {
        return Err(ProductsServiceError::invalid(
            "price must be zero or greater",
        ));
    }

    Ok(price)
}

fn rating_value(rating: f64) -> Result<f64, ProductsServiceError> {
    if !rating.is_finite() || !(0.0..=MAX_RATING).contains(&rating) {
        return Err(ProductsServiceError::invalid(
            "rating must be between 0 and 5",
        ));
    }

    Ok(rating)
}

fn warranty_value(years: i64) -> Result<u32, ProductsServiceError> {
    u32::try_from(years)
        .map_err(|_overflow| ProductsServiceError::invalid("warrantyYears must be zero or greater"))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use testresult::TestResult;

    use crate::domain::products::models::ProductId;

    use super::*;

    fn phone() -> NewProduct {
        NewProduct {
            name: Some("X".to_string()),
            kind: Some("phone".to_string()),
            price: Some(10.0),
            warranty_years: Some(1),
            ..NewProduct::default()
        }
    }

    fn stored() -> Product {
        Product {
            id: ProductId::new(7),
            name: "AC1 Phone1".to_string(),
            kind: "phone".to_string(),
            price: 200.05,
            rating: 3.8,
            warranty_years: 2,
            available: true,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    #[test]
    fn new_product_gets_rating_and_availability_defaults() -> TestResult {
        let fields = ProductFields::from_new(phone())?;

        assert_eq!(fields.name, "X");
        assert_eq!(fields.kind, "phone");
        assert!((fields.rating - 0.0).abs() < f64::EPSILON, "rating defaults to 0");
        assert!(fields.available, "available defaults to true");

        Ok(())
    }

    #[test]
    fn new_product_trims_text_fields() -> TestResult {
        let fields = ProductFields::from_new(NewProduct {
            name: Some("  Pixel  ".to_string()),
            ..phone()
        })?;

        assert_eq!(fields.name, "Pixel");

        Ok(())
    }

    #[test]
    fn new_product_missing_name_is_rejected() {
        let result = ProductFields::from_new(NewProduct {
            name: None,
            ..phone()
        });

        assert!(
            matches!(&result, Err(ProductsServiceError::InvalidInput(message)) if message == "name is required"),
            "expected missing name error, got {result:?}"
        );
    }

    #[test]
    fn blank_type_is_rejected() {
        let result = ProductFields::from_new(NewProduct {
            kind: Some("   ".to_string()),
            ..phone()
        });

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
    }

    #[test]
    fn negative_price_is_rejected() {
        let result = ProductFields::from_new(NewProduct {
            price: Some(-0.01),
            ..phone()
        });

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
    }

    #[test]
    fn rating_above_five_is_rejected() {
        let result = ProductFields::from_new(NewProduct {
            rating: Some(5.5),
            ..phone()
        });

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
    }

    #[test]
    fn negative_warranty_is_rejected() {
        let result = ProductFields::from_new(NewProduct {
            warranty_years: Some(-1),
            ..phone()
        });

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
    }

    #[test]
    fn empty_update_keeps_every_field() -> TestResult {
        let existing = stored();

        let merged = ProductFields::merge(&existing, ProductUpdate::default())?;

        assert_eq!(merged.name, existing.name);
        assert_eq!(merged.kind, existing.kind);
        assert!((merged.price - existing.price).abs() < f64::EPSILON);
        assert!((merged.rating - existing.rating).abs() < f64::EPSILON);
        assert_eq!(merged.warranty_years, existing.warranty_years);
        assert_eq!(merged.available, existing.available);

        Ok(())
    }

    #[test]
    fn zero_and_false_are_applied_as_real_values() -> TestResult {
        let merged = ProductFields::merge(
            &stored(),
            ProductUpdate {
                price: Some(0.0),
                rating: Some(0.0),
                warranty_years: Some(0),
                available: Some(false),
                ..ProductUpdate::default()
            },
        )?;

        assert!(merged.price.abs() < f64::EPSILON, "price set to 0");
        assert!(merged.rating.abs() < f64::EPSILON, "rating set to 0");
        assert_eq!(merged.warranty_years, 0);
        assert!(!merged.available, "available set to false");

        Ok(())
    }

    #[test]
    fn explicit_empty_name_is_rejected() {
        let result = ProductFields::merge(
            &stored(),
            ProductUpdate {
                name: Some(String::new()),
                ..ProductUpdate::default()
            },
        );

        assert!(
            matches!(result, Err(ProductsServiceError::InvalidInput(_))),
            "expected InvalidInput, got {result:?}"
        );
    }
}
