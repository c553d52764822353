//! Products Data

/// New Product Data
///
/// Every field is optional so that missing values surface as validation
/// errors naming the field rather than as decoding failures.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewProduct {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub warranty_years: Option<i64>,
    pub available: Option<bool>,
}

/// Product Update Data
///
/// `Some` replaces the stored value, including empty strings, `0` and
/// `false`; `None` leaves it untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub price: Option<f64>,
    pub rating: Option<f64>,
    pub warranty_years: Option<i64>,
    pub available: Option<bool>,
}

impl ProductUpdate {
    /// Whether the update carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
