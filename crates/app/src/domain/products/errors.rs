//! Products service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProductsServiceError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("product not found")]
    NotFound,

    #[error("product identifier already taken")]
    Conflict,

    #[error("storage error")]
    Storage(#[source] Error),
}

impl ProductsServiceError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}

impl From<Error> for ProductsServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::Conflict,
            Some(ErrorKind::NotNullViolation) => Self::invalid("missing required product field"),
            Some(ErrorKind::CheckViolation) => Self::invalid("product field out of range"),
            Some(ErrorKind::ForeignKeyViolation | ErrorKind::Other | _) | None => {
                Self::Storage(error)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        let error = ProductsServiceError::from(Error::RowNotFound);

        assert!(
            matches!(error, ProductsServiceError::NotFound),
            "expected NotFound, got {error:?}"
        );
    }

    #[test]
    fn pool_timeout_maps_to_storage() {
        let error = ProductsServiceError::from(Error::PoolTimedOut);

        assert!(
            matches!(error, ProductsServiceError::Storage(_)),
            "expected Storage, got {error:?}"
        );
    }

    #[test]
    fn invalid_input_displays_its_message() {
        let error = ProductsServiceError::invalid("price must be zero or greater");

        assert_eq!(error.to_string(), "price must be zero or greater");
    }
}
