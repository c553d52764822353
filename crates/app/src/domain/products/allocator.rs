//! Product identifier allocation.
//!
//! Allocation reads the current maximum and adds one. Nothing reserves the
//! identifier between the read and the caller's insert, so two concurrent
//! allocations can return the same value; the store's uniqueness check turns
//! the losing insert into [`ProductsServiceError::Conflict`].

use crate::domain::products::{
    errors::ProductsServiceError, models::ProductId, repository::ProductsRepository,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct IdAllocator;

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Compute the identifier for the next product.
    ///
    /// Returns [`ProductId::FIRST`] for an empty store, otherwise one more than
    /// the largest stored identifier.
    ///
    /// # Errors
    ///
    /// Propagates storage errors, and returns
    /// [`ProductsServiceError::InvalidInput`] if the identifier space is exhausted.
    pub async fn next_id(
        &self,
        repository: &dyn ProductsRepository,
    ) -> Result<ProductId, ProductsServiceError> {
        match repository.max_product_id().await? {
            None => Ok(ProductId::FIRST),
            Some(max) => max
                .next()
                .ok_or_else(|| ProductsServiceError::invalid("no product identifiers left")),
        }
    }
}
