//! Request state for the products collection.
//!
//! Every dispatched operation gets an [`OperationId`] when it starts and
//! settles exactly once, either fulfilled or rejected. `loading` stays true
//! while any operation is in flight.

use std::{collections::BTreeMap, fmt};

use thiserror::Error;

use crate::models::Product;

/// The asynchronous operations tracked for the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    FetchAll,
    FetchOne,
    Create,
    Update,
    Delete,
}

impl OperationKind {
    /// Create, update and delete report `success`.
    #[must_use]
    pub fn is_mutation(self) -> bool {
        matches!(self, Self::Create | Self::Update | Self::Delete)
    }
}

/// Identifier of one dispatched operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OperationId(u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// Result carried by a fulfilled operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Fulfilled {
    FetchAll(Vec<Product>),
    FetchOne(Product),
    Create(Product),
    Update(Product),
    Delete(u64),
}

impl Fulfilled {
    fn kind(&self) -> OperationKind {
        match self {
            Self::FetchAll(_) => OperationKind::FetchAll,
            Self::FetchOne(_) => OperationKind::FetchOne,
            Self::Create(_) => OperationKind::Create,
            Self::Update(_) => OperationKind::Update,
            Self::Delete(_) => OperationKind::Delete,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("operation {0} is not pending")]
    NotPending(OperationId),

    #[error("operation {id} is a {expected:?} but was settled as {actual:?}")]
    KindMismatch {
        id: OperationId,
        expected: OperationKind,
        actual: OperationKind,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ProductsState {
    items: Vec<Product>,
    loading: bool,
    error: Option<String>,
    success: bool,
    next_operation: u64,
    pending: BTreeMap<OperationId, OperationKind>,
}

impl ProductsState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn items(&self) -> &[Product] {
        &self.items
    }

    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// One-shot flag raised by a fulfilled mutation until [`Self::reset_status`].
    #[must_use]
    pub fn success(&self) -> bool {
        self.success
    }

    /// Number of operations that have started but not settled.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Mark an operation of `kind` as pending.
    pub fn begin(&mut self, kind: OperationKind) -> OperationId {
        self.next_operation += 1;

        let id = OperationId(self.next_operation);

        self.pending.insert(id, kind);
        self.loading = true;

        if kind.is_mutation() {
            self.error = None;
            self.success = false;
        }

        id
    }

    /// Apply the result of a pending operation.
    ///
    /// # Errors
    ///
    /// Fails without touching the state when `id` is not pending or the
    /// result belongs to a different kind of operation.
    pub fn fulfill(&mut self, id: OperationId, result: Fulfilled) -> Result<(), TransitionError> {
        let expected = *self.pending.get(&id).ok_or(TransitionError::NotPending(id))?;
        let actual = result.kind();

        if expected != actual {
            return Err(TransitionError::KindMismatch {
                id,
                expected,
                actual,
            });
        }

        self.pending.remove(&id);

        match result {
            Fulfilled::FetchAll(products) => self.items = products,
            Fulfilled::FetchOne(product) | Fulfilled::Create(product) => self.upsert(product),
            Fulfilled::Update(product) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id == product.id) {
                    *item = product;
                }
            }
            Fulfilled::Delete(removed) => self.items.retain(|item| item.id != removed),
        }

        if actual.is_mutation() {
            self.success = true;
        }

        self.loading = !self.pending.is_empty();

        Ok(())
    }

    /// Record the failure of a pending operation.
    ///
    /// # Errors
    ///
    /// Fails without touching the state when `id` is not pending.
    pub fn reject(&mut self, id: OperationId, message: impl Into<String>) -> Result<(), TransitionError> {
        let kind = self.pending.remove(&id).ok_or(TransitionError::NotPending(id))?;

        self.error = Some(message.into());

        if kind.is_mutation() {
            self.success = false;
        }

        self.loading = !self.pending.is_empty();

        Ok(())
    }

    /// Clear `error` and `success` after a consumer has acted on them.
    pub fn reset_status(&mut self) {
        self.error = None;
        self.success = false;
    }

    fn upsert(&mut self, product: Product) {
        match self.items.iter_mut().find(|item| item.id == product.id) {
            Some(item) => *item = product,
            None => self.items.push(product),
        }
    }
}
