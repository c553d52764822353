//! State

use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use catalog_app::{context::AppContext, domain::products::models::ProductId};

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
    pub(crate) allowed_origin: String,
    pub(crate) announce_mutations: bool,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext, allowed_origin: String, announce_mutations: bool) -> Self {
        Self {
            app,
            allowed_origin,
            announce_mutations,
        }
    }

    #[must_use]
    pub(crate) fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Tell push sessions about a successful mutation when announcing is on.
    pub(crate) fn announce_mutation(&self, action: &str, id: ProductId) {
        if !self.announce_mutations {
            return;
        }

        let delivered = self
            .app
            .relay
            .publish(None, json!({ "action": action, "id": id }));

        debug!(action, %id, delivered, "announced product mutation");
    }
}
