//! Test helpers.

use std::sync::Arc;

use salvo::{affix_state::inject, prelude::*};

use catalog_app::{
    context::AppContext, domain::products::MockProductsService, relay::BroadcastRelay,
};

use crate::state::State;

pub(crate) const TEST_ORIGIN: &str = "http://localhost:3000";

pub(crate) fn state_with_products(
    products: MockProductsService,
    relay: BroadcastRelay,
    announce_mutations: bool,
) -> Arc<State> {
    State::new(
        AppContext::new(Arc::new(products), relay),
        TEST_ORIGIN.to_owned(),
        announce_mutations,
    )
    .into_shared()
}

pub(crate) fn service_with_state(state: Arc<State>, route: Router) -> Service {
    Service::new(Router::new().hoop(inject(state)).push(route))
}

pub(crate) fn products_service(products: MockProductsService, route: Router) -> Service {
    service_with_state(
        state_with_products(products, BroadcastRelay::new(8), false),
        route,
    )
}
