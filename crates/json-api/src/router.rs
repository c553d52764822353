//! App Router

use salvo::Router;

use crate::{healthcheck, products, push};

/// Routes served by the catalog API, without middleware.
pub(crate) fn app_router() -> Router {
    Router::new()
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("ws").get(push::handler))
        .push(
            Router::with_path("api/products")
                .get(products::index::handler)
                .post(products::create::handler)
                .push(
                    Router::with_path("{id}")
                        .get(products::get::handler)
                        .put(products::update::handler)
                        .delete(products::delete::handler),
                ),
        )
}
