//! Update Product Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};

use catalog_app::domain::products::data::ProductUpdate;

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductPayload, ProductResponse},
    },
    state::State,
};

/// Product Update Handler
///
/// Fields present in the body replace the stored values; absent or `null`
/// fields are left unchanged.
#[endpoint(
    tags("products"),
    summary = "Update Product",
    responses(
        (status_code = StatusCode::OK, description = "Product updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "products.update",
    skip(id, json, depot),
    fields(product_id = tracing::field::Empty, fields_present = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<u64>,
    json: JsonBody<ProductPayload>,
    depot: &mut Depot,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let id = id.into_inner();
    let update = ProductUpdate::from(json.into_inner());

    let span = tracing::Span::current();

    span.record("product_id", id);
    span.record("fields_present", !update.is_empty());

    let product = state
        .app
        .products
        .update_product(id.into(), update)
        .await
        .map_err(into_status_error)?;

    state.announce_mutation("update", product.id);

    Ok(Json(product.into()))
}
