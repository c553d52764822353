//! Create Product Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use crate::{
    extensions::*,
    products::{
        errors::into_status_error,
        models::{ProductPayload, ProductResponse},
    },
    state::State,
};

/// Create Product Handler
///
/// The identifier is always assigned by the server; any `id` in the body is
/// ignored.
#[endpoint(
    tags("products"),
    summary = "Create Product",
    responses(
        (status_code = StatusCode::CREATED, description = "Product created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid product payload"),
        (status_code = StatusCode::CONFLICT, description = "Identifier conflict, retry the create"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ProductPayload>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProductResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let product = state
        .app
        .products
        .create_product(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/api/products/{}", product.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    state.announce_mutation("create", product.id);

    Ok(Json(product.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use testresult::TestResult;

    use catalog_app::{
        domain::products::{MockProductsService, ProductsServiceError, data::NewProduct},
        relay::BroadcastRelay,
    };

    use crate::{
        products::{errors::CONFLICT_MESSAGE, models::fixtures::make_product},
        test_helpers::{products_service, service_with_state, state_with_products},
    };

    use super::*;

    fn make_service(repo: MockProductsService) -> Service {
        products_service(repo, Router::with_path("products").post(handler))
    }

    fn pixel() -> NewProduct {
        NewProduct {
            name: Some("Pixel".to_owned()),
            kind: Some("phone".to_owned()),
            price: Some(499.0),
            rating: None,
            warranty_years: Some(2),
            available: None,
        }
    }

    #[tokio::test]
    async fn test_create_product_success() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .withf(|new| *new == pixel())
            .return_once(|_| Ok(make_product(5)));

        repo.expect_update_product().never();
        repo.expect_delete_product().never();

        let mut res = TestClient::post("http://example.com/products")
            .json(&json!({
                "id": 42,
                "name": "Pixel",
                "type": "phone",
                "price": 499.0,
                "warrantyYears": 2,
            }))
            .send(&make_service(repo))
            .await;

        let body: ProductResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some("/api/products/5"));
        assert_eq!(body.id, 5);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_invalid_input_returns_400_with_message() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::InvalidInput("name is required".into())));

        let mut res = TestClient::post("http://example.com/products")
            .add_header("accept", "application/json", true)
            .json(&json!({ "type": "phone", "price": 1.0, "warrantyYears": 1 }))
            .send(&make_service(repo))
            .await;

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(body["error"]["brief"], "name is required");

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_conflict_returns_409() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Err(ProductsServiceError::Conflict));

        let mut res = TestClient::post("http://example.com/products")
            .add_header("accept", "application/json", true)
            .json(&json!({ "name": "Pixel", "type": "phone", "price": 1.0, "warrantyYears": 1 }))
            .send(&make_service(repo))
            .await;

        let body: serde_json::Value = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));
        assert_eq!(body["error"]["brief"], CONFLICT_MESSAGE);

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_malformed_json_returns_400() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product().never();

        let res = TestClient::post("http://example.com/products")
            .raw_json("{\"name\": ")
            .send(&make_service(repo))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_create_product_announces_when_enabled() -> TestResult {
        let mut repo = MockProductsService::new();

        repo.expect_create_product()
            .once()
            .return_once(|_| Ok(make_product(5)));

        let relay = BroadcastRelay::new(8);
        let mut session = relay.connect();
        let service = service_with_state(
            state_with_products(repo, relay, true),
            Router::with_path("products").post(handler),
        );

        let res = TestClient::post("http://example.com/products")
            .json(&json!({ "name": "Pixel", "type": "phone", "price": 1.0, "warrantyYears": 1 }))
            .send(&service)
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        let event = session.recv().await.ok_or("relay closed")?;

        assert_eq!(event.origin, None);
        assert_eq!(event.payload, json!({ "action": "create", "id": 5 }));

        Ok(())
    }
}
