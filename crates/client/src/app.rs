//! Client composition root.
//!
//! [`CatalogClient`] drives every REST call through the request state,
//! reports outcomes on the notification queue and tells other clients
//! about its own changes over the push channel.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

use crate::{
    api::{ApiError, ProductsApi},
    models::{Product, ProductDraft},
    notification::{NotificationQueue, Severity},
    push::{ChangePublisher, PRODUCT_UPDATED_EVENT, PushError, PushFrame, PushHandler},
    state::{Fulfilled, OperationId, OperationKind, ProductsState},
};

/// Shown after a change event triggered a refresh.
pub const PRODUCTS_UPDATED_MESSAGE: &str = "Products were updated";

pub struct CatalogClient {
    api: Arc<dyn ProductsApi>,
    state: Mutex<ProductsState>,
    notifications: NotificationQueue,
    publisher: RwLock<Option<Arc<dyn ChangePublisher>>>,
}

impl std::fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("notifications", &self.notifications)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    #[must_use]
    pub fn new(api: Arc<dyn ProductsApi>, notifications: NotificationQueue) -> Self {
        Self {
            api,
            state: Mutex::new(ProductsState::new()),
            notifications,
            publisher: RwLock::new(None),
        }
    }

    /// Announce successful mutations through `publisher` from now on.
    pub async fn set_publisher(&self, publisher: Arc<dyn ChangePublisher>) {
        *self.publisher.write().await = Some(publisher);
    }

    /// Stop announcing mutations.
    pub async fn clear_publisher(&self) {
        *self.publisher.write().await = None;
    }

    /// Copy of the current request state.
    pub async fn snapshot(&self) -> ProductsState {
        self.state.lock().await.clone()
    }

    /// Clear the one-shot `error` and `success` signals.
    pub async fn reset_status(&self) {
        self.state.lock().await.reset_status();
    }

    #[must_use]
    pub fn notifications(&self) -> &NotificationQueue {
        &self.notifications
    }

    /// Replace the local collection with the server's.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording and announcing it.
    pub async fn fetch_products(&self) -> Result<Vec<Product>, ApiError> {
        let op = self.begin(OperationKind::FetchAll).await;

        match self.api.list_products().await {
            Ok(products) => {
                self.fulfill(op, Fulfilled::FetchAll(products.clone())).await;

                Ok(products)
            }
            Err(error) => Err(self.reject(op, error).await),
        }
    }

    /// Fetch one product and upsert it locally.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording and announcing it.
    pub async fn fetch_product(&self, id: u64) -> Result<Product, ApiError> {
        let op = self.begin(OperationKind::FetchOne).await;

        match self.api.get_product(id).await {
            Ok(product) => {
                self.fulfill(op, Fulfilled::FetchOne(product.clone())).await;

                Ok(product)
            }
            Err(error) => Err(self.reject(op, error).await),
        }
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording and announcing it.
    pub async fn create_product(&self, draft: ProductDraft) -> Result<Product, ApiError> {
        let op = self.begin(OperationKind::Create).await;

        match self.api.create_product(draft).await {
            Ok(product) => {
                self.fulfill(op, Fulfilled::Create(product.clone())).await;
                self.mutation_succeeded("create", product.id, "Product created").await;

                Ok(product)
            }
            Err(error) => Err(self.reject(op, error).await),
        }
    }

    /// Update the fields present in `draft`.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording and announcing it.
    pub async fn update_product(&self, id: u64, draft: ProductDraft) -> Result<Product, ApiError> {
        let op = self.begin(OperationKind::Update).await;

        match self.api.update_product(id, draft).await {
            Ok(product) => {
                self.fulfill(op, Fulfilled::Update(product.clone())).await;
                self.mutation_succeeded("update", product.id, "Product updated").await;

                Ok(product)
            }
            Err(error) => Err(self.reject(op, error).await),
        }
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns the API error after recording and announcing it.
    pub async fn delete_product(&self, id: u64) -> Result<u64, ApiError> {
        let op = self.begin(OperationKind::Delete).await;

        match self.api.delete_product(id).await {
            Ok(removed) => {
                self.fulfill(op, Fulfilled::Delete(removed)).await;
                self.mutation_succeeded("delete", removed, "Product deleted").await;

                Ok(removed)
            }
            Err(error) => Err(self.reject(op, error).await),
        }
    }

    async fn begin(&self, kind: OperationKind) -> OperationId {
        self.state.lock().await.begin(kind)
    }

    async fn fulfill(&self, op: OperationId, result: Fulfilled) {
        if let Err(error) = self.state.lock().await.fulfill(op, result) {
            warn!("dropped operation result: {error}");
        }
    }

    async fn reject(&self, op: OperationId, error: ApiError) -> ApiError {
        let message = error.user_message();

        warn!(operation = %op, "catalog request failed: {error}");

        if let Err(transition) = self.state.lock().await.reject(op, message.clone()) {
            warn!("dropped operation failure: {transition}");
        }

        self.notifications.show(message, Severity::Error);

        error
    }

    async fn mutation_succeeded(&self, action: &str, id: u64, message: &str) {
        self.notifications.show(message, Severity::Success);

        let publisher = self.publisher.read().await.clone();

        if let Some(publisher) = publisher
            && let Err(error) = publisher.publish_change(json!({ "action": action, "id": id }))
        {
            warn!(action, id, "could not announce change: {error}");
        }
    }
}

#[async_trait]
impl PushHandler for CatalogClient {
    async fn on_open(&self) {
        info!("listening for product changes");
    }

    async fn on_event(&self, frame: PushFrame) {
        if frame.event != PRODUCT_UPDATED_EVENT {
            warn!(event = %frame.event, "ignored unknown push event");
            return;
        }

        self.notifications.show(PRODUCTS_UPDATED_MESSAGE, Severity::Info);

        // Failures are already recorded and shown.
        let _refresh = self.fetch_products().await;
    }

    async fn on_close(&self) {
        self.clear_publisher().await;

        warn!("push channel closed, live updates stopped");
    }

    async fn on_error(&self, error: &PushError) {
        warn!("push channel error: {error}");
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use testresult::TestResult;

    use crate::{
        api::{MockProductsApi, NETWORK_UNREACHABLE_MESSAGE},
        models::fixtures::make_product,
        notification::Notification,
        push::MockChangePublisher,
    };

    use super::*;

    fn client(api: MockProductsApi) -> CatalogClient {
        CatalogClient::new(Arc::new(api), NotificationQueue::spawn())
    }

    fn expect_change(publisher: &mut MockChangePublisher, expected: Value) {
        publisher
            .expect_publish_change()
            .once()
            .withf(move |payload| *payload == expected)
            .returning(|_| Ok(()));
    }

    fn notification(client: &CatalogClient) -> Option<Notification> {
        client.notifications().current()
    }

    async fn settle(client: &CatalogClient) -> TestResult {
        // The queue applies commands on its own task.
        let mut slot = client.notifications().subscribe();

        slot.changed().await?;

        Ok(())
    }

    #[tokio::test]
    async fn create_success_updates_state_notifies_and_announces() -> TestResult {
        let mut api = MockProductsApi::new();

        api.expect_create_product()
            .once()
            .returning(|_| Ok(make_product(5)));

        let mut publisher = MockChangePublisher::new();

        expect_change(&mut publisher, json!({ "action": "create", "id": 5 }));

        let client = client(api);

        client.set_publisher(Arc::new(publisher)).await;

        let mut slot = client.notifications().subscribe();

        client.create_product(ProductDraft::default()).await?;
        slot.changed().await?;

        let state = client.snapshot().await;

        assert!(state.success());
        assert!(!state.loading());
        assert_eq!(state.items(), [make_product(5)].as_slice());
        assert_eq!(
            notification(&client),
            Some(Notification {
                message: "Product created".to_owned(),
                severity: Severity::Success,
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn network_failure_is_recorded_and_shown() -> TestResult {
        let mut api = MockProductsApi::new();

        api.expect_delete_product()
            .once()
            .returning(|_| Err(ApiError::NetworkUnreachable("connection refused".into())));

        let mut publisher = MockChangePublisher::new();

        publisher.expect_publish_change().never();

        let client = client(api);

        client.set_publisher(Arc::new(publisher)).await;

        let mut slot = client.notifications().subscribe();

        assert!(client.delete_product(3).await.is_err());

        slot.changed().await?;

        let state = client.snapshot().await;

        assert!(!state.success());
        assert!(!state.loading());
        assert_eq!(state.error(), Some(NETWORK_UNREACHABLE_MESSAGE));
        assert_eq!(
            notification(&client),
            Some(Notification {
                message: NETWORK_UNREACHABLE_MESSAGE.to_owned(),
                severity: Severity::Error,
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn server_message_reaches_the_user() -> TestResult {
        let mut api = MockProductsApi::new();

        api.expect_update_product().once().returning(|_, _| {
            Err(ApiError::Server {
                status: 400,
                message: "rating must be between 0 and 5".to_owned(),
            })
        });

        let client = client(api);

        assert!(client.update_product(1, ProductDraft::default()).await.is_err());

        settle(&client).await?;

        assert_eq!(
            client.snapshot().await.error(),
            Some("rating must be between 0 and 5")
        );

        Ok(())
    }

    #[tokio::test]
    async fn product_updated_event_refetches_once_and_informs() -> TestResult {
        let mut api = MockProductsApi::new();

        api.expect_list_products()
            .once()
            .returning(|| Ok(vec![make_product(1), make_product(2)]));

        let client = client(api);
        let mut slot = client.notifications().subscribe();

        client
            .on_event(PushFrame {
                event: PRODUCT_UPDATED_EVENT.to_owned(),
                data: json!({ "action": "delete", "id": 3 }),
            })
            .await;

        slot.changed().await?;

        assert_eq!(client.snapshot().await.items().len(), 2);
        assert_eq!(
            notification(&client),
            Some(Notification {
                message: PRODUCTS_UPDATED_MESSAGE.to_owned(),
                severity: Severity::Info,
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn other_events_do_not_refetch() {
        let mut api = MockProductsApi::new();

        api.expect_list_products().never();

        let client = client(api);

        client
            .on_event(PushFrame {
                event: "product-update".to_owned(),
                data: Value::Null,
            })
            .await;

        assert_eq!(notification(&client), None);
    }

    #[tokio::test]
    async fn fetch_one_upserts_into_items() -> TestResult {
        let mut api = MockProductsApi::new();

        api.expect_get_product()
            .once()
            .withf(|id| *id == 4)
            .returning(|id| Ok(make_product(id)));

        let client = client(api);

        client.fetch_product(4).await?;

        let state = client.snapshot().await;

        assert_eq!(state.items(), [make_product(4)].as_slice());
        assert!(!state.success(), "fetches never raise success");

        Ok(())
    }

    #[tokio::test]
    async fn closed_push_channel_stops_announcing() -> TestResult {
        let mut api = MockProductsApi::new();

        api.expect_create_product()
            .once()
            .returning(|_| Ok(make_product(6)));

        let mut publisher = MockChangePublisher::new();

        publisher.expect_publish_change().never();

        let client = client(api);

        client.set_publisher(Arc::new(publisher)).await;
        client.on_close().await;
        client.create_product(ProductDraft::default()).await?;

        Ok(())
    }
}
