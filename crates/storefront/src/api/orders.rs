//! Order endpoints. All require a bearer token.

use kube_ec_core::{OrderId, UserId};
use reqwest::Method;
use tracing::instrument;

use super::{AccessToken, ApiClient, ApiError, CreateOrderRequest, Order, OrderListResponse};

impl ApiClient {
    /// Place an order.
    ///
    /// # Errors
    ///
    /// Returns the backend's message if the order is rejected.
    #[instrument(skip(self, request, auth), fields(user_id = %request.user_id, lines = request.items.len()))]
    pub async fn create_order(
        &self,
        request: &CreateOrderRequest,
        auth: &AccessToken,
    ) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders"])?;
        let order: Order = self
            .send(self.request(Method::POST, url, Some(auth)).json(request))
            .await?;

        tracing::info!(order_id = %order.id, total = %order.total_amount, "Order created");
        Ok(order)
    }

    /// Fetch a single order.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with status 404 if the order does not exist.
    #[instrument(skip(self, auth), fields(order_id = %id))]
    pub async fn get_order(&self, id: &OrderId, auth: &AccessToken) -> Result<Order, ApiError> {
        let url = self.endpoint(&["orders", id.as_str()])?;
        self.send(self.request(Method::GET, url, Some(auth))).await
    }

    /// List a user's orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response is malformed.
    #[instrument(skip(self, auth), fields(user_id = %user_id))]
    pub async fn list_orders(
        &self,
        user_id: &UserId,
        page: u32,
        page_size: u32,
        auth: &AccessToken,
    ) -> Result<OrderListResponse, ApiError> {
        let mut url = self.endpoint(&["orders"])?;
        url.query_pairs_mut()
            .append_pair("user_id", user_id.as_str())
            .append_pair("page", &page.to_string())
            .append_pair("page_size", &page_size.to_string());

        self.send(self.request(Method::GET, url, Some(auth))).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use kube_ec_core::{Money, OrderStatus, ProductId};
    use serde_json::json;

    use super::*;
    use crate::api::{Address, OrderItem};
    use crate::config::ApiConfig;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig::new(&server.url("/api/v1"), None).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_create_order_sends_lines_and_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/orders")
                    .header("authorization", "Bearer tok-1")
                    .body_includes(r#""user_id":"u1""#)
                    .body_includes(r#""unit_price":{"currency":"JPY","amount":1000}"#);
                then.status(201).json_body(json!({
                    "id": "o1", "user_id": "u1",
                    "total_amount": { "currency": "JPY", "amount": 2000 },
                    "status": "ORDER_STATUS_PENDING"
                }));
            })
            .await;

        let request = CreateOrderRequest {
            user_id: UserId::new("u1"),
            items: vec![OrderItem {
                product_id: ProductId::new("p1"),
                product_name: "Mug".to_string(),
                quantity: 2,
                unit_price: Money::jpy(1000),
                subtotal: Money::jpy(2000),
            }],
            shipping_address: Address::default(),
        };
        let order = client_for(&server)
            .create_order(&request, &AccessToken::new("tok-1"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(order.id.as_str(), "o1");
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_list_orders_query() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/orders")
                    .query_param("user_id", "u1")
                    .query_param("page", "1")
                    .query_param("page_size", "20");
                then.status(200).json_body(json!({
                    "orders": [{ "id": "o1" }, { "id": "o2", "status": 5 }],
                    "pagination": { "total_count": 2, "total_pages": 1, "current_page": 1 }
                }));
            })
            .await;

        let response = client_for(&server)
            .list_orders(&UserId::new("u1"), 1, 20, &AccessToken::new("tok-1"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(response.orders.len(), 2);
        assert_eq!(response.orders[1].status, OrderStatus::Delivered);
    }

    #[tokio::test]
    async fn test_get_order_not_found() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/v1/orders/o9");
                then.status(404).json_body(json!({ "error": "order not found" }));
            })
            .await;

        let err = client_for(&server)
            .get_order(&OrderId::new("o9"), &AccessToken::new("tok-1"))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
    }
}
