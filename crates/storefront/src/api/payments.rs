//! Payment endpoints. All require a bearer token.

use reqwest::Method;
use tracing::instrument;

use super::{
    AccessToken, ApiClient, ApiError, CreatePaymentRequest, Payment, ProcessPaymentRequest,
    ProcessPaymentResponse,
};

impl ApiClient {
    /// Create a pending payment for an order.
    ///
    /// # Errors
    ///
    /// Returns the backend's message if the payment is rejected.
    #[instrument(skip(self, request, auth), fields(order_id = %request.order_id, method = %request.method))]
    pub async fn create_payment(
        &self,
        request: &CreatePaymentRequest,
        auth: &AccessToken,
    ) -> Result<Payment, ApiError> {
        let url = self.endpoint(&["payments"])?;
        self.send(self.request(Method::POST, url, Some(auth)).json(request))
            .await
    }

    /// Capture a pending payment.
    ///
    /// A declined payment is returned as `Ok` with `success == false`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request itself fails.
    #[instrument(skip(self, request, auth), fields(payment_id = %request.payment_id))]
    pub async fn process_payment(
        &self,
        request: &ProcessPaymentRequest,
        auth: &AccessToken,
    ) -> Result<ProcessPaymentResponse, ApiError> {
        let url = self.endpoint(&["payments", "process"])?;
        let response: ProcessPaymentResponse = self
            .send(self.request(Method::POST, url, Some(auth)).json(request))
            .await?;

        if response.success {
            tracing::info!(transaction_id = %response.transaction_id, "Payment processed");
        } else {
            tracing::warn!(message = %response.message, "Payment declined");
        }
        Ok(response)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use kube_ec_core::{Money, OrderId, PaymentId, PaymentMethod, PaymentStatus, UserId};
    use secrecy::SecretString;
    use serde_json::json;

    use super::*;
    use crate::config::ApiConfig;

    fn client_for(server: &MockServer) -> ApiClient {
        ApiClient::new(&ApiConfig::new(&server.url("/api/v1"), None).unwrap()).unwrap()
    }

    #[tokio::test]
    async fn test_create_payment() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/api/v1/payments").json_body(json!({
                    "order_id": "o1",
                    "user_id": "u1",
                    "amount": { "currency": "JPY", "amount": 4000 },
                    "method": "credit_card"
                }));
                then.status(201).json_body(json!({
                    "id": "pay-1", "order_id": "o1", "user_id": "u1",
                    "amount": { "currency": "JPY", "amount": 4000 },
                    "status": 1, "method": "credit_card"
                }));
            })
            .await;

        let request = CreatePaymentRequest {
            order_id: OrderId::new("o1"),
            user_id: UserId::new("u1"),
            amount: Money::jpy(4000),
            method: PaymentMethod::CreditCard,
        };
        let payment = client_for(&server)
            .create_payment(&request, &AccessToken::new("tok"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(payment.id.as_str(), "pay-1");
        assert_eq!(payment.status, PaymentStatus::Pending);
    }

    #[tokio::test]
    async fn test_process_payment_declined_is_ok() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/api/v1/payments/process")
                    .json_body(json!({ "payment_id": "pay-1", "payment_token": "tok_visa" }));
                then.status(200).json_body(json!({
                    "success": false,
                    "message": "payment is not in pending status"
                }));
            })
            .await;

        let request = ProcessPaymentRequest {
            payment_id: PaymentId::new("pay-1"),
            payment_token: SecretString::from("tok_visa".to_string()),
        };
        let response = client_for(&server)
            .process_payment(&request, &AccessToken::new("tok"))
            .await
            .unwrap();

        assert!(!response.success);
        assert_eq!(response.message, "payment is not in pending status");
    }
}
