//! Order service client: the post-settlement status push.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{OrderId, PaymentId, PaymentStatus, PaymentStatusUpdate};
use reqwest::StatusCode;

use crate::error::ClientError;
use crate::http::{join_url, ok_status};

/// What the payment service needs from the order service.
#[async_trait]
pub trait OrderClient: Send + Sync {
    /// Pushes a settlement result onto an order.
    async fn update_payment_status(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
        status: PaymentStatus,
    ) -> Result<(), ClientError>;
}

/// HTTP implementation. The push endpoint is service-to-service and
/// carries no bearer token.
#[derive(Debug, Clone)]
pub struct HttpOrderClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpOrderClient {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl OrderClient for HttpOrderClient {
    async fn update_payment_status(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
        status: PaymentStatus,
    ) -> Result<(), ClientError> {
        let body = PaymentStatusUpdate {
            payment_id: payment_id.clone(),
            status,
        };
        let response = self
            .client
            .put(join_url(&self.base_url, &format!("/orders/{order_id}/payment")))
            .json(&body)
            .send()
            .await
            .map_err(ClientError::Unreachable)?;
        ok_status(response).map(|_| ())
    }
}

/// A recorded call to [`OrderClient::update_payment_status`].
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentStatusPush {
    pub order_id: OrderId,
    pub payment_id: PaymentId,
    pub status: PaymentStatus,
}

#[derive(Debug, Default)]
struct InMemoryOrderState {
    pushes: Vec<PaymentStatusPush>,
    fail_on_update: bool,
}

/// In-memory order client for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderClient {
    state: Arc<RwLock<InMemoryOrderState>>,
}

impl InMemoryOrderClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures update calls to fail.
    pub fn set_fail_on_update(&self, fail: bool) {
        self.state.write().unwrap().fail_on_update = fail;
    }

    /// All pushes received so far, in order.
    pub fn pushes(&self) -> Vec<PaymentStatusPush> {
        self.state.read().unwrap().pushes.clone()
    }

    pub fn push_count(&self) -> usize {
        self.state.read().unwrap().pushes.len()
    }
}

#[async_trait]
impl OrderClient for InMemoryOrderClient {
    async fn update_payment_status(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
        status: PaymentStatus,
    ) -> Result<(), ClientError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_update {
            return Err(ClientError::Status {
                status: StatusCode::SERVICE_UNAVAILABLE,
            });
        }

        state.pushes.push(PaymentStatusPush {
            order_id: order_id.clone(),
            payment_id: payment_id.clone(),
            status,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pushes_are_recorded_in_order() {
        let client = InMemoryOrderClient::new();
        let order_id = OrderId::from("ORD-20260825-AAAA1111");
        let payment_id = PaymentId::from("PAY-20260825120000-ABC123");

        client
            .update_payment_status(&order_id, &payment_id, PaymentStatus::Completed)
            .await
            .unwrap();

        let pushes = client.pushes();
        assert_eq!(pushes.len(), 1);
        assert_eq!(pushes[0].order_id, order_id);
        assert_eq!(pushes[0].status, PaymentStatus::Completed);
    }

    #[tokio::test]
    async fn test_fail_on_update_records_nothing() {
        let client = InMemoryOrderClient::new();
        client.set_fail_on_update(true);

        let result = client
            .update_payment_status(
                &OrderId::from("ORD-20260825-BBBB2222"),
                &PaymentId::from("PAY-20260825120000-DEF456"),
                PaymentStatus::Completed,
            )
            .await;

        assert!(result.is_err());
        assert_eq!(client.push_count(), 0);
    }
}
