use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, OrderStatus, PaymentId, PaymentStatus, UserId};
use tokio::sync::RwLock;

use crate::model::{NewOrder, Order};
use crate::store::{OrderStore, Result, StoreError};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Order>,
    next_id: i64,
}

/// In-memory order store for testing.
///
/// Mirrors the PostgreSQL implementation's behavior, including the
/// unique order id constraint, newest-first listing, and the
/// confirmed-iff-completed promotion inside the payment write.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders across all users.
    pub async fn row_count(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let mut inner = self.inner.write().await;

        if inner.rows.iter().any(|row| row.order_id == order.order_id) {
            return Err(StoreError::DuplicateOrder(order.order_id));
        }

        inner.next_id += 1;
        let now = Utc::now();
        let row = Order {
            id: inner.next_id,
            order_id: order.order_id,
            user_id: order.user_id,
            items: order.items,
            subtotal: order.subtotal,
            shipping_cost: order.shipping_cost,
            tax: order.tax,
            total: order.total,
            shipping_address: order.shipping_address,
            payment_id: None,
            payment_status: PaymentStatus::Pending,
            order_status: OrderStatus::Pending,
            created_at: now,
            updated_at: now,
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, user_id: UserId, order_id: &OrderId) -> Result<Option<Order>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .find(|row| row.user_id == user_id && &row.order_id == order_id)
            .cloned())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<Order>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Order> = inner
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn set_payment_status(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
        status: PaymentStatus,
    ) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner.rows.iter_mut().find(|row| &row.order_id == order_id) else {
            return Ok(false);
        };

        row.payment_status = status;
        row.payment_id = Some(payment_id.clone());
        if status == PaymentStatus::Completed {
            row.order_status = OrderStatus::Confirmed;
        }
        row.updated_at = Utc::now();
        Ok(true)
    }

    async fn set_order_status(
        &self,
        user_id: UserId,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<bool> {
        let mut inner = self.inner.write().await;
        let Some(row) = inner
            .rows
            .iter_mut()
            .find(|row| row.user_id == user_id && &row.order_id == order_id)
        else {
            return Ok(false);
        };

        row.order_status = status;
        row.updated_at = Utc::now();
        Ok(true)
    }
}
