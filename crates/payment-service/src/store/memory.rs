use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{OrderId, PaymentId, UserId};
use tokio::sync::RwLock;

use crate::model::{NewPayment, Payment};
use crate::store::{PaymentStore, Result, StoreError};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<Payment>,
    next_id: i64,
}

/// In-memory payment store for testing.
///
/// Mirrors the PostgreSQL implementation's behavior, including the
/// unique payment id constraint and newest-first reads.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPaymentStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryPaymentStore {
    /// Creates a new empty in-memory payment store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of payments across all users.
    pub async fn row_count(&self) -> usize {
        self.inner.read().await.rows.len()
    }

    /// All rows as stored, oldest first. Test hook for asserting what
    /// actually got persisted.
    pub async fn rows(&self) -> Vec<Payment> {
        self.inner.read().await.rows.clone()
    }
}

#[async_trait]
impl PaymentStore for InMemoryPaymentStore {
    async fn insert(&self, payment: NewPayment) -> Result<Payment> {
        let mut inner = self.inner.write().await;

        if inner
            .rows
            .iter()
            .any(|row| row.payment_id == payment.payment_id)
        {
            return Err(StoreError::DuplicatePayment(payment.payment_id));
        }

        inner.next_id += 1;
        let row = Payment {
            id: inner.next_id,
            payment_id: payment.payment_id,
            order_id: payment.order_id,
            user_id: payment.user_id,
            amount: payment.amount,
            payment_method: payment.payment_method,
            card_last_four: payment.card_last_four,
            card_holder_name: payment.card_holder_name,
            status: payment.status,
            transaction_id: payment.transaction_id,
            created_at: Utc::now(),
        };
        inner.rows.push(row.clone());
        Ok(row)
    }

    async fn get(&self, user_id: UserId, payment_id: &PaymentId) -> Result<Option<Payment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .find(|row| row.user_id == user_id && &row.payment_id == payment_id)
            .cloned())
    }

    async fn get_by_order(&self, user_id: UserId, order_id: &OrderId) -> Result<Option<Payment>> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.user_id == user_id && &row.order_id == order_id)
            .max_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)))
            .cloned())
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<Payment>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<Payment> = inner
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }
}
