use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use common::{ProductId, UserId};
use tokio::sync::RwLock;

use crate::store::{CartItemRow, CartStore, Result};

#[derive(Debug, Default)]
struct Inner {
    rows: Vec<CartItemRow>,
    next_id: i64,
}

/// In-memory cart store for testing.
///
/// Mirrors the PostgreSQL implementation's behavior, including the one
/// row per `(user, product)` invariant and newest-first ordering.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCartStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryCartStore {
    /// Creates a new empty in-memory cart store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of rows across all users.
    pub async fn row_count(&self) -> usize {
        self.inner.read().await.rows.len()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn add_item(&self, user_id: UserId, product_id: ProductId, quantity: i32) -> Result<()> {
        let mut inner = self.inner.write().await;
        let now = Utc::now();

        // Unique (user, product) simulation: accumulate instead of
        // inserting a second row.
        if let Some(row) = inner
            .rows
            .iter_mut()
            .find(|row| row.user_id == user_id && row.product_id == product_id)
        {
            row.quantity += quantity;
            row.updated_at = now;
            return Ok(());
        }

        inner.next_id += 1;
        let id = inner.next_id;
        inner.rows.push(CartItemRow {
            id,
            user_id,
            product_id,
            quantity,
            created_at: now,
            updated_at: now,
        });
        Ok(())
    }

    async fn set_quantity(&self, user_id: UserId, item_id: i64, quantity: i32) -> Result<()> {
        let mut inner = self.inner.write().await;
        if let Some(row) = inner
            .rows
            .iter_mut()
            .find(|row| row.user_id == user_id && row.id == item_id)
        {
            row.quantity = quantity;
            row.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn remove_item(&self, user_id: UserId, item_id: i64) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner
            .rows
            .retain(|row| !(row.user_id == user_id && row.id == item_id));
        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.rows.retain(|row| row.user_id != user_id);
        Ok(())
    }

    async fn items(&self, user_id: UserId) -> Result<Vec<CartItemRow>> {
        let inner = self.inner.read().await;
        let mut rows: Vec<CartItemRow> = inner
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(rows)
    }

    async fn item_quantity(&self, user_id: UserId) -> Result<i64> {
        let inner = self.inner.read().await;
        Ok(inner
            .rows
            .iter()
            .filter(|row| row.user_id == user_id)
            .map(|row| i64::from(row.quantity))
            .sum())
    }
}
