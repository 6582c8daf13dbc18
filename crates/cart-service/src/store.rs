//! Cart storage trait and implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{ProductId, UserId};
use thiserror::Error;

pub mod memory;
pub mod postgres;

pub use memory::InMemoryCartStore;
pub use postgres::PostgresCartStore;

/// Errors that can occur when touching the cart store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for cart store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// One stored cart row. Product data is resolved separately when a
/// snapshot is built.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemRow {
    pub id: i64,
    pub user_id: UserId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart persistence. Every operation is scoped to one user; a user can
/// never see or mutate another user's rows through this interface.
#[async_trait]
pub trait CartStore: Send + Sync {
    /// Adds quantity to the user's row for this product, creating the
    /// row if absent. One row per `(user, product)` pair is an
    /// invariant the store enforces.
    async fn add_item(&self, user_id: UserId, product_id: ProductId, quantity: i32) -> Result<()>;

    /// Sets the quantity of one row. Unknown row ids are a no-op.
    async fn set_quantity(&self, user_id: UserId, item_id: i64, quantity: i32) -> Result<()>;

    /// Removes one row. Unknown row ids are a no-op.
    async fn remove_item(&self, user_id: UserId, item_id: i64) -> Result<()>;

    /// Removes every row belonging to the user.
    async fn clear(&self, user_id: UserId) -> Result<()>;

    /// All rows for the user, newest first.
    async fn items(&self, user_id: UserId) -> Result<Vec<CartItemRow>>;

    /// Total quantity across the user's rows.
    async fn item_quantity(&self, user_id: UserId) -> Result<i64>;
}
