//! Order storage trait and implementations.

use async_trait::async_trait;
use common::{OrderId, OrderStatus, PaymentId, PaymentStatus, UserId};
use thiserror::Error;

use crate::model::{NewOrder, Order};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;

/// Errors that can occur when touching the order store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// An order with this id already exists.
    #[error("Duplicate order id: {0}")]
    DuplicateOrder(OrderId),

    /// A stored status string did not parse.
    #[error(transparent)]
    InvalidStatus(#[from] common::ParseStatusError),

    /// Frozen items or address failed to (de)serialize.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Order persistence. Reads are scoped to the owning user; the status
/// writers are keyed by order id alone because the payment service has
/// no user context when it pushes a settlement outcome.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Inserts a fresh order with both statuses `pending` and returns
    /// the stored row.
    async fn insert(&self, order: NewOrder) -> Result<Order>;

    /// Fetches one order owned by `user_id`.
    async fn get(&self, user_id: UserId, order_id: &OrderId) -> Result<Option<Order>>;

    /// All orders owned by `user_id`, newest first.
    async fn list(&self, user_id: UserId) -> Result<Vec<Order>>;

    /// Records a settlement outcome. Sets `payment_status` and
    /// `payment_id`; in the same write the order is confirmed if and
    /// only if the incoming status is `completed`, otherwise
    /// `order_status` is untouched. Returns false when no order has
    /// this id.
    async fn set_payment_status(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
        status: PaymentStatus,
    ) -> Result<bool>;

    /// Overwrites the fulfilment status of an order owned by `user_id`.
    /// Any status in the enumeration is accepted regardless of the
    /// current one. Returns false when the user owns no such order.
    async fn set_order_status(
        &self,
        user_id: UserId,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<bool>;
}
