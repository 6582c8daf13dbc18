//! Payment storage trait and implementations.

use async_trait::async_trait;
use common::{OrderId, PaymentId, UserId};
use thiserror::Error;

use crate::model::{NewPayment, Payment};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPaymentStore;
pub use postgres::PostgresPaymentStore;

/// Errors that can occur when touching the payment store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A payment with this id already exists.
    #[error("Duplicate payment id: {0}")]
    DuplicatePayment(PaymentId),

    /// A stored status string did not parse.
    #[error(transparent)]
    InvalidStatus(#[from] common::ParseStatusError),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Result type for payment store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Payment persistence. Rows are insert-only; there is deliberately no
/// update operation on this interface.
#[async_trait]
pub trait PaymentStore: Send + Sync {
    /// Inserts one terminal payment row and returns it.
    async fn insert(&self, payment: NewPayment) -> Result<Payment>;

    /// Fetches one payment owned by `user_id`.
    async fn get(&self, user_id: UserId, payment_id: &PaymentId) -> Result<Option<Payment>>;

    /// The newest of the user's payments against one order. Retried
    /// charges pile up as separate rows, so an order can have several.
    async fn get_by_order(&self, user_id: UserId, order_id: &OrderId) -> Result<Option<Payment>>;

    /// All payments owned by `user_id`, newest first.
    async fn list(&self, user_id: UserId) -> Result<Vec<Payment>>;
}
