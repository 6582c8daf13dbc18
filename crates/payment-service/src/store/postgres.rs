use async_trait::async_trait;
use common::{OrderId, PaymentId, TransactionId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::model::{NewPayment, Payment};
use crate::store::{PaymentStore, Result, StoreError};

/// PostgreSQL-backed payment store.
#[derive(Clone)]
pub struct PostgresPaymentStore {
    pool: PgPool,
}

impl PostgresPaymentStore {
    /// Creates a new PostgreSQL payment store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    pub async fn run_migrations(&self) -> std::result::Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }

    fn row_to_payment(row: PgRow) -> Result<Payment> {
        let status: String = row.try_get("status")?;

        Ok(Payment {
            id: row.try_get("id")?,
            payment_id: PaymentId::from(row.try_get::<String, _>("payment_id")?),
            order_id: OrderId::from(row.try_get::<String, _>("order_id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            amount: row.try_get("amount")?,
            payment_method: row.try_get("payment_method")?,
            card_last_four: row.try_get("card_last_four")?,
            card_holder_name: row.try_get("card_holder_name")?,
            status: status.parse()?,
            transaction_id: row
                .try_get::<Option<String>, _>("transaction_id")?
                .map(TransactionId::from),
            created_at: row.try_get("created_at")?,
        })
    }
}

#[async_trait]
impl PaymentStore for PostgresPaymentStore {
    async fn insert(&self, payment: NewPayment) -> Result<Payment> {
        let row = sqlx::query(
            r#"
            INSERT INTO payments (payment_id, order_id, user_id, amount, payment_method,
                                  card_last_four, card_holder_name, status, transaction_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id, payment_id, order_id, user_id, amount, payment_method,
                      card_last_four, card_holder_name, status, transaction_id, created_at
            "#,
        )
        .bind(payment.payment_id.as_str())
        .bind(payment.order_id.as_str())
        .bind(payment.user_id.as_i64())
        .bind(payment.amount)
        .bind(&payment.payment_method)
        .bind(&payment.card_last_four)
        .bind(&payment.card_holder_name)
        .bind(payment.status.as_str())
        .bind(payment.transaction_id.as_ref().map(TransactionId::as_str))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("payments_payment_id_key") {
                    return StoreError::DuplicatePayment(payment.payment_id.clone());
                }
            }
            StoreError::Database(e)
        })?;

        Self::row_to_payment(row)
    }

    async fn get(&self, user_id: UserId, payment_id: &PaymentId) -> Result<Option<Payment>> {
        let row = sqlx::query(
            r#"
            SELECT id, payment_id, order_id, user_id, amount, payment_method,
                   card_last_four, card_holder_name, status, transaction_id, created_at
            FROM payments
            WHERE user_id = $1 AND payment_id = $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(payment_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn get_by_order(&self, user_id: UserId, order_id: &OrderId) -> Result<Option<Payment>> {
        let row = sqlx::query(
            r#"
            SELECT id, payment_id, order_id, user_id, amount, payment_method,
                   card_last_four, card_holder_name, status, transaction_id, created_at
            FROM payments
            WHERE user_id = $1 AND order_id = $2
            ORDER BY created_at DESC, id DESC
            LIMIT 1
            "#,
        )
        .bind(user_id.as_i64())
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_payment).transpose()
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<Payment>> {
        let rows = sqlx::query(
            r#"
            SELECT id, payment_id, order_id, user_id, amount, payment_method,
                   card_last_four, card_holder_name, status, transaction_id, created_at
            FROM payments
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_payment).collect()
    }
}
