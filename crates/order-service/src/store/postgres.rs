use async_trait::async_trait;
use common::{OrderId, OrderStatus, PaymentId, PaymentStatus, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::model::{NewOrder, Order};
use crate::store::{OrderStore, Result, StoreError};

/// PostgreSQL-backed order store.
#[derive(Clone)]
pub struct PostgresOrderStore {
    pool: PgPool,
}

impl PostgresOrderStore {
    /// Creates a new PostgreSQL order store.
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

    fn row_to_order(row: PgRow) -> Result<Order> {
        let items: serde_json::Value = row.try_get("items")?;
        let address: serde_json::Value = row.try_get("shipping_address")?;
        let payment_status: String = row.try_get("payment_status")?;
        let order_status: String = row.try_get("order_status")?;

        Ok(Order {
            id: row.try_get("id")?,
            order_id: OrderId::from(row.try_get::<String, _>("order_id")?),
            user_id: UserId::new(row.try_get("user_id")?),
            items: serde_json::from_value(items)?,
            subtotal: row.try_get("subtotal")?,
            shipping_cost: row.try_get("shipping_cost")?,
            tax: row.try_get("tax")?,
            total: row.try_get("total")?,
            shipping_address: serde_json::from_value(address)?,
            payment_id: row
                .try_get::<Option<String>, _>("payment_id")?
                .map(PaymentId::from),
            payment_status: payment_status.parse()?,
            order_status: order_status.parse()?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PostgresOrderStore {
    async fn insert(&self, order: NewOrder) -> Result<Order> {
        let items = serde_json::to_value(&order.items)?;
        let address = serde_json::to_value(&order.shipping_address)?;

        let row = sqlx::query(
            r#"
            INSERT INTO orders (order_id, user_id, items, subtotal, shipping_cost, tax, total, shipping_address)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id, order_id, user_id, items, subtotal, shipping_cost, tax, total,
                      shipping_address, payment_id, payment_status, order_status, created_at, updated_at
            "#,
        )
        .bind(order.order_id.as_str())
        .bind(order.user_id.as_i64())
        .bind(&items)
        .bind(order.subtotal)
        .bind(order.shipping_cost)
        .bind(order.tax)
        .bind(order.total)
        .bind(&address)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("orders_order_id_key") {
                    return StoreError::DuplicateOrder(order.order_id.clone());
                }
            }
            StoreError::Database(e)
        })?;

        Self::row_to_order(row)
    }

    async fn get(&self, user_id: UserId, order_id: &OrderId) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, order_id, user_id, items, subtotal, shipping_cost, tax, total,
                   shipping_address, payment_id, payment_status, order_status, created_at, updated_at
            FROM orders
            WHERE user_id = $1 AND order_id = $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(order_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Self::row_to_order).transpose()
    }

    async fn list(&self, user_id: UserId) -> Result<Vec<Order>> {
        let rows = sqlx::query(
            r#"
            SELECT id, order_id, user_id, items, subtotal, shipping_cost, tax, total,
                   shipping_address, payment_id, payment_status, order_status, created_at, updated_at
            FROM orders
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_order).collect()
    }

    async fn set_payment_status(
        &self,
        order_id: &OrderId,
        payment_id: &PaymentId,
        status: PaymentStatus,
    ) -> Result<bool> {
        // The confirmation ride-along stays inside the same UPDATE so a
        // completed payment can never land without its confirmation.
        let result = sqlx::query(
            r#"
            UPDATE orders SET
                payment_status = $1,
                payment_id = $2,
                order_status = CASE WHEN $1 = 'completed' THEN 'confirmed' ELSE order_status END,
                updated_at = now()
            WHERE order_id = $3
            "#,
        )
        .bind(status.as_str())
        .bind(payment_id.as_str())
        .bind(order_id.as_str())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn set_order_status(
        &self,
        user_id: UserId,
        order_id: &OrderId,
        status: OrderStatus,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE orders SET order_status = $1, updated_at = now()
            WHERE order_id = $2 AND user_id = $3
            "#,
        )
        .bind(status.as_str())
        .bind(order_id.as_str())
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
