use async_trait::async_trait;
use common::{ProductId, UserId};
use sqlx::{PgPool, Row, postgres::PgRow};

use crate::store::{CartItemRow, CartStore, Result};

/// PostgreSQL-backed cart store.
#[derive(Clone)]
pub struct PostgresCartStore {
    pool: PgPool,
}

impl PostgresCartStore {
    /// Creates a new PostgreSQL cart store.
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

    fn row_to_item(row: PgRow) -> Result<CartItemRow> {
        Ok(CartItemRow {
            id: row.try_get("id")?,
            user_id: UserId::new(row.try_get("user_id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            quantity: row.try_get("quantity")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl CartStore for PostgresCartStore {
    async fn add_item(&self, user_id: UserId, product_id: ProductId, quantity: i32) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO cart_items (user_id, product_id, quantity)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, product_id) DO UPDATE SET
                quantity = cart_items.quantity + EXCLUDED.quantity,
                updated_at = now()
            "#,
        )
        .bind(user_id.as_i64())
        .bind(product_id.as_i64())
        .bind(quantity)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn set_quantity(&self, user_id: UserId, item_id: i64, quantity: i32) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE cart_items
            SET quantity = $1, updated_at = now()
            WHERE id = $2 AND user_id = $3
            "#,
        )
        .bind(quantity)
        .bind(item_id)
        .bind(user_id.as_i64())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_item(&self, user_id: UserId, item_id: i64) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn clear(&self, user_id: UserId) -> Result<()> {
        sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id.as_i64())
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn items(&self, user_id: UserId) -> Result<Vec<CartItemRow>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, product_id, quantity, created_at, updated_at
            FROM cart_items
            WHERE user_id = $1
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(user_id.as_i64())
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_item).collect()
    }

    async fn item_quantity(&self, user_id: UserId) -> Result<i64> {
        let total: i64 =
            sqlx::query_scalar("SELECT COALESCE(SUM(quantity), 0) FROM cart_items WHERE user_id = $1")
                .bind(user_id.as_i64())
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }
}
