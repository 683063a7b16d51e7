use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use ecom_models::order::{Order, OrderItem};

use super::OrderStore;

pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_order(row: &PgRow) -> Result<Order> {
        let items: Json<Vec<OrderItem>> = row.try_get("items")?;
        Ok(Order {
            id: row.try_get("id")?,
            order_id: row.try_get("order_id")?,
            items: items.0,
            status: row.try_get("status")?,
            total: row.try_get("total")?,
            added_by: row.try_get("added_by")?,
            updated_by: row.try_get("updated_by")?,
            is_active: row.try_get("is_active")?,
            is_deleted: row.try_get("is_deleted")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn insert_many(&self, orders: &[Order]) -> Result<u64> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;
        for order in orders {
            sqlx::query(
                r#"
                INSERT INTO orders (
                    id, order_id, items, status, total, added_by, updated_by,
                    is_active, is_deleted, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
                "#,
            )
            .bind(order.id)
            .bind(order.order_id.as_ref())
            .bind(Json(&order.items))
            .bind(order.status.as_ref())
            .bind(order.total)
            .bind(order.added_by)
            .bind(order.updated_by)
            .bind(order.is_active)
            .bind(order.is_deleted)
            .bind(order.created_at)
            .bind(order.updated_at)
            .execute(&mut *tx)
            .await
            .context("Failed to insert order")?;
        }
        tx.commit().await.context("Failed to commit order batch")?;

        Ok(orders.len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        let row = sqlx::query(
            r#"
            SELECT id, order_id, items, status, total, added_by, updated_by,
                   is_active, is_deleted, created_at, updated_at
            FROM orders WHERE id = $1 AND is_deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch order")?;

        row.as_ref().map(Self::row_to_order).transpose()
    }
}
