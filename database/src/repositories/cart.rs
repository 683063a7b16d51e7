use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use ecom_models::cart::{Cart, CartItem};

use super::CartStore;

pub struct PgCartStore {
    pool: PgPool,
}

impl PgCartStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_cart(row: &PgRow) -> Result<Cart> {
        let items: Json<Vec<CartItem>> = row.try_get("items")?;
        Ok(Cart {
            id: row.try_get("id")?,
            items: items.0,
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
impl CartStore for PgCartStore {
    async fn insert_many(&self, carts: &[Cart]) -> Result<u64> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;
        for cart in carts {
            sqlx::query(
                r#"
                INSERT INTO carts (
                    id, items, added_by, updated_by, is_active, is_deleted,
                    created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(cart.id)
            .bind(Json(&cart.items))
            .bind(cart.added_by)
            .bind(cart.updated_by)
            .bind(cart.is_active)
            .bind(cart.is_deleted)
            .bind(cart.created_at)
            .bind(cart.updated_at)
            .execute(&mut *tx)
            .await
            .context("Failed to insert cart")?;
        }
        tx.commit().await.context("Failed to commit cart batch")?;

        Ok(carts.len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Cart>> {
        let row = sqlx::query(
            r#"
            SELECT id, items, added_by, updated_by, is_active, is_deleted,
                   created_at, updated_at
            FROM carts WHERE id = $1 AND is_deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch cart")?;

        row.as_ref().map(Self::row_to_cart).transpose()
    }
}
