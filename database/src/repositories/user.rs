use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use ecom_models::auth::{Address, ResetPasswordLink, User, WishlistItem};

use super::UserStore;

const USER_COLUMNS: &str = "id, username, password, email, name, user_type, mobile_no, \
     shipping_address, wishlist, login_retry_limit, login_reactive_time, \
     reset_password_link, added_by, updated_by, is_active, is_deleted, \
     created_at, updated_at";

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_user(row: &PgRow) -> Result<User> {
        let shipping_address: Json<Vec<Address>> = row.try_get("shipping_address")?;
        let wishlist: Json<Vec<WishlistItem>> = row.try_get("wishlist")?;
        let reset_password_link: Option<Json<ResetPasswordLink>> =
            row.try_get("reset_password_link")?;

        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password: row.try_get("password")?,
            email: row.try_get("email")?,
            name: row.try_get("name")?,
            user_type: row.try_get("user_type")?,
            mobile_no: row.try_get("mobile_no")?,
            shipping_address: shipping_address.0,
            wishlist: wishlist.0,
            login_retry_limit: row.try_get("login_retry_limit")?,
            login_reactive_time: row.try_get("login_reactive_time")?,
            reset_password_link: reset_password_link.map(|link| link.0),
            added_by: row.try_get("added_by")?,
            updated_by: row.try_get("updated_by")?,
            is_active: row.try_get("is_active")?,
            is_deleted: row.try_get("is_deleted")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    async fn fetch_one_where(&self, clause: &str, value: &str) -> Result<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE {clause} AND is_deleted = false"
        );
        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user")?;

        row.as_ref().map(Self::row_to_user).transpose()
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn insert(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id, username, password, email, name, user_type, mobile_no,
                shipping_address, wishlist, login_retry_limit, login_reactive_time,
                reset_password_link, added_by, updated_by, is_active, is_deleted,
                created_at, updated_at
            ) VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18
            )
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.password)
        .bind(&user.email)
        .bind(user.name.as_ref())
        .bind(user.user_type)
        .bind(user.mobile_no.as_ref())
        .bind(Json(&user.shipping_address))
        .bind(Json(&user.wishlist))
        .bind(user.login_retry_limit)
        .bind(user.login_reactive_time)
        .bind(user.reset_password_link.as_ref().map(Json))
        .bind(user.added_by)
        .bind(user.updated_by)
        .bind(user.is_active)
        .bind(user.is_deleted)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .context("Failed to insert user")?;

        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let query = format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND is_deleted = false"
        );
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by id")?;

        row.as_ref().map(Self::row_to_user).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        self.fetch_one_where("username = $1", username).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        self.fetch_one_where("email = $1", email).await
    }

    async fn find_by_reset_code(&self, code: &str) -> Result<Option<User>> {
        self.fetch_one_where("reset_password_link->>'code' = $1", code)
            .await
    }

    async fn increment_login_retry(&self, id: Uuid) -> Result<i32> {
        let row = sqlx::query(
            r#"
            UPDATE users
            SET login_retry_limit = login_retry_limit + 1, updated_at = NOW()
            WHERE id = $1
            RETURNING login_retry_limit
            "#,
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to increment login retry counter")?;

        Ok(row.try_get("login_retry_limit")?)
    }

    async fn set_login_lockout(&self, id: Uuid, until: DateTime<Utc>) -> Result<()> {
        sqlx::query("UPDATE users SET login_reactive_time = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(until)
            .execute(&self.pool)
            .await
            .context("Failed to set login lockout")?;

        Ok(())
    }

    async fn reset_login_retry(&self, id: Uuid) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET login_retry_limit = 0, login_reactive_time = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .context("Failed to reset login retry counter")?;

        Ok(())
    }

    async fn set_reset_password_link(
        &self,
        id: Uuid,
        link: Option<ResetPasswordLink>,
    ) -> Result<()> {
        sqlx::query(
            "UPDATE users SET reset_password_link = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(link.as_ref().map(Json))
        .execute(&self.pool)
        .await
        .context("Failed to update reset-password state")?;

        Ok(())
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE users
            SET password = $2, reset_password_link = NULL,
                login_retry_limit = 0, login_reactive_time = NULL, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(password_hash)
        .execute(&self.pool)
        .await
        .context("Failed to update password")?;

        Ok(())
    }
}
