use anyhow::{Context, Result};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use ecom_models::route_role::RouteRole;

use super::RouteRoleStore;

pub struct PgRouteRoleStore {
    pool: PgPool,
}

impl PgRouteRoleStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn row_to_route_role(row: &PgRow) -> Result<RouteRole> {
        Ok(RouteRole {
            id: row.try_get("id")?,
            route_id: row.try_get("route_id")?,
            role_id: row.try_get("role_id")?,
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
impl RouteRoleStore for PgRouteRoleStore {
    async fn insert_many(&self, route_roles: &[RouteRole]) -> Result<u64> {
        let mut tx = self.pool.begin().await.context("Failed to open transaction")?;
        for route_role in route_roles {
            sqlx::query(
                r#"
                INSERT INTO route_roles (
                    id, route_id, role_id, added_by, updated_by, is_active,
                    is_deleted, created_at, updated_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(route_role.id)
            .bind(route_role.route_id)
            .bind(route_role.role_id)
            .bind(route_role.added_by)
            .bind(route_role.updated_by)
            .bind(route_role.is_active)
            .bind(route_role.is_deleted)
            .bind(route_role.created_at)
            .bind(route_role.updated_at)
            .execute(&mut *tx)
            .await
            .context("Failed to insert route role")?;
        }
        tx.commit().await.context("Failed to commit route-role batch")?;

        Ok(route_roles.len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RouteRole>> {
        let row = sqlx::query(
            r#"
            SELECT id, route_id, role_id, added_by, updated_by, is_active,
                   is_deleted, created_at, updated_at
            FROM route_roles WHERE id = $1 AND is_deleted = false
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to fetch route role")?;

        row.as_ref().map(Self::row_to_route_role).transpose()
    }
}
