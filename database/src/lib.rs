// Storage layer for the admin API: store traits plus the Postgres and
// in-memory implementations behind them.

pub mod repositories;

pub use repositories::{
    memory::{MemoryCartStore, MemoryOrderStore, MemoryRouteRoleStore, MemoryUserStore},
    CartStore, OrderStore, PgCartStore, PgOrderStore, PgRouteRoleStore, PgUserStore,
    RouteRoleStore, UserStore,
};

use anyhow::{Context, Result};
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Database connection manager.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .context("Failed to connect to database")?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run migrations")?;
        Ok(())
    }
}
