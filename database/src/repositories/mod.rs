// Store traits at the collaborator boundary. Every mutation is a single
// atomic per-record operation so concurrent logins or registrations never
// lose updates (uniqueness is additionally enforced by the backing store).

pub mod cart;
pub mod memory;
pub mod order;
pub mod route_role;
pub mod user;

pub use cart::PgCartStore;
pub use order::PgOrderStore;
pub use route_role::PgRouteRoleStore;
pub use user::PgUserStore;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use ecom_models::auth::{ResetPasswordLink, User};
use ecom_models::cart::Cart;
use ecom_models::order::Order;
use ecom_models::route_role::RouteRole;

/// Credential store. Lookups exclude soft-deleted users.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user. Fails if the username or email is already taken by
    /// a non-deleted user.
    async fn insert(&self, user: &User) -> Result<()>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Find the user whose active reset-password state carries this code.
    /// Expiry is not checked here; the caller compares against the clock.
    async fn find_by_reset_code(&self, code: &str) -> Result<Option<User>>;

    /// Atomically bump the failed-login counter, returning the new value.
    async fn increment_login_retry(&self, id: Uuid) -> Result<i32>;

    async fn set_login_lockout(&self, id: Uuid, until: DateTime<Utc>) -> Result<()>;

    /// Zero the failed-login counter and clear any lockout.
    async fn reset_login_retry(&self, id: Uuid) -> Result<()>;

    /// Replace the reset-password state; `None` clears it. Issuing a new
    /// code through this call overwrites any prior one.
    async fn set_reset_password_link(&self, id: Uuid, link: Option<ResetPasswordLink>) -> Result<()>;

    /// Swap in a new password hash, clearing the reset state and any
    /// login-retry bookkeeping in the same update.
    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn insert_many(&self, carts: &[Cart]) -> Result<u64>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Cart>>;
}

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn insert_many(&self, orders: &[Order]) -> Result<u64>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>>;
}

#[async_trait]
pub trait RouteRoleStore: Send + Sync {
    async fn insert_many(&self, route_roles: &[RouteRole]) -> Result<u64>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RouteRole>>;
}
