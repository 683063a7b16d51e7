// In-memory stores used by the test suites and by storeless development
// runs. Mutations go through dashmap per-key entry locks, which gives the
// same atomic single-record semantics the Postgres stores provide; inserts
// additionally serialize on a guard so the uniqueness scan and the write
// happen as one step.

use std::sync::Mutex;

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use ecom_models::auth::{ResetPasswordLink, User};
use ecom_models::cart::Cart;
use ecom_models::order::Order;
use ecom_models::route_role::RouteRole;

use super::{CartStore, OrderStore, RouteRoleStore, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: DashMap<Uuid, User>,
    insert_guard: Mutex<()>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn find_where<F: Fn(&User) -> bool>(&self, predicate: F) -> Option<User> {
        self.users
            .iter()
            .find(|entry| !entry.is_deleted && predicate(entry.value()))
            .map(|entry| entry.value().clone())
    }

    fn mutate<F: FnOnce(&mut User)>(&self, id: Uuid, apply: F) -> Result<()> {
        let mut entry = self
            .users
            .get_mut(&id)
            .ok_or_else(|| anyhow!("user {id} not found"))?;
        apply(entry.value_mut());
        entry.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: &User) -> Result<()> {
        let _guard = self
            .insert_guard
            .lock()
            .map_err(|_| anyhow!("insert guard poisoned"))?;
        let taken = self.find_where(|existing| {
            existing.username == user.username || existing.email == user.email
        });
        if taken.is_some() {
            bail!("username or email already exists");
        }
        self.users.insert(user.id, user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.find_where(|user| user.id == id))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.find_where(|user| user.username == username))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.find_where(|user| user.email == email))
    }

    async fn find_by_reset_code(&self, code: &str) -> Result<Option<User>> {
        Ok(self.find_where(|user| {
            user.reset_password_link
                .as_ref()
                .is_some_and(|link| link.code == code)
        }))
    }

    async fn increment_login_retry(&self, id: Uuid) -> Result<i32> {
        let mut count = 0;
        self.mutate(id, |user| {
            user.login_retry_limit += 1;
            count = user.login_retry_limit;
        })?;
        Ok(count)
    }

    async fn set_login_lockout(&self, id: Uuid, until: DateTime<Utc>) -> Result<()> {
        self.mutate(id, |user| user.login_reactive_time = Some(until))
    }

    async fn reset_login_retry(&self, id: Uuid) -> Result<()> {
        self.mutate(id, |user| {
            user.login_retry_limit = 0;
            user.login_reactive_time = None;
        })
    }

    async fn set_reset_password_link(
        &self,
        id: Uuid,
        link: Option<ResetPasswordLink>,
    ) -> Result<()> {
        self.mutate(id, |user| user.reset_password_link = link)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        self.mutate(id, |user| {
            user.password = password_hash.to_string();
            user.reset_password_link = None;
            user.login_retry_limit = 0;
            user.login_reactive_time = None;
        })
    }
}

#[derive(Default)]
pub struct MemoryCartStore {
    carts: DashMap<Uuid, Cart>,
}

impl MemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all live carts, oldest first.
    pub fn all(&self) -> Vec<Cart> {
        let mut carts: Vec<Cart> = self
            .carts
            .iter()
            .filter(|entry| !entry.is_deleted)
            .map(|entry| entry.value().clone())
            .collect();
        carts.sort_by_key(|cart| cart.created_at);
        carts
    }
}

#[async_trait]
impl CartStore for MemoryCartStore {
    async fn insert_many(&self, carts: &[Cart]) -> Result<u64> {
        for cart in carts {
            self.carts.insert(cart.id, cart.clone());
        }
        Ok(carts.len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Cart>> {
        Ok(self
            .carts
            .get(&id)
            .filter(|cart| !cart.is_deleted)
            .map(|cart| cart.value().clone()))
    }
}

#[derive(Default)]
pub struct MemoryOrderStore {
    orders: DashMap<Uuid, Order>,
}

impl MemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all live orders, oldest first.
    pub fn all(&self) -> Vec<Order> {
        let mut orders: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| !entry.is_deleted)
            .map(|entry| entry.value().clone())
            .collect();
        orders.sort_by_key(|order| order.created_at);
        orders
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn insert_many(&self, orders: &[Order]) -> Result<u64> {
        for order in orders {
            self.orders.insert(order.id, order.clone());
        }
        Ok(orders.len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Order>> {
        Ok(self
            .orders
            .get(&id)
            .filter(|order| !order.is_deleted)
            .map(|order| order.value().clone()))
    }
}

#[derive(Default)]
pub struct MemoryRouteRoleStore {
    route_roles: DashMap<Uuid, RouteRole>,
}

impl MemoryRouteRoleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RouteRoleStore for MemoryRouteRoleStore {
    async fn insert_many(&self, route_roles: &[RouteRole]) -> Result<u64> {
        for route_role in route_roles {
            self.route_roles.insert(route_role.id, route_role.clone());
        }
        Ok(route_roles.len() as u64)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RouteRole>> {
        Ok(self
            .route_roles
            .get(&id)
            .filter(|route_role| !route_role.is_deleted)
            .map(|route_role| route_role.value().clone()))
    }
}
