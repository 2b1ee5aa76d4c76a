use crate::core::errors::SendItError;
use crate::core::models::{order::Order, user::User};
use async_trait::async_trait;
use uuid::Uuid;

pub mod in_memory;
pub mod sql;

#[async_trait]
pub trait Storage: Send + Sync {
    /// Inserts a user; fails with `EmailAlreadyRegistered` when the email is taken.
    async fn create_user(&self, user: User) -> Result<User, SendItError>;
    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, SendItError>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SendItError>;
    async fn create_order(&self, order: Order) -> Result<Order, SendItError>;
    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, SendItError>;
    /// All orders, oldest first.
    async fn list_orders(&self) -> Result<Vec<Order>, SendItError>;
    /// Orders owned by `user_id`, oldest first.
    async fn list_orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, SendItError>;
    /// Overwrites every mutable column; `None` when the row no longer exists.
    async fn update_order(&self, order: Order) -> Result<Option<Order>, SendItError>;
    /// Returns whether a row was removed.
    async fn delete_order(&self, order_id: Uuid) -> Result<bool, SendItError>;
}
