use crate::core::errors::SendItError;
use crate::core::models::{order::Order, user::User};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    users_by_email: Arc<RwLock<HashMap<String, Uuid>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            users: Arc::new(RwLock::new(HashMap::new())),
            users_by_email: Arc::new(RwLock::new(HashMap::new())),
            orders: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn oldest_first(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    orders
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn create_user(&self, user: User) -> Result<User, SendItError> {
        let mut users_by_email = self.users_by_email.write().await;
        if users_by_email.contains_key(&user.email) {
            return Err(SendItError::EmailAlreadyRegistered(user.email));
        }
        users_by_email.insert(user.email.clone(), user.id);
        let mut users = self.users.write().await;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, SendItError> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SendItError> {
        let users_by_email = self.users_by_email.read().await;
        let users = self.users.read().await;
        Ok(users_by_email.get(email).and_then(|id| users.get(id).cloned()))
    }

    async fn create_order(&self, order: Order) -> Result<Order, SendItError> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, SendItError> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>, SendItError> {
        let orders = self.orders.read().await;
        Ok(oldest_first(orders.values().cloned().collect()))
    }

    async fn list_orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, SendItError> {
        let orders = self.orders.read().await;
        Ok(oldest_first(
            orders.values().filter(|o| o.user == user_id).cloned().collect(),
        ))
    }

    async fn update_order(&self, order: Order) -> Result<Option<Order>, SendItError> {
        let mut orders = self.orders.write().await;
        match orders.get_mut(&order.id) {
            Some(existing) => {
                *existing = order.clone();
                Ok(Some(order))
            }
            None => Ok(None),
        }
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<bool, SendItError> {
        let mut orders = self.orders.write().await;
        Ok(orders.remove(&order_id).is_some())
    }
}
