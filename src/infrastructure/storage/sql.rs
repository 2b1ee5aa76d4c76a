use crate::core::errors::SendItError;
use crate::core::models::{
    order::{Order, OrderStatus},
    user::{Role, User},
};
use crate::infrastructure::storage::Storage;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;
use uuid::Uuid;

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          TEXT PRIMARY KEY NOT NULL,
    first_name  TEXT NOT NULL,
    last_name   TEXT NOT NULL,
    email       TEXT NOT NULL UNIQUE,
    role        TEXT NOT NULL DEFAULT 'user',
    password    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
)"#;

const CREATE_ORDERS: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id                TEXT PRIMARY KEY NOT NULL,
    description       TEXT NOT NULL,
    pickup_location   TEXT NOT NULL,
    destination       TEXT NOT NULL,
    recipient_name    TEXT NOT NULL,
    phone             TEXT NOT NULL,
    user_id           TEXT NOT NULL REFERENCES users(id),
    status            TEXT NOT NULL DEFAULT 'In-Transit',
    present_location  TEXT,
    created_at        TEXT NOT NULL,
    updated_at        TEXT NOT NULL
)"#;

const CREATE_ORDERS_USER_INDEX: &str = "CREATE INDEX IF NOT EXISTS idx_orders_user_id ON orders (user_id)";

const ORDER_COLUMNS: &str = "id, description, pickup_location, destination, recipient_name, phone, user_id, \
                             status, present_location, created_at, updated_at";

const USER_COLUMNS: &str = "id, first_name, last_name, email, role, password, created_at, updated_at";

/// Relational store backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqlStorage {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct UserRow {
    id: String,
    first_name: String,
    last_name: String,
    email: String,
    role: String,
    password: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct OrderRow {
    id: String,
    description: String,
    pickup_location: String,
    destination: String,
    recipient_name: String,
    phone: String,
    user_id: String,
    status: String,
    present_location: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_uuid(column: &str, value: &str) -> Result<Uuid, SendItError> {
    Uuid::parse_str(value).map_err(|e| SendItError::DatabaseError(format!("Corrupt {} '{}': {}", column, value, e)))
}

impl TryFrom<UserRow> for User {
    type Error = SendItError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = Role::parse(&row.role)
            .ok_or_else(|| SendItError::DatabaseError(format!("Unknown role '{}'", row.role)))?;
        Ok(User {
            id: parse_uuid("users.id", &row.id)?,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            role,
            password: row.password,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl TryFrom<OrderRow> for Order {
    type Error = SendItError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status = OrderStatus::parse(&row.status)
            .ok_or_else(|| SendItError::DatabaseError(format!("Unknown order status '{}'", row.status)))?;
        Ok(Order {
            id: parse_uuid("orders.id", &row.id)?,
            description: row.description,
            pickup_location: row.pickup_location,
            destination: row.destination,
            recipient_name: row.recipient_name,
            phone: row.phone,
            user: parse_uuid("orders.user_id", &row.user_id)?,
            status,
            present_location: row.present_location,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl SqlStorage {
    /// Opens a pool against `database_url` and creates the schema if missing.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, SendItError> {
        // Each connection to an in-memory database is a separate database.
        let options = if database_url.contains(":memory:") {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };
        let pool = options.connect(database_url).await?;
        let storage = SqlStorage { pool };
        storage.migrate().await?;
        Ok(storage)
    }

    pub async fn migrate(&self) -> Result<(), SendItError> {
        for statement in [CREATE_USERS, CREATE_ORDERS, CREATE_ORDERS_USER_INDEX] {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        info!("Database schema ready");
        Ok(())
    }
}

#[async_trait]
impl Storage for SqlStorage {
    async fn create_user(&self, user: User) -> Result<User, SendItError> {
        let sql = format!("INSERT INTO users ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)", USER_COLUMNS);
        sqlx::query(&sql)
            .bind(user.id.to_string())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.email)
            .bind(user.role.as_str())
            .bind(&user.password)
            .bind(user.created_at)
            .bind(user.updated_at)
            .execute(&self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                    SendItError::EmailAlreadyRegistered(user.email.clone())
                }
                other => other.into(),
            })?;
        Ok(user)
    }

    async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, SendItError> {
        let sql = format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, SendItError> {
        let sql = format!("SELECT {} FROM users WHERE email = ?", USER_COLUMNS);
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn create_order(&self, order: Order) -> Result<Order, SendItError> {
        let sql = format!(
            "INSERT INTO orders ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            ORDER_COLUMNS
        );
        sqlx::query(&sql)
            .bind(order.id.to_string())
            .bind(&order.description)
            .bind(&order.pickup_location)
            .bind(&order.destination)
            .bind(&order.recipient_name)
            .bind(&order.phone)
            .bind(order.user.to_string())
            .bind(order.status.as_str())
            .bind(&order.present_location)
            .bind(order.created_at)
            .bind(order.updated_at)
            .execute(&self.pool)
            .await?;
        Ok(order)
    }

    async fn get_order(&self, order_id: Uuid) -> Result<Option<Order>, SendItError> {
        let sql = format!("SELECT {} FROM orders WHERE id = ?", ORDER_COLUMNS);
        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(order_id.to_string())
            .fetch_optional(&self.pool)
            .await?
            .map(Order::try_from)
            .transpose()
    }

    async fn list_orders(&self) -> Result<Vec<Order>, SendItError> {
        let sql = format!("SELECT {} FROM orders ORDER BY created_at, id", ORDER_COLUMNS);
        sqlx::query_as::<_, OrderRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    async fn list_orders_by_user(&self, user_id: Uuid) -> Result<Vec<Order>, SendItError> {
        let sql = format!(
            "SELECT {} FROM orders WHERE user_id = ? ORDER BY created_at, id",
            ORDER_COLUMNS
        );
        sqlx::query_as::<_, OrderRow>(&sql)
            .bind(user_id.to_string())
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }

    async fn update_order(&self, order: Order) -> Result<Option<Order>, SendItError> {
        let result = sqlx::query(
            "UPDATE orders SET description = ?, pickup_location = ?, destination = ?, recipient_name = ?, \
             phone = ?, status = ?, present_location = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&order.description)
        .bind(&order.pickup_location)
        .bind(&order.destination)
        .bind(&order.recipient_name)
        .bind(&order.phone)
        .bind(order.status.as_str())
        .bind(&order.present_location)
        .bind(order.updated_at)
        .bind(order.id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        Ok(Some(order))
    }

    async fn delete_order(&self, order_id: Uuid) -> Result<bool, SendItError> {
        let result = sqlx::query("DELETE FROM orders WHERE id = ?")
            .bind(order_id.to_string())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
