use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub enum OrderStatus {
    #[default]
    #[serde(rename = "In-Transit")]
    InTransit,
    #[serde(rename = "Delivered")]
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::InTransit => "In-Transit",
            OrderStatus::Delivered => "Delivered",
        }
    }

    pub fn parse(value: &str) -> Option<OrderStatus> {
        match value {
            "In-Transit" => Some(OrderStatus::InTransit),
            "Delivered" => Some(OrderStatus::Delivered),
            _ => None,
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub description: String,
    pub pickup_location: String,
    pub destination: String,
    pub recipient_name: String,
    pub phone: String,
    /// Owning user's id
    pub user: Uuid,
    pub status: OrderStatus,
    pub present_location: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user == user_id
    }
}

#[derive(Clone, Debug, Default)]
pub struct NewOrder {
    pub description: Option<String>,
    pub pickup_location: Option<String>,
    pub destination: Option<String>,
    pub recipient_name: Option<String>,
    pub phone: Option<String>,
}

/// General-field update; `None` leaves the field untouched.
#[derive(Clone, Debug, Default)]
pub struct OrderPatch {
    pub description: Option<String>,
    pub pickup_location: Option<String>,
    pub destination: Option<String>,
    pub recipient_name: Option<String>,
    pub phone: Option<String>,
}
