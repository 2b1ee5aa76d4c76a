use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::core::errors::SendItError;
use crate::core::models::{
    order::{NewOrder, Order, OrderPatch},
    user::{NewUser, User},
};

// Request bodies. Every field is optional so that a missing field surfaces
// as a field-specific 400 instead of a generic deserialization rejection.

/// Accepts a JSON string or number; numbers keep their JSON spelling.
fn text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(text) => text,
        Scalar::Number(number) => number.to_string(),
    }))
}

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    /// `user` (default) or `admin`
    pub role: Option<String>,
}

impl From<RegisterRequest> for NewUser {
    fn from(req: RegisterRequest) -> Self {
        NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

#[derive(Deserialize, ToSchema, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub pickup_location: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub recipient_name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(req: CreateOrderRequest) -> Self {
        NewOrder {
            description: req.description,
            pickup_location: req.pickup_location,
            destination: req.destination,
            recipient_name: req.recipient_name,
            phone: req.phone,
        }
    }
}

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub pickup_location: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub destination: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub recipient_name: Option<String>,
    #[serde(default, deserialize_with = "text_or_number")]
    pub phone: Option<String>,
}

impl From<UpdateOrderRequest> for OrderPatch {
    fn from(req: UpdateOrderRequest) -> Self {
        OrderPatch {
            description: req.description,
            pickup_location: req.pickup_location,
            destination: req.destination,
            recipient_name: req.recipient_name,
            phone: req.phone,
        }
    }
}

#[derive(Deserialize, ToSchema, Default)]
pub struct ChangeDestinationRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub destination: Option<String>,
}

#[derive(Deserialize, ToSchema, Default)]
pub struct ChangeStatusRequest {
    /// `In-Transit` or `Delivered`
    #[serde(default, deserialize_with = "text_or_number")]
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChangePresentLocationRequest {
    #[serde(default, deserialize_with = "text_or_number")]
    pub present_location: Option<String>,
}

// Response envelopes

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub success: bool,
    pub data: User,
}

#[derive(Serialize, ToSchema)]
pub struct OrderResponse {
    pub success: bool,
    pub data: Order,
}

#[derive(Serialize, ToSchema)]
pub struct OrderListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Order>,
}

#[derive(Serialize, ToSchema)]
pub struct EmptyResponse {
    pub success: bool,
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
}

impl EmptyResponse {
    pub fn new() -> Self {
        EmptyResponse {
            success: true,
            data: serde_json::json!({}),
        }
    }
}

impl Default for EmptyResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Failure body. Client mistakes carry `message`; authorization and server
/// failures carry `error`.
#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ErrorResponse {
    fn message(text: String) -> Self {
        ErrorResponse {
            success: false,
            message: Some(text),
            error: None,
        }
    }

    fn error(text: String) -> Self {
        ErrorResponse {
            success: false,
            message: None,
            error: Some(text),
        }
    }
}

/// Body text for every 500; the cause is only logged.
pub const SERVER_ERROR: &str = "Server error";

// Newtype wrapper for SendItError to implement IntoResponse
#[derive(Debug)]
pub struct ApiError(pub SendItError);

impl From<SendItError> for ApiError {
    fn from(err: SendItError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let text = self.0.to_string();
        let (status, body) = match self.0 {
            SendItError::MissingField(_)
            | SendItError::InvalidInput(_)
            | SendItError::InvalidEmail(_)
            | SendItError::InvalidPassword
            | SendItError::EmailAlreadyRegistered(_)
            | SendItError::MissingCredentials => (StatusCode::BAD_REQUEST, ErrorResponse::message(text)),
            SendItError::InvalidCredentials | SendItError::NotAuthenticated => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::message(text))
            }
            SendItError::NotAuthorized { .. } | SendItError::NotAuthorizedToList(_) => {
                (StatusCode::UNAUTHORIZED, ErrorResponse::error(text))
            }
            SendItError::OrderNotFound(_) | SendItError::UserNotFound(_) => {
                (StatusCode::NOT_FOUND, ErrorResponse::message(text))
            }
            SendItError::DatabaseError(_) | SendItError::InternalServerError(_) => {
                error!("Request failed: {}", text);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::error(SERVER_ERROR.to_string()),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
