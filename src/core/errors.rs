use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OrderAction {
    View,
    Update,
    Delete,
}

impl std::fmt::Display for OrderAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderAction::View => "view",
            OrderAction::Update => "update",
            OrderAction::Delete => "delete",
        };
        write!(f, "{}", s)
    }
}

#[derive(Error, Debug, Serialize)]
pub enum SendItError {
    /// A required field is absent or blank; carries the client-facing message
    #[error("{0}")]
    MissingField(String),

    /// A field is present but its value is not acceptable
    #[error("{0}")]
    InvalidInput(String),

    #[error("Please add a valid email")]
    InvalidEmail(String),

    #[error("Password must be between 8 and 32 characters")]
    InvalidPassword,

    #[error("The email is already taken!")]
    EmailAlreadyRegistered(String),

    #[error("Please provide an email and password")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Bearer token missing, malformed, expired or for an unknown user
    #[error("Not authorized to access this route")]
    NotAuthenticated,

    /// Caller is neither the owner nor allowed by role
    #[error("User {user_id} is not authorized to {action} this Order")]
    NotAuthorized { user_id: String, action: OrderAction },

    #[error("Not authorized to list orders for user {0}")]
    NotAuthorizedToList(String),

    #[error("Order not found with id of {0}")]
    OrderNotFound(String),

    #[error("User not found with id of {0}")]
    UserNotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl From<sqlx::Error> for SendItError {
    fn from(err: sqlx::Error) -> Self {
        SendItError::DatabaseError(err.to_string())
    }
}
