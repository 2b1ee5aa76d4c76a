use once_cell::sync::Lazy;
use regex::Regex;

use crate::core::errors::SendItError;

pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 32;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\w+([.-]?\w+)*@\w+([.-]?\w+)*(\.\w{2,3})+$").expect("email pattern compiles")
});

/// Returns the trimmed value, or `MissingField(message)` when absent or blank.
pub fn require(value: Option<&str>, message: &str) -> Result<String, SendItError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(SendItError::MissingField(message.to_string())),
    }
}

/// Like [`require`] but for optional patch fields: `None` passes through.
pub fn non_blank(value: Option<&str>, message: &str) -> Result<Option<String>, SendItError> {
    value.map(|v| require(Some(v), message)).transpose()
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn validate_email(email: &str) -> Result<(), SendItError> {
    if EMAIL_PATTERN.is_match(email) {
        Ok(())
    } else {
        Err(SendItError::InvalidEmail(email.to_string()))
    }
}

pub fn validate_password(password: &str) -> Result<(), SendItError> {
    let len = password.chars().count();
    if (PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&len) {
        Ok(())
    } else {
        Err(SendItError::InvalidPassword)
    }
}
