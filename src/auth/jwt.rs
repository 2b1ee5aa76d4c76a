use crate::core::errors::SendItError;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,  // User ID
    pub role: String, // "user" or "admin"
    pub iat: usize,
    pub exp: usize,
}

pub struct JwtService {
    secret: String,
    ttl_secs: u64,
}

impl JwtService {
    pub fn new(secret: String, ttl_secs: u64) -> Self {
        JwtService { secret, ttl_secs }
    }

    pub fn generate_token(&self, user_id: &str, role: &str) -> Result<String, SendItError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .map_err(|e| SendItError::InternalServerError(format!("Time error: {}", e)))?;

        let claims = Claims {
            sub: user_id.to_string(),
            role: role.to_string(),
            iat: now as usize,
            exp: (now + self.ttl_secs) as usize,
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| SendItError::InternalServerError(format!("JWT encoding error: {}", e)))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, SendItError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            SendItError::NotAuthenticated
        })?;

        Ok(token_data.claims)
    }
}
