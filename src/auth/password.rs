use crate::core::errors::SendItError;
use once_cell::sync::OnceCell;

pub struct PasswordHasher {
    cost: u32,
    // Hash of a throwaway password at `cost`, built on first use.
    dummy: OnceCell<String>,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        PasswordHasher {
            cost,
            dummy: OnceCell::new(),
        }
    }

    pub fn hash(&self, password: &str) -> Result<String, SendItError> {
        bcrypt::hash(password, self.cost)
            .map_err(|e| SendItError::InternalServerError(format!("Password hashing error: {}", e)))
    }

    pub fn verify(&self, password: &str, hashed: &str) -> Result<bool, SendItError> {
        bcrypt::verify(password, hashed)
            .map_err(|e| SendItError::InternalServerError(format!("Password verification error: {}", e)))
    }

    /// Spends the same work as `verify` when there is no stored hash to check.
    /// Always answers `false`.
    pub fn verify_dummy(&self, password: &str) -> Result<bool, SendItError> {
        let dummy = self.dummy.get_or_try_init(|| self.hash("sendit-dummy-password"))?;
        self.verify(password, dummy)?;
        Ok(false)
    }
}
