pub mod api;
pub mod auth;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use crate::core::errors::SendItError;
pub use crate::core::services::ParcelService;
pub use infrastructure::storage::{Storage, in_memory::InMemoryStorage, sql::SqlStorage};

#[cfg(test)]
mod tests;
