mod api_tests;

use crate::core::models::{order::NewOrder, user::NewUser, user::User};
use crate::core::services::ParcelService;
use crate::infrastructure::storage::{in_memory::InMemoryStorage, sql::SqlStorage};
use std::sync::Arc;

pub const TEST_SECRET: &str = "test-secret";
pub const TEST_PASSWORD: &str = "password123";

pub fn create_test_service() -> ParcelService {
    // Minimum bcrypt cost keeps the suite fast.
    ParcelService::new(Arc::new(InMemoryStorage::new()), TEST_SECRET.to_string(), 3600, 4)
}

pub async fn create_sql_test_service() -> ParcelService {
    let storage = SqlStorage::connect("sqlite::memory:", 1).await.unwrap();
    ParcelService::new(Arc::new(storage), TEST_SECRET.to_string(), 3600, 4)
}

pub fn new_user(email: &str, role: Option<&str>) -> NewUser {
    NewUser {
        first_name: Some("Ada".to_string()),
        last_name: Some("Obi".to_string()),
        email: Some(email.to_string()),
        password: Some(TEST_PASSWORD.to_string()),
        role: role.map(String::from),
    }
}

pub async fn register(service: &ParcelService, email: &str, role: Option<&str>) -> (User, String) {
    service.register(new_user(email, role)).await.unwrap()
}

pub fn new_order() -> NewOrder {
    NewOrder {
        description: Some("Box of books".to_string()),
        pickup_location: Some("12 Allen Avenue, Ikeja".to_string()),
        destination: Some("4 Herbert Macaulay Way, Yaba".to_string()),
        recipient_name: Some("Tunde Bello".to_string()),
        phone: Some("08031234567".to_string()),
    }
}
