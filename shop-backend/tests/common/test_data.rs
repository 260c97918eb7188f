// tests/common/test_data.rs
use serde_json::{json, Value};

pub const DEFAULT_PASSWORD: &str = "MyUniqueP@ssw0rd91";

pub fn signup_data(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": DEFAULT_PASSWORD,
        "first_name": "Test",
        "last_name": "User",
    })
}

pub fn signup_data_with_name(username: &str, email: &str, first_name: &str, last_name: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": DEFAULT_PASSWORD,
        "first_name": first_name,
        "last_name": last_name,
    })
}

pub fn provider_data(business_name: &str) -> Value {
    json!({
        "business_name": business_name,
        "description": "Independent record label",
        "contact_email": "label@example.com",
    })
}
