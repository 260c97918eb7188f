// tests/integration/mod.rs

pub mod auth;
pub mod order;
pub mod provider;
