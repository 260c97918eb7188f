// src/service/mod.rs
pub mod auth_service;
pub mod catalog_service;
pub mod order_service;
pub mod product_service;
pub mod provider_service;
pub mod user_service;
