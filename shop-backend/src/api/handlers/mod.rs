// shop-backend/src/api/handlers/mod.rs
pub mod auth_handler;
pub mod catalog_handler;
pub mod order_handler;
pub mod product_handler;
pub mod provider_handler;
pub mod system_handler;
pub mod user_handler;
