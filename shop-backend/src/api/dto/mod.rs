// src/api/dto/mod.rs
pub mod auth_dto;
pub mod catalog_dto;
pub mod order_dto;
pub mod product_dto;
pub mod provider_dto;
pub mod user_dto;
