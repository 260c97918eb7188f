// shop-backend/src/utils/mod.rs

pub mod error_helper;
pub mod password;
pub mod token;
pub mod validation;
