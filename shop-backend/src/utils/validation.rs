// shop-backend/src/utils/validation.rs

//! 共通バリデーション定数と関数
//!
//! DTO間で共有するルールをまとめる。

use crate::domain::order_status::OrderStatus;
use crate::domain::product_type::ProductType;
use crate::domain::user_role::UserRole;
use crate::domain::verification_status::VerificationStatus;
use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidationError;

pub mod username {
    pub const MIN_LENGTH: u64 = 3;
    pub const MAX_LENGTH: u64 = 50;
}

pub mod password {
    pub const MIN_LENGTH: u64 = 8;
    pub const MAX_LENGTH: u64 = 128;
}

pub mod name {
    pub const MAX_LENGTH: u64 = 100;
}

pub mod catalog {
    pub const TITLE_MAX_LENGTH: u64 = 200;
    pub const DESCRIPTION_MAX_LENGTH: u64 = 5000;
}

/// ユーザー名（英数字・アンダースコア・ハイフン）
pub static USERNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]+$").expect("Invalid username regex"));

/// 電話番号（数字・空白・ハイフン・括弧・先頭の+）
pub static PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9 ()-]{6,30}$").expect("Invalid phone regex"));

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(message.into());
    error
}

pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if USERNAME_REGEX.is_match(username.trim()) {
        Ok(())
    } else {
        Err(error_with_message(
            "invalid_username_format",
            "Username may only contain letters, digits, underscores and hyphens",
        ))
    }
}

pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_REGEX.is_match(phone.trim()) {
        Ok(())
    } else {
        Err(error_with_message("invalid_phone", "Invalid phone number"))
    }
}

/// 空白のみの文字列を拒否
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error_with_message("blank", "Must not be blank"))
    } else {
        Ok(())
    }
}

pub fn validate_role(role: &str) -> Result<(), ValidationError> {
    UserRole::parse(role)
        .map(|_| ())
        .ok_or_else(|| error_with_message("invalid_role", "Role must be ADMIN, PROVIDER or CUSTOMER"))
}

pub fn validate_verification_status(status: &str) -> Result<(), ValidationError> {
    VerificationStatus::parse(status).map(|_| ()).ok_or_else(|| {
        error_with_message(
            "invalid_verification_status",
            "Status must be PENDING, VERIFIED or REJECTED",
        )
    })
}

pub fn validate_product_type(value: &str) -> Result<(), ValidationError> {
    ProductType::parse(value).map(|_| ()).ok_or_else(|| {
        error_with_message("invalid_product_type", "Product type must be PHYSICAL or DIGITAL")
    })
}

pub fn validate_order_status(value: &str) -> Result<(), ValidationError> {
    OrderStatus::parse(value)
        .map(|_| ())
        .ok_or_else(|| error_with_message("invalid_order_status", "Unknown order status"))
}

/// 0〜100 のパーセンテージ
pub fn validate_commission_rate(rate: f64) -> Result<(), ValidationError> {
    if rate.is_finite() && (0.0..=100.0).contains(&rate) {
        Ok(())
    } else {
        Err(error_with_message(
            "invalid_commission_rate",
            "Commission rate must be between 0 and 100",
        ))
    }
}

/// 任意文字列のトリム。空になった場合は None
pub fn trim_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
