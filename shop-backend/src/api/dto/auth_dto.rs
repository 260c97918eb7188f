// shop-backend/src/api/dto/auth_dto.rs

use crate::domain::user_model::SafeUser;
use crate::utils::validation::{self, password, username};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

// --- リクエストDTO ---

/// 顧客の新規登録リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SignupRequest {
    #[validate(
        length(
            min = username::MIN_LENGTH,
            max = username::MAX_LENGTH,
            message = "Username must be between 3 and 50 characters"
        ),
        custom(function = validation::validate_username)
    )]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(
        min = password::MIN_LENGTH,
        max = password::MAX_LENGTH,
        message = "Password must be between 8 and 128 characters"
    ))]
    pub password: String,

    #[validate(
        length(max = validation::name::MAX_LENGTH, message = "First name is too long"),
        custom(function = validation::validate_not_blank)
    )]
    pub first_name: String,

    #[validate(
        length(max = validation::name::MAX_LENGTH, message = "Last name is too long"),
        custom(function = validation::validate_not_blank)
    )]
    pub last_name: String,

    #[validate(custom(function = validation::validate_phone))]
    pub phone: Option<String>,
}

impl SignupRequest {
    /// 前後の空白を除去し、ユーザー名とメールアドレスを小文字化
    pub fn normalized(self) -> Self {
        Self {
            username: self.username.trim().to_lowercase(),
            email: self.email.trim().to_lowercase(),
            password: self.password,
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            phone: validation::trim_optional(self.phone),
        }
    }
}

/// ログインリクエスト（ユーザー名またはメールアドレス）
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SigninRequest {
    #[validate(length(min = 1, message = "Email or username is required"))]
    pub identifier: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// パスワード変更リクエスト
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,

    #[validate(length(
        min = password::MIN_LENGTH,
        max = password::MAX_LENGTH,
        message = "New password must be between 8 and 128 characters"
    ))]
    pub new_password: String,

    #[validate(must_match(
        other = "new_password",
        message = "Password confirmation does not match"
    ))]
    pub new_password_confirmation: String,
}

// --- レスポンスDTO ---

/// 認証レスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: SafeUser,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
