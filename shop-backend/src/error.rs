// shop-backend/src/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::{DbErr, SqlErr};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{error, warn};
use validator::ValidationErrors;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DbErr(#[from] DbErr),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Multiple validation errors")]
    ValidationErrors(Vec<String>),

    #[error("Validation failed")]
    ValidationFailure(#[from] ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DbErr(db_err) => match db_err {
                DbErr::RecordNotFound(_) => StatusCode::NOT_FOUND,
                _ if is_unique_violation(db_err) => StatusCode::CONFLICT,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_)
            | AppError::ValidationErrors(_)
            | AppError::ValidationFailure(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn is_unique_violation(db_err: &DbErr) -> bool {
    matches!(db_err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

// axum でエラーをHTTPレスポンスに変換するための実装
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_response = match self {
            AppError::DbErr(db_err) => {
                // 詳細はサーバーログのみ。クライアントには汎用メッセージを返す
                let (message, error_type) = match &db_err {
                    DbErr::RecordNotFound(_) => {
                        warn!(error = %db_err, "Record not found");
                        ("The requested resource was not found", "not_found")
                    }
                    _ if is_unique_violation(&db_err) => {
                        warn!(error = %db_err, "Unique constraint violation");
                        ("The resource already exists", "conflict")
                    }
                    _ => {
                        error!(error = ?db_err, "Database error");
                        ("A database error occurred", "database_error")
                    }
                };
                ErrorResponse::simple(message.to_string(), error_type)
            }
            AppError::NotFound(message) => ErrorResponse::simple(message, "not_found"),
            AppError::ValidationError(message) => {
                ErrorResponse::simple(message, "validation_error")
            }
            AppError::ValidationErrors(errors) => {
                let mut field_errors: HashMap<String, Vec<String>> = HashMap::new();
                for error in &errors {
                    if let Some((field, message)) = error.split_once(": ") {
                        field_errors
                            .entry(field.to_string())
                            .or_default()
                            .push(message.to_string());
                    }
                }
                let errors_array = errors.iter().map(|e| json!({ "message": e })).collect();
                ErrorResponse::validation(field_errors, errors_array)
            }
            AppError::ValidationFailure(errors) => {
                let field_errors: HashMap<String, Vec<String>> = errors
                    .field_errors()
                    .into_iter()
                    .map(|(field, errors)| {
                        let messages = errors
                            .iter()
                            .map(|e| {
                                e.message
                                    .as_ref()
                                    .map_or_else(|| "Invalid value".to_string(), |m| m.to_string())
                            })
                            .collect();
                        (field.to_string(), messages)
                    })
                    .collect();
                let errors_array = field_errors
                    .iter()
                    .flat_map(|(field, messages)| {
                        messages
                            .iter()
                            .map(move |msg| json!({ "message": format!("{}: {}", field, msg) }))
                    })
                    .collect();
                ErrorResponse::validation(field_errors, errors_array)
            }
            AppError::BadRequest(message) => ErrorResponse::simple(message, "bad_request"),
            AppError::Unauthorized(message) => ErrorResponse::simple(message, "unauthorized"),
            AppError::Forbidden(message) => ErrorResponse::simple(message, "forbidden"),
            AppError::Conflict(message) => ErrorResponse::simple(message, "conflict"),
            AppError::InternalServerError(message) => {
                error!(error = %message, "Internal server error");
                ErrorResponse::simple(
                    "An internal server error occurred".to_string(),
                    "internal_server_error",
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

// Result 型のエイリアス
pub type AppResult<T> = Result<T, AppError>;

/// 統一的なエラーレスポンス構造
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation_errors: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<serde_json::Value>>,
    pub error_type: String,
}

impl ErrorResponse {
    fn simple(message: String, error_type: &str) -> Self {
        Self {
            success: false,
            error: message.clone(),
            message,
            validation_errors: None,
            errors: None,
            error_type: error_type.to_string(),
        }
    }

    fn validation(
        field_errors: HashMap<String, Vec<String>>,
        errors: Vec<serde_json::Value>,
    ) -> Self {
        Self {
            success: false,
            error: "Validation failed".to_string(),
            message: "Validation failed".to_string(),
            validation_errors: Some(field_errors),
            errors: Some(errors),
            error_type: "validation_errors".to_string(),
        }
    }
}
