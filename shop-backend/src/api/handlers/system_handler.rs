// shop-backend/src/api/handlers/system_handler.rs
use crate::api::AppState;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use tracing::error;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
}

/// ヘルスチェック（DB疎通を含む）
pub async fn health_handler(State(app_state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let environment = app_state.config.environment.clone();

    match app_state.db.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "ok".to_string(),
                environment,
            }),
        ),
        Err(e) => {
            error!(error = %e, "Health check failed: database unreachable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "unavailable".to_string(),
                    environment,
                }),
            )
        }
    }
}

pub fn system_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(app_state)
}
