// shop-backend/src/api/handlers/user_handler.rs
use crate::api::dto::user_dto::{
    AdminUpdateUserRequest, AdminUserResponse, AdminUserSearchQuery, AvailabilityQuery,
    AvailabilityResponse, DashboardStatsResponse, UpdateUserStatusRequest,
};
use crate::api::AppState;
use crate::domain::user_model::SafeUser;
use crate::error::AppResult;
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Router,
};
use tracing::info;

// --- 管理者用ユーザー管理 ---

/// ユーザー検索（絞り込み・ページング）
pub async fn list_users_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Query(query): Query<AdminUserSearchQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<AdminUserResponse>>> {
    admin.require_admin()?;

    let users = app_state.user_service.search_users(&query).await?;
    info!(
        admin_id = %admin.user_id,
        total = users.pagination.total_count,
        "Admin user search"
    );
    Ok(ApiResponse::success(users))
}

/// ダッシュボード統計
pub async fn user_stats_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
) -> AppResult<ApiResponse<DashboardStatsResponse>> {
    admin.require_admin()?;
    let stats = app_state.user_service.dashboard_stats().await?;
    Ok(ApiResponse::success(stats))
}

pub async fn get_user_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(user_id): ValidatedUuid,
) -> AppResult<ApiResponse<AdminUserResponse>> {
    admin.require_admin()?;
    let user = app_state.user_service.get_user(user_id).await?;
    Ok(ApiResponse::success(user))
}

pub async fn update_user_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(user_id): ValidatedUuid,
    Json(payload): Json<AdminUpdateUserRequest>,
) -> AppResult<ApiResponse<AdminUserResponse>> {
    admin.require_admin()?;

    let user = app_state
        .user_service
        .update_user(user_id, payload)
        .await?;
    info!(admin_id = %admin.user_id, user_id = %user_id, "User updated by admin");
    Ok(ApiResponse::success(user))
}

/// 有効・無効の切り替え（論理削除）
pub async fn update_user_status_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(user_id): ValidatedUuid,
    Json(payload): Json<UpdateUserStatusRequest>,
) -> AppResult<ApiResponse<SafeUser>> {
    admin.require_admin()?;

    let user = app_state
        .user_service
        .update_status(admin.user_id, user_id, payload.is_active)
        .await?;
    Ok(ApiResponse::success(user))
}

pub async fn delete_user_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(user_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    admin.require_admin()?;

    app_state
        .user_service
        .delete_user(admin.user_id, user_id)
        .await?;
    info!(admin_id = %admin.user_id, user_id = %user_id, "User deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

// --- 重複チェック ---

pub async fn check_username_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<ApiResponse<AvailabilityResponse>> {
    admin.require_admin()?;
    let result = app_state.user_service.check_username(&query).await?;
    Ok(ApiResponse::success(result))
}

pub async fn check_email_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Query(query): Query<AvailabilityQuery>,
) -> AppResult<ApiResponse<AvailabilityResponse>> {
    admin.require_admin()?;
    let result = app_state.user_service.check_email(&query).await?;
    Ok(ApiResponse::success(result))
}

pub fn user_router(app_state: AppState) -> Router {
    Router::new()
        .route("/admin/users", get(list_users_handler))
        .route("/admin/users/stats", get(user_stats_handler))
        .route("/admin/users/check-username", get(check_username_handler))
        .route("/admin/users/check-email", get(check_email_handler))
        .route(
            "/admin/users/{id}",
            get(get_user_handler)
                .put(update_user_handler)
                .delete(delete_user_handler),
        )
        .route("/admin/users/{id}/status", patch(update_user_status_handler))
        .with_state(app_state)
}
