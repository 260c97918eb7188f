// shop-backend/src/api/handlers/provider_handler.rs
use crate::api::dto::provider_dto::{
    CreateInvitationRequest, CreateProviderRequest, InvitationListQuery, InvitationResponse,
    ProviderResponse, UpdateCommissionRequest, UpdateProviderRequest, UpdateVerificationRequest,
};
use crate::api::AppState;
use crate::error::{AppError, AppResult};
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Path, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use tracing::info;

// --- 本人用 ---

/// プロバイダー登録
pub async fn register_provider_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateProviderRequest>,
) -> AppResult<(StatusCode, ApiResponse<ProviderResponse>)> {
    let provider = app_state
        .provider_service
        .register(user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(provider)))
}

pub async fn get_own_provider_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<ProviderResponse>> {
    let provider = app_state.provider_service.get_own(user.user_id).await?;
    Ok(ApiResponse::success(provider))
}

pub async fn update_own_provider_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<UpdateProviderRequest>,
) -> AppResult<ApiResponse<ProviderResponse>> {
    let provider = app_state
        .provider_service
        .update_own(user.user_id, payload)
        .await?;
    Ok(ApiResponse::success(provider))
}

/// 公開プロフィール
pub async fn get_provider_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(provider_id): ValidatedUuid,
) -> AppResult<ApiResponse<ProviderResponse>> {
    let provider = app_state.provider_service.get_provider(provider_id).await?;
    Ok(ApiResponse::success(provider))
}

/// 招待の受諾
pub async fn accept_invitation_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(token): Path<String>,
) -> AppResult<ApiResponse<ProviderResponse>> {
    if token.trim().is_empty() {
        return Err(AppError::BadRequest("Invitation token is required".to_string()));
    }

    let provider = app_state
        .provider_service
        .accept_invitation(&user, token.trim())
        .await?;
    Ok(ApiResponse::success(provider))
}

// --- 管理者用 ---

pub async fn update_verification_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(provider_id): ValidatedUuid,
    Json(payload): Json<UpdateVerificationRequest>,
) -> AppResult<ApiResponse<ProviderResponse>> {
    admin.require_admin()?;

    let provider = app_state
        .provider_service
        .update_verification(provider_id, payload)
        .await?;
    info!(
        admin_id = %admin.user_id,
        provider_id = %provider_id,
        status = %provider.verification_status,
        "Provider verification updated"
    );
    Ok(ApiResponse::success(provider))
}

pub async fn update_commission_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(provider_id): ValidatedUuid,
    Json(payload): Json<UpdateCommissionRequest>,
) -> AppResult<ApiResponse<ProviderResponse>> {
    admin.require_admin()?;

    let provider = app_state
        .provider_service
        .update_commission(provider_id, payload)
        .await?;
    Ok(ApiResponse::success(provider))
}

/// 招待の発行（トークンはこのレスポンスでのみ返す）
pub async fn create_invitation_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Json(payload): Json<CreateInvitationRequest>,
) -> AppResult<(StatusCode, ApiResponse<InvitationResponse>)> {
    admin.require_admin()?;

    let invitation = app_state
        .provider_service
        .create_invitation(admin.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(invitation)))
}

pub async fn list_invitations_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Query(query): Query<InvitationListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<InvitationResponse>>> {
    admin.require_admin()?;
    let invitations = app_state.provider_service.list_invitations(&query).await?;
    Ok(ApiResponse::success(invitations))
}

pub fn provider_router(app_state: AppState) -> Router {
    Router::new()
        .route("/providers", post(register_provider_handler))
        .route(
            "/providers/me",
            get(get_own_provider_handler).patch(update_own_provider_handler),
        )
        .route("/providers/{id}", get(get_provider_handler))
        .route(
            "/provider-invitations/{token}/accept",
            post(accept_invitation_handler),
        )
        .route(
            "/admin/providers/{id}/verification",
            patch(update_verification_handler),
        )
        .route(
            "/admin/providers/{id}/commission",
            patch(update_commission_handler),
        )
        .route(
            "/admin/provider-invitations",
            get(list_invitations_handler).post(create_invitation_handler),
        )
        .with_state(app_state)
}
