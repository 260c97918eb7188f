// shop-backend/src/api/handlers/auth_handler.rs
use crate::api::dto::auth_dto::{
    AuthResponse, ChangePasswordRequest, MessageResponse, SigninRequest, SignupRequest,
};
use crate::api::AppState;
use crate::domain::user_model::SafeUser;
use crate::error::AppResult;
use crate::middleware::auth::{AuthenticatedUser, SESSION_COOKIE_NAME};
use crate::types::ApiResponse;
use axum::{
    extract::{Json, State},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::info;

/// セッションCookieを作成
fn session_cookie(token: String, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, token))
        .path("/")
        .secure(secure)
        .http_only(true)
        .same_site(SameSite::Strict)
        .build()
}

/// ユーザー登録（顧客として作成し、そのままログイン状態にする）
pub async fn signup_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SignupRequest>,
) -> AppResult<(StatusCode, CookieJar, ApiResponse<AuthResponse>)> {
    info!(username = %payload.username, "User signup attempt");

    let auth_response = app_state.auth_service.signup(payload).await?;
    let jar = jar.add(session_cookie(
        auth_response.token.clone(),
        app_state.config.security.cookie_secure,
    ));

    Ok((
        StatusCode::CREATED,
        jar,
        ApiResponse::success(auth_response),
    ))
}

/// ログイン
pub async fn signin_handler(
    State(app_state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<SigninRequest>,
) -> AppResult<(CookieJar, ApiResponse<AuthResponse>)> {
    info!(identifier = %payload.identifier, "User signin attempt");

    let auth_response = app_state.auth_service.signin(payload).await?;
    let jar = jar.add(session_cookie(
        auth_response.token.clone(),
        app_state.config.security.cookie_secure,
    ));

    Ok((jar, ApiResponse::success(auth_response)))
}

/// ログアウト（現在のセッションのみ無効化）
pub async fn signout_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
) -> AppResult<(CookieJar, ApiResponse<MessageResponse>)> {
    app_state.auth_service.signout(user.session_id).await?;

    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));
    info!(user_id = %user.user_id, "User signed out");

    Ok((
        jar,
        ApiResponse::success(MessageResponse::new("Successfully signed out")),
    ))
}

pub async fn me_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> AppResult<ApiResponse<SafeUser>> {
    let current = app_state.auth_service.current_user(user.user_id).await?;
    Ok(ApiResponse::success(current))
}

/// パスワード変更（全セッションが無効になる）
pub async fn change_password_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    jar: CookieJar,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<(CookieJar, ApiResponse<MessageResponse>)> {
    app_state
        .auth_service
        .change_password(user.user_id, payload)
        .await?;

    let jar = jar.remove(Cookie::build(SESSION_COOKIE_NAME).path("/"));

    Ok((
        jar,
        ApiResponse::success(MessageResponse::new(
            "Password changed. Please sign in again",
        )),
    ))
}

pub fn auth_router(app_state: AppState) -> Router {
    Router::new()
        .route("/auth/signup", post(signup_handler))
        .route("/auth/signin", post(signin_handler))
        .route("/auth/signout", post(signout_handler))
        .route("/auth/me", get(me_handler))
        .route("/auth/change-password", post(change_password_handler))
        .with_state(app_state)
}
