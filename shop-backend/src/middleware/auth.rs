// shop-backend/src/middleware/auth.rs

use crate::config::AppConfig;
use crate::domain::user_role::UserRole;
use crate::error::AppError;
use crate::service::auth_service::AuthService;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// セッショントークンを保持するCookie名
pub const SESSION_COOKIE_NAME: &str = "session_token";

/// 認証ミドルウェアの設定
#[derive(Clone)]
pub struct AuthMiddlewareConfig {
    pub auth_service: Arc<AuthService>,
    pub session_cookie_name: String,
    pub skip_auth_paths: Vec<String>,
    pub admin_only_paths: Vec<String>,
}

impl AuthMiddlewareConfig {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self {
            auth_service,
            session_cookie_name: SESSION_COOKIE_NAME.to_string(),
            skip_auth_paths: vec![
                "/health".to_string(),
                "/auth/signup".to_string(),
                "/auth/signin".to_string(),
            ],
            admin_only_paths: vec!["/admin".to_string()],
        }
    }
}

/// 認証済みユーザー情報を格納するエクステンション
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub username: String,
    pub role: UserRole,
    pub session_id: Uuid,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.is_admin() {
            Ok(())
        } else {
            warn!(user_id = %self.user_id, role = %self.role, "Admin permission required");
            Err(AppError::Forbidden("Admin access required".to_string()))
        }
    }

    /// 本人または管理者であることを確認
    pub fn ensure_owner_or_admin(&self, owner_id: Uuid) -> Result<(), AppError> {
        if self.user_id == owner_id || self.is_admin() {
            Ok(())
        } else {
            warn!(
                user_id = %self.user_id,
                owner_id = %owner_id,
                "Access denied to resource owned by another user"
            );
            Err(AppError::Forbidden("Access denied".to_string()))
        }
    }
}

/// セッション認証ミドルウェア
///
/// トークンが無いリクエストはそのまま通し、ハンドラ側の `AuthenticatedUser` 抽出で401にする。
/// トークンが提示された場合は必ず検証し、無効なら401を返す。
pub async fn session_auth_middleware(
    State(config): State<AuthMiddlewareConfig>,
    headers: HeaderMap,
    cookie_jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = request.uri().path().to_string();

    if should_skip_auth(&path, &config.skip_auth_paths) {
        debug!(path = %path, "Skipping auth");
        return Ok(next.run(request).await);
    }

    let is_admin_path = should_require_admin(&path, &config.admin_only_paths);

    let token = match extract_token(&headers, &cookie_jar, &config.session_cookie_name) {
        Some(token) => token,
        None if is_admin_path => {
            warn!(path = %path, "Missing authentication token for admin path");
            return Err(AppError::Unauthorized(
                "Authentication required".to_string(),
            ));
        }
        None => return Ok(next.run(request).await),
    };

    let (user, session) = config.auth_service.authenticate_token(&token).await?;

    let authenticated_user = AuthenticatedUser {
        user_id: user.id,
        username: user.username.clone(),
        role: user.role(),
        session_id: session.id,
    };

    if is_admin_path && !authenticated_user.is_admin() {
        warn!(
            user_id = %authenticated_user.user_id,
            role = %authenticated_user.role,
            path = %path,
            "Access denied: Admin permission required"
        );
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    info!(
        user_id = %authenticated_user.user_id,
        username = %authenticated_user.username,
        role = %authenticated_user.role,
        path = %path,
        "Authenticated request"
    );

    request.extensions_mut().insert(authenticated_user);
    Ok(next.run(request).await)
}

/// CORS 設定
///
/// `*` が含まれる場合は任意のオリジンを許可する（Cookie 送信は不可）。
pub fn cors_layer(config: &AppConfig) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .max_age(Duration::from_secs(3600));

    if config.cors_allowed_origins.iter().any(|o| o == "*") {
        return base.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .cors_allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    base.allow_origin(origins).allow_credentials(true)
}

// --- ヘルパー関数 ---

/// リクエストからトークンを抽出（Authorization ヘッダー優先、Cookie はフォールバック）
fn extract_token(headers: &HeaderMap, cookie_jar: &CookieJar, cookie_name: &str) -> Option<String> {
    let auth_header = headers
        .get(header::AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    let cookie_token = cookie_jar
        .get(cookie_name)
        .map(|cookie| cookie.value().to_string())
        .filter(|token| !token.is_empty());

    auth_header.or(cookie_token)
}

fn should_skip_auth(path: &str, skip_paths: &[String]) -> bool {
    skip_paths.iter().any(|skip_path| path == skip_path)
}

fn should_require_admin(path: &str, admin_paths: &[String]) -> bool {
    admin_paths
        .iter()
        .any(|admin_path| path == admin_path || path.starts_with(&format!("{}/", admin_path)))
}

// --- Axum Extractors ---

impl<S> axum::extract::FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
    }
}
