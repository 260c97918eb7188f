// shop-backend/src/service/auth_service.rs
use crate::api::dto::auth_dto::{AuthResponse, ChangePasswordRequest, SigninRequest, SignupRequest};
use crate::domain::user_model::{self, SafeUser};
use crate::domain::user_role::UserRole;
use crate::domain::user_session_model;
use crate::error::{AppError, AppResult};
use crate::repository::user_repository::{CreateUser, UserRepository};
use crate::repository::user_session_repository::UserSessionRepository;
use crate::utils::error_helper::convert_validation_errors;
use crate::utils::password::{PasswordError, PasswordManager};
use crate::utils::token::{generate_token, hash_token};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;
use validator::Validate;

/// 認証サービス
pub struct AuthService {
    user_repo: Arc<UserRepository>,
    session_repo: Arc<UserSessionRepository>,
    password_manager: Arc<PasswordManager>,
    session_ttl: Duration,
}

fn password_error(e: PasswordError) -> AppError {
    match e {
        PasswordError::WeakPassword(msg) => AppError::ValidationError(msg),
        other => {
            error!(error = %other, "Password processing failed");
            AppError::InternalServerError("Password processing failed".to_string())
        }
    }
}

impl AuthService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        session_repo: Arc<UserSessionRepository>,
        password_manager: Arc<PasswordManager>,
        session_ttl_hours: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            password_manager,
            session_ttl: Duration::hours(session_ttl_hours),
        }
    }

    // --- ユーザー登録・ログイン ---

    /// 顧客の新規登録
    pub async fn signup(&self, signup_data: SignupRequest) -> AppResult<AuthResponse> {
        let signup_data = signup_data.normalized();
        signup_data
            .validate()
            .map_err(|e| convert_validation_errors(e, "auth_service::signup"))?;

        if !self
            .user_repo
            .is_email_available(&signup_data.email, None)
            .await?
        {
            return Err(AppError::Conflict(
                "Email address is already registered".to_string(),
            ));
        }
        if !self
            .user_repo
            .is_username_available(&signup_data.username, None)
            .await?
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }

        let password_hash = self
            .password_manager
            .hash_password(&signup_data.password)
            .map_err(password_error)?;

        let user = self
            .user_repo
            .create(CreateUser {
                username: signup_data.username,
                email: signup_data.email,
                password_hash,
                first_name: signup_data.first_name,
                last_name: signup_data.last_name,
                phone: signup_data.phone,
                role: UserRole::Customer,
            })
            .await?;

        info!(
            user_id = %user.id,
            username = %user.username,
            "User registered successfully"
        );

        self.open_session(user).await
    }

    /// ログイン（ユーザー名またはメールアドレス）
    pub async fn signin(&self, signin_data: SigninRequest) -> AppResult<AuthResponse> {
        signin_data
            .validate()
            .map_err(|e| convert_validation_errors(e, "auth_service::signin"))?;

        let identifier = signin_data.identifier.trim();
        let user = self
            .user_repo
            .find_by_email_or_username(identifier)
            .await?
            .ok_or_else(|| {
                warn!(identifier = %identifier, "Login attempt with invalid credentials");
                AppError::Unauthorized("Invalid credentials".to_string())
            })?;

        let is_valid = self
            .password_manager
            .verify_password(&signin_data.password, &user.password_hash)
            .map_err(password_error)?;

        if !is_valid {
            warn!(user_id = %user.id, "Login attempt with incorrect password");
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        // パスワード確認後にアカウント状態を見る
        if !user.can_authenticate() {
            warn!(user_id = %user.id, "Login attempt for inactive account");
            return Err(AppError::Unauthorized("Account is inactive".to_string()));
        }

        self.user_repo.update_last_login(user.id).await?;
        info!(user_id = %user.id, "User signed in successfully");

        let user = self.user_repo.find_by_id(user.id).await?.unwrap_or(user);
        self.open_session(user).await
    }

    /// ログアウト（現在のセッションのみ無効化）
    pub async fn signout(&self, session_id: Uuid) -> AppResult<()> {
        let affected = self.session_repo.deactivate(session_id).await?;
        info!(session_id = %session_id, affected = affected, "Session signed out");
        Ok(())
    }

    /// 現在のユーザー情報取得
    pub async fn current_user(&self, user_id: Uuid) -> AppResult<SafeUser> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(user.into())
    }

    /// パスワード変更（全セッションを無効化する）
    pub async fn change_password(
        &self,
        user_id: Uuid,
        change_data: ChangePasswordRequest,
    ) -> AppResult<()> {
        change_data
            .validate()
            .map_err(|e| convert_validation_errors(e, "auth_service::change_password"))?;

        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let is_current_valid = self
            .password_manager
            .verify_password(&change_data.current_password, &user.password_hash)
            .map_err(password_error)?;

        if !is_current_valid {
            warn!(user_id = %user_id, "Password change with incorrect current password");
            return Err(AppError::Unauthorized(
                "Current password is incorrect".to_string(),
            ));
        }

        if change_data.current_password == change_data.new_password {
            return Err(AppError::ValidationError(
                "New password must be different from current password".to_string(),
            ));
        }

        let new_password_hash = self
            .password_manager
            .hash_password(&change_data.new_password)
            .map_err(password_error)?;

        self.user_repo
            .update_password_and_revoke_sessions(user_id, new_password_hash)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %user_id, "Password changed, all sessions revoked");
        Ok(())
    }

    // --- セッション ---

    /// 提示されたトークンからユーザーとセッションを解決
    pub async fn authenticate_token(
        &self,
        token: &str,
    ) -> AppResult<(user_model::Model, user_session_model::Model)> {
        let session = self
            .session_repo
            .find_valid_by_token_hash(&hash_token(token))
            .await?
            .ok_or_else(|| {
                warn!("Invalid or expired session token");
                AppError::Unauthorized("Invalid or expired session".to_string())
            })?;

        let user = match self.user_repo.find_by_id(session.user_id).await? {
            Some(user) if user.can_authenticate() => user,
            _ => {
                warn!(user_id = %session.user_id, "Session belongs to an inactive or missing user");
                return Err(AppError::Unauthorized("Account is inactive".to_string()));
            }
        };

        self.session_repo.touch(session.id).await?;
        Ok((user, session))
    }

    async fn open_session(&self, user: user_model::Model) -> AppResult<AuthResponse> {
        let token = generate_token();
        let expires_at = Utc::now() + self.session_ttl;
        let session = self
            .session_repo
            .create(user.id, hash_token(&token), expires_at)
            .await?;

        info!(user_id = %user.id, session_id = %session.id, "Session created");

        Ok(AuthResponse {
            user: user.into(),
            token,
            expires_at: session.expires_at,
        })
    }
}
