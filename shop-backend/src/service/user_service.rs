// shop-backend/src/service/user_service.rs
use crate::api::dto::user_dto::{
    AdminUpdateUserRequest, AdminUserResponse, AdminUserSearchQuery, AvailabilityQuery,
    AvailabilityResponse, DashboardStatsResponse,
};
use crate::config::app::BootstrapAdmin;
use crate::domain::user_model::SafeUser;
use crate::domain::user_role::UserRole;
use crate::error::{AppError, AppResult};
use crate::repository::provider_repository::ProviderRepository;
use crate::repository::user_repository::{CreateUser, UserRepository};
use crate::types::pagination::normalize_page;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::{convert_validation_errors, internal_server_error};
use crate::utils::password::PasswordManager;
use chrono::{DateTime, Datelike, TimeZone, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// 当月1日 00:00 (UTC)
pub fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}

/// 管理者向けユーザー管理サービス
pub struct UserService {
    user_repo: Arc<UserRepository>,
    provider_repo: Arc<ProviderRepository>,
    password_manager: Arc<PasswordManager>,
}

impl UserService {
    pub fn new(
        user_repo: Arc<UserRepository>,
        provider_repo: Arc<ProviderRepository>,
        password_manager: Arc<PasswordManager>,
    ) -> Self {
        Self {
            user_repo,
            provider_repo,
            password_manager,
        }
    }

    /// 条件付きユーザー検索
    pub async fn search_users(
        &self,
        query: &AdminUserSearchQuery,
    ) -> AppResult<PaginatedResponse<AdminUserResponse>> {
        let filter = query.to_filter();
        let (page, per_page) = normalize_page(query.page, query.per_page);

        let (rows, total_count) = self
            .user_repo
            .search_for_admin(
                &filter,
                query.sort_by.unwrap_or_default(),
                query.sort_order.unwrap_or_default(),
                page,
                per_page,
            )
            .await?;

        info!(
            total_count = total_count,
            page = page,
            per_page = per_page,
            "Admin user search executed"
        );

        let items = rows.into_iter().map(AdminUserResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total_count))
    }

    /// ダッシュボード統計
    pub async fn dashboard_stats(&self) -> AppResult<DashboardStatsResponse> {
        let since = month_start(Utc::now());
        let users = self.user_repo.count_users(since).await?;
        let providers = self.provider_repo.count_providers(since).await?;
        Ok((users, providers).into())
    }

    pub async fn get_user(&self, user_id: Uuid) -> AppResult<AdminUserResponse> {
        self.user_repo
            .find_with_provider(user_id)
            .await?
            .map(AdminUserResponse::from)
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// 管理者によるユーザー編集
    ///
    /// 整形 → 検証 → 一意性チェックの順で行う。
    pub async fn update_user(
        &self,
        user_id: Uuid,
        request: AdminUpdateUserRequest,
    ) -> AppResult<AdminUserResponse> {
        let request = request.normalized();
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "user_service::update_user"))?;

        let update = request
            .into_update()
            .ok_or_else(|| AppError::ValidationError("Invalid user data".to_string()))?;

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if !self
            .user_repo
            .is_username_available(&update.username, Some(user_id))
            .await?
        {
            return Err(AppError::Conflict("Username is already taken".to_string()));
        }
        if !self
            .user_repo
            .is_email_available(&update.email, Some(user_id))
            .await?
        {
            return Err(AppError::Conflict(
                "Email address is already registered".to_string(),
            ));
        }

        let role = update.role;
        self.user_repo
            .apply_admin_update(user_id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %user_id, role = %role, "User updated by admin");
        self.get_user(user_id).await
    }

    /// アカウントの有効化・無効化（管理者自身は変更不可）
    pub async fn update_status(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        is_active: bool,
    ) -> AppResult<SafeUser> {
        if actor_id == user_id {
            warn!(user_id = %user_id, "Admin attempted to change own status");
            return Err(AppError::BadRequest(
                "Cannot change your own account status".to_string(),
            ));
        }

        let updated = self
            .user_repo
            .update_active_status(user_id, is_active)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        info!(user_id = %user_id, is_active = is_active, "User status changed");
        Ok(updated.into())
    }

    /// 物理削除（商品を持つプロバイダーのユーザーは削除不可）
    pub async fn delete_user(&self, actor_id: Uuid, user_id: Uuid) -> AppResult<()> {
        if actor_id == user_id {
            return Err(AppError::BadRequest(
                "Cannot delete your own account".to_string(),
            ));
        }

        if self.user_repo.find_by_id(user_id).await?.is_none() {
            return Err(AppError::NotFound("User not found".to_string()));
        }

        if !self.user_repo.can_be_deleted(user_id).await? {
            warn!(user_id = %user_id, "Delete blocked: user's provider owns products");
            return Err(AppError::Conflict(
                "User cannot be deleted while their provider has products".to_string(),
            ));
        }

        self.user_repo.delete(user_id).await?;
        info!(user_id = %user_id, "User deleted");
        Ok(())
    }

    pub async fn check_username(&self, query: &AvailabilityQuery) -> AppResult<AvailabilityResponse> {
        let value = query.value.trim().to_lowercase();
        let available = self
            .user_repo
            .is_username_available(&value, query.exclude_id)
            .await?;
        Ok(AvailabilityResponse { value, available })
    }

    pub async fn check_email(&self, query: &AvailabilityQuery) -> AppResult<AvailabilityResponse> {
        let value = query.value.trim().to_lowercase();
        let available = self
            .user_repo
            .is_email_available(&value, query.exclude_id)
            .await?;
        Ok(AvailabilityResponse { value, available })
    }

    /// 初期管理者の作成（管理者が1人もいない場合のみ）
    pub async fn ensure_bootstrap_admin(
        &self,
        admin: &BootstrapAdmin,
    ) -> AppResult<Option<SafeUser>> {
        if self.user_repo.count_by_role(UserRole::Admin).await? > 0 {
            return Ok(None);
        }

        let username = admin.username.trim().to_lowercase();
        let email = admin.email.trim().to_lowercase();
        if !self.user_repo.is_username_available(&username, None).await?
            || !self.user_repo.is_email_available(&email, None).await?
        {
            warn!(username = %username, "Bootstrap admin conflicts with an existing user");
            return Ok(None);
        }

        let password_hash = self
            .password_manager
            .hash_password(&admin.password)
            .map_err(|e| {
                internal_server_error(
                    e,
                    "user_service::ensure_bootstrap_admin",
                    "Invalid bootstrap admin password",
                )
            })?;

        let user = self
            .user_repo
            .create(CreateUser {
                username,
                email,
                password_hash,
                first_name: "System".to_string(),
                last_name: "Administrator".to_string(),
                phone: None,
                role: UserRole::Admin,
            })
            .await?;

        info!(user_id = %user.id, username = %user.username, "Bootstrap admin created");
        Ok(Some(user.into()))
    }
}
