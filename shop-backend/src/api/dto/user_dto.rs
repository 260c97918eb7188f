// shop-backend/src/api/dto/user_dto.rs

use crate::domain::provider_model;
use crate::domain::user_model::{self, SafeUser};
use crate::domain::user_role::UserRole;
use crate::domain::verification_status::VerificationStatus;
use crate::repository::provider_repository::ProviderCounts;
use crate::repository::user_repository::{
    AdminUserUpdate, UserAdminFilter, UserCounts, UserSortField,
};
use crate::types::query::normalize_search_term;
use crate::types::SortOrder;
use crate::utils::validation::{self, username};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- クエリDTO ---

/// 管理者向けユーザー検索クエリ
///
/// `role` / `verification_status` に解釈できない値が来た場合、その条件は無視する。
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AdminUserSearchQuery {
    pub q: Option<String>,
    pub role: Option<String>,
    pub is_active: Option<bool>,
    pub verification_status: Option<String>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub sort_by: Option<UserSortField>,
    pub sort_order: Option<SortOrder>,
}

impl AdminUserSearchQuery {
    pub fn to_filter(&self) -> UserAdminFilter {
        UserAdminFilter {
            q: normalize_search_term(self.q.as_deref()),
            role: self.role.as_deref().and_then(UserRole::parse),
            is_active: self.is_active,
            verification_status: self
                .verification_status
                .as_deref()
                .and_then(VerificationStatus::parse),
            created_from: self.created_from,
            created_to: self.created_to,
        }
    }
}

/// ユーザー名・メールアドレスの使用可否チェック
#[derive(Debug, Clone, Deserialize)]
pub struct AvailabilityQuery {
    pub value: String,
    pub exclude_id: Option<Uuid>,
}

// --- リクエストDTO ---

/// 管理者によるユーザー編集
///
/// 永続化の前に `normalized()` で整形してから検証する。
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AdminUpdateUserRequest {
    #[validate(
        required(message = "Username is required"),
        length(
            min = username::MIN_LENGTH,
            max = username::MAX_LENGTH,
            message = "Username must be between 3 and 50 characters"
        ),
        custom(function = validation::validate_username)
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "Email is required"),
        email(message = "Invalid email format")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "First name is required"),
        length(
            min = 1,
            max = validation::name::MAX_LENGTH,
            message = "First name must not be blank"
        )
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last name is required"),
        length(
            min = 1,
            max = validation::name::MAX_LENGTH,
            message = "Last name must not be blank"
        )
    )]
    pub last_name: Option<String>,

    #[validate(custom(function = validation::validate_phone))]
    pub phone: Option<String>,

    #[validate(
        required(message = "Role is required"),
        custom(function = validation::validate_role)
    )]
    pub role: Option<String>,
}

impl AdminUpdateUserRequest {
    /// 自由入力項目をトリムし、ユーザー名とメールアドレスを小文字化
    pub fn normalized(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            username: trim(self.username).map(|s| s.to_lowercase()),
            email: trim(self.email).map(|s| s.to_lowercase()),
            first_name: trim(self.first_name),
            last_name: trim(self.last_name),
            phone: validation::trim_optional(self.phone),
            role: trim(self.role),
        }
    }

    /// 検証済みのリクエストを更新内容に変換
    ///
    /// 必須項目が欠けている、またはロールが解釈できない場合は None。
    pub fn into_update(self) -> Option<AdminUserUpdate> {
        Some(AdminUserUpdate {
            username: self.username?,
            email: self.email?,
            first_name: self.first_name?,
            last_name: self.last_name?,
            phone: self.phone,
            role: UserRole::parse(self.role.as_deref()?)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserStatusRequest {
    pub is_active: bool,
}

// --- レスポンスDTO ---

/// 管理画面一覧用のプロバイダー概要
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSummary {
    pub id: Uuid,
    pub business_name: String,
    pub verification_status: VerificationStatus,
    pub commission_rate: f64,
}

impl From<provider_model::Model> for ProviderSummary {
    fn from(model: provider_model::Model) -> Self {
        let verification_status = model.verification_status();
        Self {
            id: model.id,
            business_name: model.business_name,
            verification_status,
            commission_rate: model.commission_rate,
        }
    }
}

/// 管理者向けユーザーレスポンス
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserResponse {
    #[serde(flatten)]
    pub user: SafeUser,
    pub provider: Option<ProviderSummary>,
}

impl From<(user_model::Model, Option<provider_model::Model>)> for AdminUserResponse {
    fn from((user, provider): (user_model::Model, Option<provider_model::Model>)) -> Self {
        Self {
            user: user.into(),
            provider: provider.map(Into::into),
        }
    }
}

/// ダッシュボード統計
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStatsResponse {
    pub total_users: u64,
    pub total_admins: u64,
    pub total_providers: u64,
    pub total_customers: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub new_users_this_month: u64,
    pub verified_providers: u64,
    pub pending_providers: u64,
    pub rejected_providers: u64,
    pub providers_verified_this_month: u64,
}

impl From<(UserCounts, ProviderCounts)> for DashboardStatsResponse {
    fn from((users, providers): (UserCounts, ProviderCounts)) -> Self {
        Self {
            total_users: users.total_users,
            total_admins: users.total_admins,
            total_providers: users.total_providers,
            total_customers: users.total_customers,
            active_users: users.active_users,
            inactive_users: users.inactive_users,
            new_users_this_month: users.new_users_this_month,
            verified_providers: providers.verified_providers,
            pending_providers: providers.pending_providers,
            rejected_providers: providers.rejected_providers,
            providers_verified_this_month: providers.providers_verified_this_month,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub value: String,
    pub available: bool,
}
