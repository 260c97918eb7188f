// shop-backend/src/api/dto/provider_dto.rs

use crate::domain::provider_invitation_model::{self, InvitationStatus};
use crate::domain::provider_model;
use crate::domain::verification_status::VerificationStatus;
use crate::repository::provider_repository::{CreateProvider, UpdateProvider};
use crate::utils::validation::{self, catalog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// プロバイダー登録（本人による申請）
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProviderRequest {
    #[validate(
        length(
            min = 1,
            max = catalog::TITLE_MAX_LENGTH,
            message = "Business name must be between 1 and 200 characters"
        ),
        custom(function = validation::validate_not_blank)
    )]
    pub business_name: String,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub description: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[validate(custom(function = validation::validate_phone))]
    pub phone: Option<String>,

    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,
}

impl CreateProviderRequest {
    pub fn into_create(self) -> CreateProvider {
        CreateProvider {
            business_name: self.business_name.trim().to_string(),
            description: validation::trim_optional(self.description),
            contact_email: validation::trim_optional(self.contact_email)
                .map(|e| e.to_lowercase()),
            phone: validation::trim_optional(self.phone),
            website: validation::trim_optional(self.website),
            verification_status: VerificationStatus::Pending,
            commission_rate: provider_model::DEFAULT_COMMISSION_RATE,
        }
    }
}

/// プロバイダー情報の部分更新
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProviderRequest {
    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub business_name: Option<String>,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub description: Option<String>,

    #[validate(email(message = "Invalid contact email"))]
    pub contact_email: Option<String>,

    #[validate(custom(function = validation::validate_phone))]
    pub phone: Option<String>,

    #[validate(url(message = "Invalid website URL"))]
    pub website: Option<String>,
}

impl UpdateProviderRequest {
    pub fn is_empty(&self) -> bool {
        self.business_name.is_none()
            && self.description.is_none()
            && self.contact_email.is_none()
            && self.phone.is_none()
            && self.website.is_none()
    }

    pub fn into_update(self) -> UpdateProvider {
        UpdateProvider {
            business_name: self.business_name.map(|s| s.trim().to_string()),
            description: self.description.map(|s| s.trim().to_string()),
            contact_email: self.contact_email.map(|s| s.trim().to_lowercase()),
            phone: self.phone.map(|s| s.trim().to_string()),
            website: self.website.map(|s| s.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateVerificationRequest {
    #[validate(custom(function = validation::validate_verification_status))]
    pub verification_status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateCommissionRequest {
    #[validate(custom(function = validation::validate_commission_rate))]
    pub commission_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub business_name: String,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub verification_status: VerificationStatus,
    pub commission_rate: f64,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<provider_model::Model> for ProviderResponse {
    fn from(model: provider_model::Model) -> Self {
        let verification_status = model.verification_status();
        Self {
            id: model.id,
            user_id: model.user_id,
            business_name: model.business_name,
            description: model.description,
            contact_email: model.contact_email,
            phone: model.phone,
            website: model.website,
            verification_status,
            commission_rate: model.commission_rate,
            verified_at: model.verified_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// --- 招待 ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateInvitationRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub business_name: String,

    #[validate(custom(function = validation::validate_commission_rate))]
    pub commission_rate: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct InvitationListQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl InvitationListQuery {
    pub fn status_filter(&self) -> Option<InvitationStatus> {
        self.status.as_deref().and_then(InvitationStatus::parse)
    }
}

/// 招待レスポンス
///
/// トークンはメール配信を行わないため、作成直後のレスポンスにのみ含める。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationResponse {
    pub id: Uuid,
    pub email: String,
    pub business_name: String,
    pub commission_rate: f64,
    pub status: InvitationStatus,
    pub expires_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl InvitationResponse {
    pub fn with_token(model: provider_invitation_model::Model) -> Self {
        let token = model.token.clone();
        Self {
            token: Some(token),
            ..Self::from(model)
        }
    }
}

impl From<provider_invitation_model::Model> for InvitationResponse {
    fn from(model: provider_invitation_model::Model) -> Self {
        let status = model.status();
        Self {
            id: model.id,
            email: model.email,
            business_name: model.business_name,
            commission_rate: model.commission_rate,
            status,
            expires_at: model.expires_at,
            accepted_at: model.accepted_at,
            created_at: model.created_at,
            token: None,
        }
    }
}
