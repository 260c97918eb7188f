// shop-backend/src/service/provider_service.rs
use crate::api::dto::provider_dto::{
    CreateInvitationRequest, CreateProviderRequest, InvitationListQuery, InvitationResponse,
    ProviderResponse, UpdateCommissionRequest, UpdateProviderRequest, UpdateVerificationRequest,
};
use crate::domain::provider_invitation_model::InvitationStatus;
use crate::domain::provider_model::DEFAULT_COMMISSION_RATE;
use crate::domain::verification_status::VerificationStatus;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::repository::provider_invitation_repository::{
    CreateInvitation, ProviderInvitationRepository,
};
use crate::repository::provider_repository::ProviderRepository;
use crate::repository::user_repository::UserRepository;
use crate::types::pagination::normalize_page;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::convert_validation_errors;
use crate::utils::token::generate_token;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// プロバイダー（出品者）管理サービス
pub struct ProviderService {
    provider_repo: Arc<ProviderRepository>,
    invitation_repo: Arc<ProviderInvitationRepository>,
    user_repo: Arc<UserRepository>,
}

impl ProviderService {
    pub fn new(
        provider_repo: Arc<ProviderRepository>,
        invitation_repo: Arc<ProviderInvitationRepository>,
        user_repo: Arc<UserRepository>,
    ) -> Self {
        Self {
            provider_repo,
            invitation_repo,
            user_repo,
        }
    }

    /// 本人によるプロバイダー登録（審査待ちで作成）
    pub async fn register(
        &self,
        user_id: Uuid,
        request: CreateProviderRequest,
    ) -> AppResult<ProviderResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "provider_service::register"))?;

        if self.provider_repo.find_by_user_id(user_id).await?.is_some() {
            return Err(AppError::Conflict(
                "Provider profile already exists for this user".to_string(),
            ));
        }

        let provider = self
            .provider_repo
            .create_for_user(user_id, request.into_create())
            .await?;

        info!(
            user_id = %user_id,
            provider_id = %provider.id,
            "Provider registered, awaiting verification"
        );
        Ok(provider.into())
    }

    pub async fn get_own(&self, user_id: Uuid) -> AppResult<ProviderResponse> {
        self.provider_repo
            .find_by_user_id(user_id)
            .await?
            .map(ProviderResponse::from)
            .ok_or_else(|| AppError::NotFound("Provider profile not found".to_string()))
    }

    pub async fn update_own(
        &self,
        user_id: Uuid,
        request: UpdateProviderRequest,
    ) -> AppResult<ProviderResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "provider_service::update_own"))?;

        let provider = self
            .provider_repo
            .find_by_user_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Provider profile not found".to_string()))?;

        if request.is_empty() {
            return Ok(provider.into());
        }

        let updated = self
            .provider_repo
            .update_profile(provider.id, request.into_update())
            .await?
            .ok_or_else(|| AppError::NotFound("Provider profile not found".to_string()))?;

        info!(provider_id = %updated.id, "Provider profile updated");
        Ok(updated.into())
    }

    pub async fn get_provider(&self, provider_id: Uuid) -> AppResult<ProviderResponse> {
        self.provider_repo
            .find_by_id(provider_id)
            .await?
            .map(ProviderResponse::from)
            .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))
    }

    // --- 管理者操作 ---

    pub async fn update_verification(
        &self,
        provider_id: Uuid,
        request: UpdateVerificationRequest,
    ) -> AppResult<ProviderResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "provider_service::update_verification"))?;

        let status = VerificationStatus::parse(&request.verification_status).ok_or_else(|| {
            AppError::ValidationError("Invalid verification status".to_string())
        })?;

        let updated = self
            .provider_repo
            .update_verification_status(provider_id, status)
            .await?
            .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))?;

        info!(provider_id = %provider_id, status = %status, "Provider verification updated");
        Ok(updated.into())
    }

    pub async fn update_commission(
        &self,
        provider_id: Uuid,
        request: UpdateCommissionRequest,
    ) -> AppResult<ProviderResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "provider_service::update_commission"))?;

        let updated = self
            .provider_repo
            .update_commission_rate(provider_id, request.commission_rate)
            .await?
            .ok_or_else(|| AppError::NotFound("Provider not found".to_string()))?;

        info!(
            provider_id = %provider_id,
            commission_rate = request.commission_rate,
            "Provider commission updated"
        );
        Ok(updated.into())
    }

    // --- 招待 ---

    /// 招待の発行（トークンはレスポンスに含める）
    pub async fn create_invitation(
        &self,
        admin_id: Uuid,
        request: CreateInvitationRequest,
    ) -> AppResult<InvitationResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "provider_service::create_invitation"))?;

        let email = request.email.trim().to_lowercase();

        if self.invitation_repo.has_open_invitation(&email).await? {
            return Err(AppError::Conflict(
                "An open invitation already exists for this email".to_string(),
            ));
        }

        if let Some(user) = self.user_repo.find_by_email(&email).await? {
            if self.provider_repo.find_by_user_id(user.id).await?.is_some() {
                return Err(AppError::Conflict(
                    "User with this email is already a provider".to_string(),
                ));
            }
        }

        let invitation = self
            .invitation_repo
            .create(CreateInvitation {
                email,
                business_name: request.business_name.trim().to_string(),
                commission_rate: request.commission_rate.unwrap_or(DEFAULT_COMMISSION_RATE),
                token: generate_token(),
                invited_by: admin_id,
            })
            .await?;

        info!(
            invitation_id = %invitation.id,
            invited_by = %admin_id,
            expires_at = %invitation.expires_at,
            "Provider invitation created"
        );
        Ok(InvitationResponse::with_token(invitation))
    }

    pub async fn list_invitations(
        &self,
        query: &InvitationListQuery,
    ) -> AppResult<PaginatedResponse<InvitationResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);
        let (items, total_count) = self
            .invitation_repo
            .list(query.status_filter(), page, per_page)
            .await?;

        let items = items.into_iter().map(InvitationResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total_count))
    }

    /// 招待の受諾（招待先メールアドレスの本人のみ）
    pub async fn accept_invitation(
        &self,
        actor: &AuthenticatedUser,
        token: &str,
    ) -> AppResult<ProviderResponse> {
        let invitation = self
            .invitation_repo
            .find_by_token(token)
            .await?
            .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

        if invitation.status() != InvitationStatus::Pending {
            return Err(AppError::Conflict(format!(
                "Invitation is already {}",
                invitation.status().as_str().to_lowercase()
            )));
        }
        if invitation.is_expired() {
            warn!(invitation_id = %invitation.id, "Attempt to accept expired invitation");
            return Err(AppError::BadRequest("Invitation has expired".to_string()));
        }

        let user = self
            .user_repo
            .find_by_id(actor.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if !user.email.eq_ignore_ascii_case(&invitation.email) {
            warn!(
                user_id = %actor.user_id,
                invitation_id = %invitation.id,
                "Invitation email does not match the accepting user"
            );
            return Err(AppError::Forbidden(
                "This invitation was issued to a different email address".to_string(),
            ));
        }

        if self.provider_repo.find_by_user_id(user.id).await?.is_some() {
            return Err(AppError::Conflict(
                "Provider profile already exists for this user".to_string(),
            ));
        }

        let invitation_id = invitation.id;
        let provider = self.invitation_repo.accept(invitation, user.id).await?;

        info!(
            invitation_id = %invitation_id,
            provider_id = %provider.id,
            user_id = %user.id,
            "Provider invitation accepted"
        );
        Ok(provider.into())
    }
}
