// shop-backend/src/repository/provider_invitation_repository.rs

use super::provider_repository::{insert_provider_for_user, CreateProvider};
use crate::domain::provider_invitation_model::{
    self, ActiveModel as InvitationActiveModel, Entity as InvitationEntity, InvitationStatus,
};
use crate::domain::provider_model;
use crate::domain::verification_status::VerificationStatus;
use crate::types::pagination::offset_of;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::{
    DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ProviderInvitationRepository {
    db: DbConn,
}

#[derive(Debug, Clone)]
pub struct CreateInvitation {
    pub email: String,
    pub business_name: String,
    pub commission_rate: f64,
    pub token: String,
    pub invited_by: Uuid,
}

impl ProviderInvitationRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        data: CreateInvitation,
    ) -> Result<provider_invitation_model::Model, DbErr> {
        InvitationActiveModel {
            email: Set(data.email),
            business_name: Set(data.business_name),
            commission_rate: Set(data.commission_rate),
            token: Set(data.token),
            invited_by: Set(Some(data.invited_by)),
            ..InvitationActiveModel::new()
        }
        .insert(&self.db)
        .await
    }

    pub async fn find_by_token(
        &self,
        token: &str,
    ) -> Result<Option<provider_invitation_model::Model>, DbErr> {
        InvitationEntity::find()
            .filter(provider_invitation_model::Column::Token.eq(token))
            .one(&self.db)
            .await
    }

    /// 同じメールアドレス宛の未受諾・期限内の招待があるか
    pub async fn has_open_invitation(&self, email: &str) -> Result<bool, DbErr> {
        let count = InvitationEntity::find()
            .filter(provider_invitation_model::Column::Email.eq(email))
            .filter(
                provider_invitation_model::Column::Status.eq(InvitationStatus::Pending.as_str()),
            )
            .filter(provider_invitation_model::Column::ExpiresAt.gt(Utc::now()))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn list(
        &self,
        status: Option<InvitationStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<provider_invitation_model::Model>, u64), DbErr> {
        let mut query = InvitationEntity::find();
        if let Some(status) = status {
            query = query.filter(provider_invitation_model::Column::Status.eq(status.as_str()));
        }

        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by(provider_invitation_model::Column::CreatedAt, Order::Desc)
            .limit(per_page)
            .offset(offset_of(page, per_page))
            .all(&self.db)
            .await?;

        Ok((items, total_count))
    }

    /// 招待を受諾し、検証済みプロバイダーを作成する
    ///
    /// 招待の状態更新とプロバイダー作成は同一トランザクションで行う。
    pub async fn accept(
        &self,
        invitation: provider_invitation_model::Model,
        user_id: Uuid,
    ) -> Result<provider_model::Model, DbErr> {
        let txn = self.db.begin().await?;

        let provider = insert_provider_for_user(
            &txn,
            user_id,
            CreateProvider {
                business_name: invitation.business_name.clone(),
                description: None,
                contact_email: Some(invitation.email.clone()),
                phone: None,
                website: None,
                verification_status: VerificationStatus::Verified,
                commission_rate: invitation.commission_rate,
            },
        )
        .await?;

        let mut active_model: InvitationActiveModel = invitation.into();
        active_model.status = Set(InvitationStatus::Accepted.as_str().to_string());
        active_model.accepted_at = Set(Some(Utc::now()));
        active_model.update(&txn).await?;

        txn.commit().await?;
        Ok(provider)
    }
}
