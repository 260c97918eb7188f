// shop-backend/src/repository/provider_repository.rs

use super::query_expr::{count_of, sum_when};
use crate::domain::provider_model::{
    self, ActiveModel as ProviderActiveModel, Entity as ProviderEntity,
};
use crate::domain::user_model::{self, Entity as UserEntity};
use crate::domain::user_role::UserRole;
use crate::domain::verification_status::VerificationStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ConnectionTrait, DbConn, DbErr, FromQueryResult, QueryFilter, QuerySelect, Set,
    TransactionTrait,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ProviderRepository {
    db: DbConn,
}

/// プロバイダー作成用構造体
#[derive(Debug, Clone)]
pub struct CreateProvider {
    pub business_name: String,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub verification_status: VerificationStatus,
    pub commission_rate: f64,
}

/// プロバイダー部分更新（None の項目は変更しない）
#[derive(Debug, Clone, Default)]
pub struct UpdateProvider {
    pub business_name: Option<String>,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
}

/// providers テーブルの集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderCounts {
    pub verified_providers: u64,
    pub pending_providers: u64,
    pub rejected_providers: u64,
    pub providers_verified_this_month: u64,
}

#[derive(Debug, FromQueryResult)]
struct ProviderCountsRow {
    verified_providers: Option<i64>,
    pending_providers: Option<i64>,
    rejected_providers: Option<i64>,
    providers_verified_this_month: Option<i64>,
}

/// トランザクション内外どちらからでも呼べるプロバイダー作成処理
///
/// ユーザーのロールが CUSTOMER の場合は PROVIDER に昇格させる。
pub(crate) async fn insert_provider_for_user<C>(
    conn: &C,
    user_id: Uuid,
    data: CreateProvider,
) -> Result<provider_model::Model, DbErr>
where
    C: ConnectionTrait,
{
    let verified_at = data
        .verification_status
        .is_verified()
        .then(Utc::now);

    let provider = ProviderActiveModel {
        user_id: Set(user_id),
        business_name: Set(data.business_name),
        description: Set(data.description),
        contact_email: Set(data.contact_email),
        phone: Set(data.phone),
        website: Set(data.website),
        verification_status: Set(data.verification_status.as_str().to_string()),
        commission_rate: Set(data.commission_rate),
        verified_at: Set(verified_at),
        ..ProviderActiveModel::new()
    }
    .insert(conn)
    .await?;

    UserEntity::update_many()
        .col_expr(
            user_model::Column::Role,
            Expr::value(UserRole::Provider.as_str()),
        )
        .col_expr(user_model::Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(user_model::Column::Id.eq(user_id))
        .filter(user_model::Column::Role.eq(UserRole::Customer.as_str()))
        .exec(conn)
        .await?;

    Ok(provider)
}

impl ProviderRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<provider_model::Model>, DbErr> {
        ProviderEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_by_user_id(
        &self,
        user_id: Uuid,
    ) -> Result<Option<provider_model::Model>, DbErr> {
        ProviderEntity::find()
            .filter(provider_model::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// プロバイダーを作成し、ユーザーのロールを同一トランザクションで更新
    pub async fn create_for_user(
        &self,
        user_id: Uuid,
        data: CreateProvider,
    ) -> Result<provider_model::Model, DbErr> {
        let txn = self.db.begin().await?;
        let provider = insert_provider_for_user(&txn, user_id, data).await?;
        txn.commit().await?;
        Ok(provider)
    }

    pub async fn update_profile(
        &self,
        id: Uuid,
        update: UpdateProvider,
    ) -> Result<Option<provider_model::Model>, DbErr> {
        let provider = match ProviderEntity::find_by_id(id).one(&self.db).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut active_model: ProviderActiveModel = provider.into();
        let mut changed = false;

        if let Some(business_name) = update.business_name {
            active_model.business_name = Set(business_name);
            changed = true;
        }
        if update.description.is_some() {
            active_model.description = Set(update.description);
            changed = true;
        }
        if update.contact_email.is_some() {
            active_model.contact_email = Set(update.contact_email);
            changed = true;
        }
        if update.phone.is_some() {
            active_model.phone = Set(update.phone);
            changed = true;
        }
        if update.website.is_some() {
            active_model.website = Set(update.website);
            changed = true;
        }

        if changed {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(active_model.try_into_model()?))
        }
    }

    /// 審査状態を更新（VERIFIED の場合のみ verified_at を記録）
    pub async fn update_verification_status(
        &self,
        id: Uuid,
        status: VerificationStatus,
    ) -> Result<Option<provider_model::Model>, DbErr> {
        let provider = match ProviderEntity::find_by_id(id).one(&self.db).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut active_model: ProviderActiveModel = provider.into();
        active_model.verification_status = Set(status.as_str().to_string());
        active_model.verified_at = Set(status.is_verified().then(Utc::now));

        Ok(Some(active_model.update(&self.db).await?))
    }

    pub async fn update_commission_rate(
        &self,
        id: Uuid,
        commission_rate: f64,
    ) -> Result<Option<provider_model::Model>, DbErr> {
        let provider = match ProviderEntity::find_by_id(id).one(&self.db).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut active_model: ProviderActiveModel = provider.into();
        active_model.commission_rate = Set(commission_rate);

        Ok(Some(active_model.update(&self.db).await?))
    }

    /// providers テーブルの集計を1クエリで取得
    pub async fn count_providers(
        &self,
        month_start: DateTime<Utc>,
    ) -> Result<ProviderCounts, DbErr> {
        let status = provider_model::Column::VerificationStatus;

        let row = ProviderEntity::find()
            .select_only()
            .column_as(
                sum_when(status.eq(VerificationStatus::Verified.as_str())),
                "verified_providers",
            )
            .column_as(
                sum_when(status.eq(VerificationStatus::Pending.as_str())),
                "pending_providers",
            )
            .column_as(
                sum_when(status.eq(VerificationStatus::Rejected.as_str())),
                "rejected_providers",
            )
            .column_as(
                sum_when(provider_model::Column::VerifiedAt.gte(month_start)),
                "providers_verified_this_month",
            )
            .into_model::<ProviderCountsRow>()
            .one(&self.db)
            .await?;

        Ok(row.map_or_else(ProviderCounts::default, |r| ProviderCounts {
            verified_providers: count_of(r.verified_providers),
            pending_providers: count_of(r.pending_providers),
            rejected_providers: count_of(r.rejected_providers),
            providers_verified_this_month: count_of(r.providers_verified_this_month),
        }))
    }
}
