// shop-backend/src/repository/user_session_repository.rs

use crate::domain::user_session_model::{
    self, ActiveModel as SessionActiveModel, Entity as SessionEntity,
};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::sea_query::Expr;
use sea_orm::{Condition, DbConn, DbErr, QueryFilter, Set};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UserSessionRepository {
    db: DbConn,
}

impl UserSessionRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        token_hash: String,
        expires_at: DateTime<Utc>,
    ) -> Result<user_session_model::Model, DbErr> {
        let session = SessionActiveModel {
            user_id: Set(user_id),
            token_hash: Set(token_hash),
            expires_at: Set(expires_at),
            ..SessionActiveModel::new()
        };

        session.insert(&self.db).await
    }

    /// 有効なセッションをトークンハッシュで検索
    pub async fn find_valid_by_token_hash(
        &self,
        token_hash: &str,
    ) -> Result<Option<user_session_model::Model>, DbErr> {
        SessionEntity::find()
            .filter(
                Condition::all()
                    .add(user_session_model::Column::TokenHash.eq(token_hash))
                    .add(user_session_model::Column::IsActive.eq(true))
                    .add(user_session_model::Column::ExpiresAt.gt(Utc::now())),
            )
            .one(&self.db)
            .await
    }

    pub async fn touch(&self, id: Uuid) -> Result<(), DbErr> {
        SessionEntity::update_many()
            .col_expr(
                user_session_model::Column::LastUsedAt,
                Expr::value(Some(Utc::now())),
            )
            .filter(user_session_model::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn deactivate(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = SessionEntity::update_many()
            .col_expr(user_session_model::Column::IsActive, Expr::value(false))
            .filter(user_session_model::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn deactivate_all_for_user(&self, user_id: Uuid) -> Result<u64, DbErr> {
        let result = SessionEntity::update_many()
            .col_expr(user_session_model::Column::IsActive, Expr::value(false))
            .filter(
                Condition::all()
                    .add(user_session_model::Column::UserId.eq(user_id))
                    .add(user_session_model::Column::IsActive.eq(true)),
            )
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    /// 期限切れ・無効化済みのセッションを物理削除
    pub async fn purge_stale(&self) -> Result<u64, DbErr> {
        let result = SessionEntity::delete_many()
            .filter(
                Condition::any()
                    .add(user_session_model::Column::IsActive.eq(false))
                    .add(user_session_model::Column::ExpiresAt.lte(Utc::now())),
            )
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }

    pub async fn count_active_for_user(&self, user_id: Uuid) -> Result<u64, DbErr> {
        use sea_orm::PaginatorTrait;

        SessionEntity::find()
            .filter(
                Condition::all()
                    .add(user_session_model::Column::UserId.eq(user_id))
                    .add(user_session_model::Column::IsActive.eq(true))
                    .add(user_session_model::Column::ExpiresAt.gt(Utc::now())),
            )
            .count(&self.db)
            .await
    }
}
