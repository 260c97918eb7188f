// shop-backend/src/repository/user_repository.rs

use super::query_expr::{count_of, ieq, ilike_contains, sum_when};
use crate::domain::product_model::{self, Entity as ProductEntity};
use crate::domain::provider_model::{self, Entity as ProviderEntity};
use crate::domain::user_model::{self, ActiveModel as UserActiveModel, Entity as UserEntity};
use crate::domain::user_role::UserRole;
use crate::domain::user_session_model::{self, Entity as SessionEntity};
use crate::domain::verification_status::VerificationStatus;
use crate::types::SortOrder;
use crate::types::pagination::offset_of;
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::sea_query::Expr;
use sea_orm::{
    Condition, DbConn, DbErr, FromQueryResult, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Set, TransactionTrait,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DbConn,
}

/// 管理画面のユーザー検索条件
///
/// 値が `None` の条件は適用しない。`q` は呼び出し側で正規化済み（小文字・空文字除去）の想定。
#[derive(Debug, Clone, Default)]
pub struct UserAdminFilter {
    pub q: Option<String>,
    pub role: Option<UserRole>,
    pub is_active: Option<bool>,
    pub verification_status: Option<VerificationStatus>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    #[default]
    CreatedAt,
    Username,
    Email,
    FirstName,
    LastName,
    LastLoginAt,
}

impl UserSortField {
    fn column(self) -> user_model::Column {
        match self {
            UserSortField::CreatedAt => user_model::Column::CreatedAt,
            UserSortField::Username => user_model::Column::Username,
            UserSortField::Email => user_model::Column::Email,
            UserSortField::FirstName => user_model::Column::FirstName,
            UserSortField::LastName => user_model::Column::LastName,
            UserSortField::LastLoginAt => user_model::Column::LastLoginAt,
        }
    }
}

/// ユーザー作成用構造体
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// 管理者による編集内容（正規化済み）
#[derive(Debug, Clone)]
pub struct AdminUserUpdate {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
}

/// users テーブルの集計結果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserCounts {
    pub total_users: u64,
    pub total_admins: u64,
    pub total_providers: u64,
    pub total_customers: u64,
    pub active_users: u64,
    pub inactive_users: u64,
    pub new_users_this_month: u64,
}

// SUM は行が無いと NULL になるため Option で受ける
#[derive(Debug, FromQueryResult)]
struct UserCountsRow {
    total_users: i64,
    total_admins: Option<i64>,
    total_providers: Option<i64>,
    total_customers: Option<i64>,
    active_users: Option<i64>,
    inactive_users: Option<i64>,
    new_users_this_month: Option<i64>,
}

impl UserRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    // --- 基本CRUD操作 ---

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find_by_id(id).one(&self.db).await
    }

    /// ユーザーとプロバイダー（存在すれば）を取得
    pub async fn find_with_provider(
        &self,
        id: Uuid,
    ) -> Result<Option<(user_model::Model, Option<provider_model::Model>)>, DbErr> {
        UserEntity::find_by_id(id)
            .find_also_related(ProviderEntity)
            .one(&self.db)
            .await
    }

    /// メールアドレスまたはユーザー名で検索（大文字小文字を無視）
    pub async fn find_by_email_or_username(
        &self,
        identifier: &str,
    ) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(
                Condition::any()
                    .add(ieq(user_model::Column::Email, identifier))
                    .add(ieq(user_model::Column::Username, identifier)),
            )
            .one(&self.db)
            .await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user_model::Model>, DbErr> {
        UserEntity::find()
            .filter(ieq(user_model::Column::Email, email))
            .one(&self.db)
            .await
    }

    pub async fn create(&self, create_user: CreateUser) -> Result<user_model::Model, DbErr> {
        let new_user = UserActiveModel {
            username: Set(create_user.username),
            email: Set(create_user.email),
            password_hash: Set(create_user.password_hash),
            first_name: Set(create_user.first_name),
            last_name: Set(create_user.last_name),
            phone: Set(create_user.phone),
            role: Set(create_user.role.as_str().to_string()),
            ..UserActiveModel::new()
        };

        new_user.insert(&self.db).await
    }

    /// 管理者編集を反映（全項目置き換え）
    pub async fn apply_admin_update(
        &self,
        id: Uuid,
        update: AdminUserUpdate,
    ) -> Result<Option<user_model::Model>, DbErr> {
        let user = match UserEntity::find_by_id(id).one(&self.db).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let mut active_model: UserActiveModel = user.into();
        active_model.username = Set(update.username);
        active_model.email = Set(update.email);
        active_model.first_name = Set(update.first_name);
        active_model.last_name = Set(update.last_name);
        active_model.phone = Set(update.phone);
        active_model.role = Set(update.role.as_str().to_string());

        Ok(Some(active_model.update(&self.db).await?))
    }

    /// アクティブ状態を更新
    ///
    /// 無効化する場合は同一トランザクションで全セッションも無効にする。
    pub async fn update_active_status(
        &self,
        id: Uuid,
        is_active: bool,
    ) -> Result<Option<user_model::Model>, DbErr> {
        let txn = self.db.begin().await?;

        let user = match UserEntity::find_by_id(id).one(&txn).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let mut active_model: UserActiveModel = user.into();
        active_model.is_active = Set(is_active);
        let updated = active_model.update(&txn).await?;

        if !is_active {
            SessionEntity::update_many()
                .col_expr(user_session_model::Column::IsActive, Expr::value(false))
                .filter(user_session_model::Column::UserId.eq(id))
                .exec(&txn)
                .await?;
        }

        txn.commit().await?;
        Ok(Some(updated))
    }

    /// パスワードを更新し、全セッションを無効化
    pub async fn update_password_and_revoke_sessions(
        &self,
        id: Uuid,
        password_hash: String,
    ) -> Result<Option<user_model::Model>, DbErr> {
        let txn = self.db.begin().await?;

        let user = match UserEntity::find_by_id(id).one(&txn).await? {
            Some(u) => u,
            None => return Ok(None),
        };

        let mut active_model: UserActiveModel = user.into();
        active_model.password_hash = Set(password_hash);
        let updated = active_model.update(&txn).await?;

        SessionEntity::update_many()
            .col_expr(user_session_model::Column::IsActive, Expr::value(false))
            .filter(user_session_model::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(Some(updated))
    }

    pub async fn update_last_login(&self, id: Uuid) -> Result<(), DbErr> {
        UserEntity::update_many()
            .col_expr(user_model::Column::LastLoginAt, Expr::value(Utc::now()))
            .filter(user_model::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(())
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        let result = UserEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    // --- 管理者検索 ---

    fn admin_condition(filter: &UserAdminFilter) -> Condition {
        let mut condition = Condition::all();

        if let Some(q) = filter.q.as_deref() {
            condition = condition.add(
                Condition::any()
                    .add(ilike_contains(
                        (UserEntity, user_model::Column::FirstName),
                        q,
                    ))
                    .add(ilike_contains((UserEntity, user_model::Column::LastName), q))
                    .add(ilike_contains((UserEntity, user_model::Column::Username), q))
                    .add(ilike_contains((UserEntity, user_model::Column::Email), q))
                    .add(ilike_contains(
                        (ProviderEntity, provider_model::Column::BusinessName),
                        q,
                    )),
            );
        }

        if let Some(role) = filter.role {
            condition = condition.add(user_model::Column::Role.eq(role.as_str()));
        }

        if let Some(is_active) = filter.is_active {
            condition = condition.add(user_model::Column::IsActive.eq(is_active));
        }

        if let Some(status) = filter.verification_status {
            condition =
                condition.add(provider_model::Column::VerificationStatus.eq(status.as_str()));
        }

        if let Some(from) = filter.created_from {
            condition = condition.add(user_model::Column::CreatedAt.gte(from));
        }

        if let Some(to) = filter.created_to {
            condition = condition.add(user_model::Column::CreatedAt.lte(to));
        }

        condition
    }

    /// 管理者向けのユーザー検索（プロバイダーを LEFT JOIN）
    ///
    /// 戻り値は該当ページの行と、条件に一致する総件数。
    pub async fn search_for_admin(
        &self,
        filter: &UserAdminFilter,
        sort_by: UserSortField,
        sort_order: SortOrder,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<(user_model::Model, Option<provider_model::Model>)>, u64), DbErr> {
        let base = UserEntity::find()
            .join(JoinType::LeftJoin, user_model::Relation::Provider.def())
            .filter(Self::admin_condition(filter));

        let total_count = base.clone().count(&self.db).await?;

        let offset = offset_of(page, per_page);
        let rows = base
            .select_also(ProviderEntity)
            .order_by(sort_by.column(), sort_order.to_order())
            .order_by(user_model::Column::Id, sea_orm::Order::Asc)
            .limit(per_page)
            .offset(offset)
            .all(&self.db)
            .await?;

        Ok((rows, total_count))
    }

    // --- 集計 ---

    /// users テーブルの集計を1クエリで取得
    ///
    /// `month_start` 以降（境界を含む）に作成されたユーザーを当月の新規として数える。
    pub async fn count_users(&self, month_start: DateTime<Utc>) -> Result<UserCounts, DbErr> {
        let row = UserEntity::find()
            .select_only()
            .column_as(
                Expr::col((UserEntity, user_model::Column::Id)).count(),
                "total_users",
            )
            .column_as(
                sum_when(user_model::Column::Role.eq(UserRole::Admin.as_str())),
                "total_admins",
            )
            .column_as(
                sum_when(user_model::Column::Role.eq(UserRole::Provider.as_str())),
                "total_providers",
            )
            .column_as(
                sum_when(user_model::Column::Role.eq(UserRole::Customer.as_str())),
                "total_customers",
            )
            .column_as(
                sum_when(user_model::Column::IsActive.eq(true)),
                "active_users",
            )
            .column_as(
                sum_when(user_model::Column::IsActive.eq(false)),
                "inactive_users",
            )
            .column_as(
                sum_when(user_model::Column::CreatedAt.gte(month_start)),
                "new_users_this_month",
            )
            .into_model::<UserCountsRow>()
            .one(&self.db)
            .await?;

        Ok(row.map_or_else(UserCounts::default, |r| UserCounts {
            total_users: r.total_users.max(0) as u64,
            total_admins: count_of(r.total_admins),
            total_providers: count_of(r.total_providers),
            total_customers: count_of(r.total_customers),
            active_users: count_of(r.active_users),
            inactive_users: count_of(r.inactive_users),
            new_users_this_month: count_of(r.new_users_this_month),
        }))
    }

    // --- 一意性・削除可否 ---

    /// ユーザー名が使用可能か（大文字小文字を無視、`exclude_id` は除外）
    pub async fn is_username_available(
        &self,
        username: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = UserEntity::find().filter(ieq(user_model::Column::Username, username));
        if let Some(id) = exclude_id {
            query = query.filter(user_model::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? == 0)
    }

    /// メールアドレスが使用可能か（大文字小文字を無視、`exclude_id` は除外）
    pub async fn is_email_available(
        &self,
        email: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool, DbErr> {
        let mut query = UserEntity::find().filter(ieq(user_model::Column::Email, email));
        if let Some(id) = exclude_id {
            query = query.filter(user_model::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? == 0)
    }

    /// ユーザーのプロバイダー経由で参照される商品が無ければ削除可能
    pub async fn can_be_deleted(&self, user_id: Uuid) -> Result<bool, DbErr> {
        let product_count = ProductEntity::find()
            .join(JoinType::InnerJoin, product_model::Relation::Provider.def())
            .filter(provider_model::Column::UserId.eq(user_id))
            .count(&self.db)
            .await?;
        Ok(product_count == 0)
    }

    pub async fn count_by_role(&self, role: UserRole) -> Result<u64, DbErr> {
        UserEntity::find()
            .filter(user_model::Column::Role.eq(role.as_str()))
            .count(&self.db)
            .await
    }
}
