// shop-backend/src/domain/provider_model.rs

use super::verification_status::VerificationStatus;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "providers")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub user_id: Uuid,

    pub business_name: String,

    pub description: Option<String>,

    pub contact_email: Option<String>,

    pub phone: Option<String>,

    pub website: Option<String>,

    pub verification_status: String,

    /// 手数料率（パーセント, 0〜100）
    #[sea_orm(column_type = "Double")]
    pub commission_rate: f64,

    pub verified_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::UserId",
        to = "crate::domain::user_model::Column::Id",
        on_delete = "Cascade"
    )]
    User,

    #[sea_orm(has_many = "crate::domain::product_model::Entity")]
    Products,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<crate::domain::product_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            verification_status: Set(VerificationStatus::Pending.as_str().to_string()),
            commission_rate: Set(DEFAULT_COMMISSION_RATE),
            created_at: Set(Utc::now()),
            updated_at: Set(Utc::now()),
            ..ActiveModelTrait::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        if !insert {
            self.updated_at = Set(Utc::now());
        }
        Ok(self)
    }
}

pub const DEFAULT_COMMISSION_RATE: f64 = 10.0;

impl Model {
    pub fn verification_status(&self) -> VerificationStatus {
        VerificationStatus::parse(&self.verification_status).unwrap_or_default()
    }

    pub fn is_verified(&self) -> bool {
        self.verification_status().is_verified()
    }
}
