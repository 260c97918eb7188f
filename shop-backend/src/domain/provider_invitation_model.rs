// shop-backend/src/domain/provider_invitation_model.rs

use chrono::{DateTime, Duration, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 招待の有効期間（日）
pub const INVITATION_EXPIRY_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvitationStatus {
    #[default]
    Pending,
    Accepted,
    Cancelled,
}

impl InvitationStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "PENDING" => Some(Self::Pending),
            "ACCEPTED" => Some(Self::Accepted),
            "CANCELLED" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Accepted => "ACCEPTED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for InvitationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "provider_invitations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub email: String,

    pub business_name: String,

    #[sea_orm(column_type = "Double")]
    pub commission_rate: f64,

    #[sea_orm(unique)]
    pub token: String,

    pub status: String,

    pub invited_by: Option<Uuid>,

    pub expires_at: DateTime<Utc>,

    pub accepted_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::user_model::Entity",
        from = "Column::InvitedBy",
        to = "crate::domain::user_model::Column::Id",
        on_delete = "SetNull"
    )]
    Inviter,
}

impl Related<crate::domain::user_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Inviter.def()
    }
}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Set(Uuid::new_v4()),
            status: Set(InvitationStatus::Pending.as_str().to_string()),
            expires_at: Set(now + Duration::days(INVITATION_EXPIRY_DAYS)),
            created_at: Set(now),
            ..ActiveModelTrait::default()
        }
    }
}

impl Model {
    pub fn status(&self) -> InvitationStatus {
        InvitationStatus::parse(&self.status).unwrap_or_default()
    }

    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }

    /// 受諾可能な状態か（未使用かつ期限内）
    pub fn can_be_accepted(&self) -> bool {
        self.status() == InvitationStatus::Pending && !self.is_expired()
    }
}
