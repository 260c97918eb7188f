// shop-backend/src/domain/product_model.rs

use super::product_type::ProductType;
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub provider_id: Uuid,

    pub album_id: Uuid,

    pub category_id: Uuid,

    pub name: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// 価格（最小通貨単位）
    pub price_cents: i64,

    pub product_type: String,

    pub is_active: bool,

    pub is_featured: bool,

    pub stock_quantity: i32,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::provider_model::Entity",
        from = "Column::ProviderId",
        to = "crate::domain::provider_model::Column::Id",
        on_delete = "Restrict"
    )]
    Provider,

    #[sea_orm(
        belongs_to = "crate::domain::album_model::Entity",
        from = "Column::AlbumId",
        to = "crate::domain::album_model::Column::Id",
        on_delete = "Restrict"
    )]
    Album,

    #[sea_orm(
        belongs_to = "crate::domain::category_model::Entity",
        from = "Column::CategoryId",
        to = "crate::domain::category_model::Column::Id",
        on_delete = "Restrict"
    )]
    Category,
}

impl Related<crate::domain::provider_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Provider.def()
    }
}

impl Related<crate::domain::album_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Album.def()
    }
}

impl Related<crate::domain::category_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            product_type: Set(ProductType::Physical.as_str().to_string()),
            is_active: Set(true),
            is_featured: Set(false),
            stock_quantity: Set(0),
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

impl Model {
    pub fn product_type(&self) -> ProductType {
        ProductType::parse(&self.product_type).unwrap_or_default()
    }

    /// 指定数量を販売できるか
    ///
    /// デジタル商品は在庫を持たない。
    pub fn can_fulfill(&self, quantity: i32) -> bool {
        if !self.is_active || quantity <= 0 {
            return false;
        }
        !self.product_type().tracks_stock() || self.stock_quantity >= quantity
    }
}
