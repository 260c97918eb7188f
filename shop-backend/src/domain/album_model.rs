// shop-backend/src/domain/album_model.rs

use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ConnectionTrait, DbErr, Set};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "albums")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub artist_id: Uuid,
    pub genre_id: Option<Uuid>,
    pub title: String,
    pub release_year: Option<i32>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::domain::artist_model::Entity",
        from = "Column::ArtistId",
        to = "crate::domain::artist_model::Column::Id",
        on_delete = "Restrict"
    )]
    Artist,

    #[sea_orm(
        belongs_to = "crate::domain::genre_model::Entity",
        from = "Column::GenreId",
        to = "crate::domain::genre_model::Column::Id",
        on_delete = "SetNull"
    )]
    Genre,

    #[sea_orm(has_many = "crate::domain::song_model::Entity")]
    Songs,

    #[sea_orm(has_many = "crate::domain::product_model::Entity")]
    Products,
}

impl Related<crate::domain::artist_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Artist.def()
    }
}

impl Related<crate::domain::genre_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Genre.def()
    }
}

impl Related<crate::domain::song_model::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Songs.def()
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
