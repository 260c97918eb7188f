// shop-backend/src/repository/artist_repository.rs

use super::query_expr::ilike_contains;
use crate::domain::album_model::{self, Entity as AlbumEntity};
use crate::domain::artist_model::{self, ActiveModel as ArtistActiveModel, Entity as ArtistEntity};
use crate::types::pagination::offset_of;
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ArtistRepository {
    db: DbConn,
}

#[derive(Debug, Clone, Default)]
pub struct ArtistData {
    pub name: Option<String>,
    pub bio: Option<String>,
    pub country: Option<String>,
}

impl ArtistRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<artist_model::Model>, DbErr> {
        ArtistEntity::find_by_id(id).one(&self.db).await
    }

    /// 名前の部分一致で検索（名前順）
    pub async fn search(
        &self,
        q: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<artist_model::Model>, u64), DbErr> {
        let mut query = ArtistEntity::find();
        if let Some(q) = q {
            query = query.filter(ilike_contains(artist_model::Column::Name, q));
        }

        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by(artist_model::Column::Name, Order::Asc)
            .limit(per_page)
            .offset(offset_of(page, per_page))
            .all(&self.db)
            .await?;

        Ok((items, total_count))
    }

    pub async fn create(
        &self,
        name: String,
        bio: Option<String>,
        country: Option<String>,
    ) -> Result<artist_model::Model, DbErr> {
        ArtistActiveModel {
            name: Set(name),
            bio: Set(bio),
            country: Set(country),
            ..ArtistActiveModel::new()
        }
        .insert(&self.db)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: ArtistData,
    ) -> Result<Option<artist_model::Model>, DbErr> {
        let artist = match ArtistEntity::find_by_id(id).one(&self.db).await? {
            Some(a) => a,
            None => return Ok(None),
        };

        let mut active_model: ArtistActiveModel = artist.into();
        let mut changed = false;

        if let Some(name) = data.name {
            active_model.name = Set(name);
            changed = true;
        }
        if data.bio.is_some() {
            active_model.bio = Set(data.bio);
            changed = true;
        }
        if data.country.is_some() {
            active_model.country = Set(data.country);
            changed = true;
        }

        if changed {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(active_model.try_into_model()?))
        }
    }

    pub async fn has_albums(&self, id: Uuid) -> Result<bool, DbErr> {
        let count = AlbumEntity::find()
            .filter(album_model::Column::ArtistId.eq(id))
            .count(&self.db)
            .await?;
        Ok(count > 0)
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        Ok(ArtistEntity::delete_by_id(id)
            .exec(&self.db)
            .await?
            .rows_affected)
    }
}
