// shop-backend/src/repository/album_repository.rs

use super::query_expr::ilike_contains;
use crate::domain::album_model::{self, ActiveModel as AlbumActiveModel, Entity as AlbumEntity};
use crate::domain::product_model::{self, Entity as ProductEntity};
use crate::types::pagination::offset_of;
use sea_orm::entity::*;
use sea_orm::{
    Condition, DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct AlbumRepository {
    db: DbConn,
}

#[derive(Debug, Clone, Default)]
pub struct AlbumFilter {
    pub q: Option<String>,
    pub artist_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub struct CreateAlbum {
    pub artist_id: Uuid,
    pub genre_id: Option<Uuid>,
    pub title: String,
    pub release_year: Option<i32>,
    pub cover_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateAlbum {
    pub artist_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
    pub title: Option<String>,
    pub release_year: Option<i32>,
    pub cover_url: Option<String>,
}

impl AlbumRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<album_model::Model>, DbErr> {
        AlbumEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn search(
        &self,
        filter: &AlbumFilter,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<album_model::Model>, u64), DbErr> {
        let mut condition = Condition::all();
        if let Some(q) = filter.q.as_deref() {
            condition = condition.add(ilike_contains(album_model::Column::Title, q));
        }
        if let Some(artist_id) = filter.artist_id {
            condition = condition.add(album_model::Column::ArtistId.eq(artist_id));
        }
        if let Some(genre_id) = filter.genre_id {
            condition = condition.add(album_model::Column::GenreId.eq(genre_id));
        }

        let query = AlbumEntity::find().filter(condition);
        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by(album_model::Column::ReleaseYear, Order::Desc)
            .order_by(album_model::Column::Title, Order::Asc)
            .limit(per_page)
            .offset(offset_of(page, per_page))
            .all(&self.db)
            .await?;

        Ok((items, total_count))
    }

    pub async fn create(&self, data: CreateAlbum) -> Result<album_model::Model, DbErr> {
        AlbumActiveModel {
            artist_id: Set(data.artist_id),
            genre_id: Set(data.genre_id),
            title: Set(data.title),
            release_year: Set(data.release_year),
            cover_url: Set(data.cover_url),
            ..AlbumActiveModel::new()
        }
        .insert(&self.db)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: UpdateAlbum,
    ) -> Result<Option<album_model::Model>, DbErr> {
        let album = match AlbumEntity::find_by_id(id).one(&self.db).await? {
            Some(a) => a,
            None => return Ok(None),
        };

        let mut active_model: AlbumActiveModel = album.into();
        if let Some(artist_id) = data.artist_id {
            active_model.artist_id = Set(artist_id);
        }
        if data.genre_id.is_some() {
            active_model.genre_id = Set(data.genre_id);
        }
        if let Some(title) = data.title {
            active_model.title = Set(title);
        }
        if data.release_year.is_some() {
            active_model.release_year = Set(data.release_year);
        }
        if data.cover_url.is_some() {
            active_model.cover_url = Set(data.cover_url);
        }

        if active_model.is_changed() {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(active_model.try_into_model()?))
        }
    }

    pub async fn product_count(&self, id: Uuid) -> Result<u64, DbErr> {
        ProductEntity::find()
            .filter(product_model::Column::AlbumId.eq(id))
            .count(&self.db)
            .await
    }

    /// 収録曲は ON DELETE CASCADE で削除される
    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        Ok(AlbumEntity::delete_by_id(id)
            .exec(&self.db)
            .await?
            .rows_affected)
    }
}
