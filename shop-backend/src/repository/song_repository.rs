// shop-backend/src/repository/song_repository.rs

use crate::domain::song_model::{self, ActiveModel as SongActiveModel, Entity as SongEntity};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct SongRepository {
    db: DbConn,
}

impl SongRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<song_model::Model>, DbErr> {
        SongEntity::find_by_id(id).one(&self.db).await
    }

    /// アルバムの収録曲をトラック番号順に取得
    pub async fn find_by_album(&self, album_id: Uuid) -> Result<Vec<song_model::Model>, DbErr> {
        SongEntity::find()
            .filter(song_model::Column::AlbumId.eq(album_id))
            .order_by(song_model::Column::TrackNumber, Order::Asc)
            .all(&self.db)
            .await
    }

    pub async fn create(
        &self,
        album_id: Uuid,
        title: String,
        track_number: i32,
        duration_seconds: Option<i32>,
    ) -> Result<song_model::Model, DbErr> {
        SongActiveModel {
            album_id: Set(album_id),
            title: Set(title),
            track_number: Set(track_number),
            duration_seconds: Set(duration_seconds),
            ..SongActiveModel::new()
        }
        .insert(&self.db)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        title: Option<String>,
        track_number: Option<i32>,
        duration_seconds: Option<i32>,
    ) -> Result<Option<song_model::Model>, DbErr> {
        let song = match SongEntity::find_by_id(id).one(&self.db).await? {
            Some(s) => s,
            None => return Ok(None),
        };

        let mut active_model: SongActiveModel = song.into();
        if let Some(title) = title {
            active_model.title = Set(title);
        }
        if let Some(track_number) = track_number {
            active_model.track_number = Set(track_number);
        }
        if duration_seconds.is_some() {
            active_model.duration_seconds = Set(duration_seconds);
        }

        if active_model.is_changed() {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(active_model.try_into_model()?))
        }
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        Ok(SongEntity::delete_by_id(id)
            .exec(&self.db)
            .await?
            .rows_affected)
    }
}
