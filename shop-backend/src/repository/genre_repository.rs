// shop-backend/src/repository/genre_repository.rs

use super::query_expr::{ieq, ilike_contains};
use crate::domain::genre_model::{self, ActiveModel as GenreActiveModel, Entity as GenreEntity};
use crate::types::pagination::offset_of;
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct GenreRepository {
    db: DbConn,
}

impl GenreRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<genre_model::Model>, DbErr> {
        GenreEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn search(
        &self,
        q: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<genre_model::Model>, u64), DbErr> {
        let mut query = GenreEntity::find();
        if let Some(q) = q {
            query = query.filter(ilike_contains(genre_model::Column::Name, q));
        }

        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by(genre_model::Column::Name, Order::Asc)
            .limit(per_page)
            .offset(offset_of(page, per_page))
            .all(&self.db)
            .await?;

        Ok((items, total_count))
    }

    /// 同名（大文字小文字無視）のジャンルが既にあるか
    pub async fn name_exists(&self, name: &str, exclude_id: Option<Uuid>) -> Result<bool, DbErr> {
        let mut query = GenreEntity::find().filter(ieq(genre_model::Column::Name, name));
        if let Some(id) = exclude_id {
            query = query.filter(genre_model::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<genre_model::Model, DbErr> {
        GenreActiveModel {
            name: Set(name),
            description: Set(description),
            ..GenreActiveModel::new()
        }
        .insert(&self.db)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Option<genre_model::Model>, DbErr> {
        let genre = match GenreEntity::find_by_id(id).one(&self.db).await? {
            Some(g) => g,
            None => return Ok(None),
        };

        let mut active_model: GenreActiveModel = genre.into();
        if let Some(name) = name {
            active_model.name = Set(name);
        }
        if description.is_some() {
            active_model.description = Set(description);
        }

        if active_model.is_changed() {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(active_model.try_into_model()?))
        }
    }

    /// アルバムの genre_id は ON DELETE SET NULL
    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        Ok(GenreEntity::delete_by_id(id)
            .exec(&self.db)
            .await?
            .rows_affected)
    }
}
