// shop-backend/src/repository/category_repository.rs

use super::query_expr::{ieq, ilike_contains};
use crate::domain::category_model::{
    self, ActiveModel as CategoryActiveModel, Entity as CategoryEntity,
};
use crate::domain::product_model::{self, Entity as ProductEntity};
use crate::types::pagination::offset_of;
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DbConn,
}

impl CategoryRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<category_model::Model>, DbErr> {
        CategoryEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn search(
        &self,
        q: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<category_model::Model>, u64), DbErr> {
        let mut query = CategoryEntity::find();
        if let Some(q) = q {
            query = query.filter(ilike_contains(category_model::Column::Name, q));
        }

        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by(category_model::Column::Name, Order::Asc)
            .limit(per_page)
            .offset(offset_of(page, per_page))
            .all(&self.db)
            .await?;

        Ok((items, total_count))
    }

    pub async fn name_exists(&self, name: &str, exclude_id: Option<Uuid>) -> Result<bool, DbErr> {
        let mut query = CategoryEntity::find().filter(ieq(category_model::Column::Name, name));
        if let Some(id) = exclude_id {
            query = query.filter(category_model::Column::Id.ne(id));
        }
        Ok(query.count(&self.db).await? > 0)
    }

    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<category_model::Model, DbErr> {
        CategoryActiveModel {
            name: Set(name),
            description: Set(description),
            ..CategoryActiveModel::new()
        }
        .insert(&self.db)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        name: Option<String>,
        description: Option<String>,
    ) -> Result<Option<category_model::Model>, DbErr> {
        let category = match CategoryEntity::find_by_id(id).one(&self.db).await? {
            Some(c) => c,
            None => return Ok(None),
        };

        let mut active_model: CategoryActiveModel = category.into();
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

    pub async fn product_count(&self, id: Uuid) -> Result<u64, DbErr> {
        ProductEntity::find()
            .filter(product_model::Column::CategoryId.eq(id))
            .count(&self.db)
            .await
    }

    pub async fn delete(&self, id: Uuid) -> Result<u64, DbErr> {
        Ok(CategoryEntity::delete_by_id(id)
            .exec(&self.db)
            .await?
            .rows_affected)
    }
}
