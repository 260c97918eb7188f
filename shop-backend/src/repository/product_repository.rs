// shop-backend/src/repository/product_repository.rs

use super::query_expr::ilike_contains;
use crate::domain::product_model::{
    self, ActiveModel as ProductActiveModel, Entity as ProductEntity,
};
use crate::domain::product_type::ProductType;
use crate::types::SortOrder;
use crate::types::pagination::offset_of;
use sea_orm::entity::*;
use sea_orm::{
    Condition, DbConn, DbErr, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct ProductRepository {
    db: DbConn,
}

/// 商品検索条件（None は適用しない）
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub q: Option<String>,
    pub provider_id: Option<Uuid>,
    pub album_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub product_type: Option<ProductType>,
    pub featured: Option<bool>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    /// false の場合は販売中の商品のみ
    pub include_inactive: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortField {
    #[default]
    CreatedAt,
    Name,
    Price,
}

impl ProductSortField {
    fn column(self) -> product_model::Column {
        match self {
            ProductSortField::CreatedAt => product_model::Column::CreatedAt,
            ProductSortField::Name => product_model::Column::Name,
            ProductSortField::Price => product_model::Column::PriceCents,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProduct {
    pub provider_id: Uuid,
    pub album_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub product_type: ProductType,
    pub is_featured: bool,
    pub stock_quantity: i32,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProduct {
    pub album_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<i64>,
    pub product_type: Option<ProductType>,
    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,
    pub stock_quantity: Option<i32>,
}

impl ProductRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<product_model::Model>, DbErr> {
        ProductEntity::find_by_id(id).one(&self.db).await
    }

    fn condition(filter: &ProductFilter) -> Condition {
        let mut condition = Condition::all();

        if !filter.include_inactive {
            condition = condition.add(product_model::Column::IsActive.eq(true));
        }
        if let Some(q) = filter.q.as_deref() {
            condition = condition.add(
                Condition::any()
                    .add(ilike_contains(product_model::Column::Name, q))
                    .add(ilike_contains(product_model::Column::Description, q)),
            );
        }
        if let Some(provider_id) = filter.provider_id {
            condition = condition.add(product_model::Column::ProviderId.eq(provider_id));
        }
        if let Some(album_id) = filter.album_id {
            condition = condition.add(product_model::Column::AlbumId.eq(album_id));
        }
        if let Some(category_id) = filter.category_id {
            condition = condition.add(product_model::Column::CategoryId.eq(category_id));
        }
        if let Some(product_type) = filter.product_type {
            condition = condition.add(product_model::Column::ProductType.eq(product_type.as_str()));
        }
        if let Some(featured) = filter.featured {
            condition = condition.add(product_model::Column::IsFeatured.eq(featured));
        }
        if let Some(min) = filter.min_price_cents {
            condition = condition.add(product_model::Column::PriceCents.gte(min));
        }
        if let Some(max) = filter.max_price_cents {
            condition = condition.add(product_model::Column::PriceCents.lte(max));
        }

        condition
    }

    pub async fn search(
        &self,
        filter: &ProductFilter,
        sort_by: ProductSortField,
        sort_order: SortOrder,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<product_model::Model>, u64), DbErr> {
        let query = ProductEntity::find().filter(Self::condition(filter));

        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by(sort_by.column(), sort_order.to_order())
            .order_by(product_model::Column::Id, Order::Asc)
            .limit(per_page)
            .offset(offset_of(page, per_page))
            .all(&self.db)
            .await?;

        Ok((items, total_count))
    }

    pub async fn create(&self, data: CreateProduct) -> Result<product_model::Model, DbErr> {
        ProductActiveModel {
            provider_id: Set(data.provider_id),
            album_id: Set(data.album_id),
            category_id: Set(data.category_id),
            name: Set(data.name),
            description: Set(data.description),
            price_cents: Set(data.price_cents),
            product_type: Set(data.product_type.as_str().to_string()),
            is_featured: Set(data.is_featured),
            stock_quantity: Set(data.stock_quantity),
            ..ProductActiveModel::new()
        }
        .insert(&self.db)
        .await
    }

    pub async fn update(
        &self,
        id: Uuid,
        data: UpdateProduct,
    ) -> Result<Option<product_model::Model>, DbErr> {
        let product = match ProductEntity::find_by_id(id).one(&self.db).await? {
            Some(p) => p,
            None => return Ok(None),
        };

        let mut active_model: ProductActiveModel = product.into();
        if let Some(album_id) = data.album_id {
            active_model.album_id = Set(album_id);
        }
        if let Some(category_id) = data.category_id {
            active_model.category_id = Set(category_id);
        }
        if let Some(name) = data.name {
            active_model.name = Set(name);
        }
        if data.description.is_some() {
            active_model.description = Set(data.description);
        }
        if let Some(price_cents) = data.price_cents {
            active_model.price_cents = Set(price_cents);
        }
        if let Some(product_type) = data.product_type {
            active_model.product_type = Set(product_type.as_str().to_string());
        }
        if let Some(is_featured) = data.is_featured {
            active_model.is_featured = Set(is_featured);
        }
        if let Some(is_active) = data.is_active {
            active_model.is_active = Set(is_active);
        }
        if let Some(stock_quantity) = data.stock_quantity {
            active_model.stock_quantity = Set(stock_quantity);
        }

        if active_model.is_changed() {
            Ok(Some(active_model.update(&self.db).await?))
        } else {
            Ok(Some(active_model.try_into_model()?))
        }
    }

    /// 論理削除（is_active = false）
    pub async fn deactivate(&self, id: Uuid) -> Result<Option<product_model::Model>, DbErr> {
        self.update(
            id,
            UpdateProduct {
                is_active: Some(false),
                ..Default::default()
            },
        )
        .await
    }
}
