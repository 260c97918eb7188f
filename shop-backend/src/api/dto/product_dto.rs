// shop-backend/src/api/dto/product_dto.rs

use crate::domain::product_model;
use crate::domain::product_type::ProductType;
use crate::repository::product_repository::{
    CreateProduct, ProductFilter, ProductSortField, UpdateProduct,
};
use crate::types::query::normalize_search_term;
use crate::types::SortOrder;
use crate::utils::validation::{self, catalog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// 商品検索クエリ（公開一覧は有効な商品のみ）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductSearchQuery {
    pub q: Option<String>,
    pub provider_id: Option<Uuid>,
    pub album_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub product_type: Option<String>,
    pub featured: Option<bool>,
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub sort_by: Option<ProductSortField>,
    pub sort_order: Option<SortOrder>,
}

impl ProductSearchQuery {
    pub fn to_filter(&self) -> ProductFilter {
        ProductFilter {
            q: normalize_search_term(self.q.as_deref()),
            provider_id: self.provider_id,
            album_id: self.album_id,
            category_id: self.category_id,
            product_type: self.product_type.as_deref().and_then(ProductType::parse),
            featured: self.featured,
            min_price_cents: self.min_price_cents,
            max_price_cents: self.max_price_cents,
            include_inactive: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateProductRequest {
    pub album_id: Uuid,
    pub category_id: Uuid,

    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub name: String,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: i64,

    #[validate(custom(function = validation::validate_product_type))]
    pub product_type: Option<String>,

    pub is_featured: Option<bool>,

    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: Option<i32>,
}

impl CreateProductRequest {
    pub fn into_create(self, provider_id: Uuid) -> CreateProduct {
        CreateProduct {
            provider_id,
            album_id: self.album_id,
            category_id: self.category_id,
            name: self.name.trim().to_string(),
            description: validation::trim_optional(self.description),
            price_cents: self.price_cents,
            product_type: self
                .product_type
                .as_deref()
                .and_then(ProductType::parse)
                .unwrap_or_default(),
            is_featured: self.is_featured.unwrap_or(false),
            stock_quantity: self.stock_quantity.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateProductRequest {
    pub album_id: Option<Uuid>,
    pub category_id: Option<Uuid>,

    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub name: Option<String>,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub description: Option<String>,

    #[validate(range(min = 0, message = "Price must not be negative"))]
    pub price_cents: Option<i64>,

    #[validate(custom(function = validation::validate_product_type))]
    pub product_type: Option<String>,

    pub is_featured: Option<bool>,
    pub is_active: Option<bool>,

    #[validate(range(min = 0, message = "Stock quantity must not be negative"))]
    pub stock_quantity: Option<i32>,
}

impl From<UpdateProductRequest> for UpdateProduct {
    fn from(req: UpdateProductRequest) -> Self {
        Self {
            album_id: req.album_id,
            category_id: req.category_id,
            name: req.name.map(|s| s.trim().to_string()),
            description: req.description,
            price_cents: req.price_cents,
            product_type: req.product_type.as_deref().and_then(ProductType::parse),
            is_featured: req.is_featured,
            is_active: req.is_active,
            stock_quantity: req.stock_quantity,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub provider_id: Uuid,
    pub album_id: Uuid,
    pub category_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: i64,
    pub product_type: ProductType,
    pub is_active: bool,
    pub is_featured: bool,
    pub stock_quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<product_model::Model> for ProductResponse {
    fn from(model: product_model::Model) -> Self {
        let product_type = model.product_type();
        Self {
            id: model.id,
            provider_id: model.provider_id,
            album_id: model.album_id,
            category_id: model.category_id,
            name: model.name,
            description: model.description,
            price_cents: model.price_cents,
            product_type,
            is_active: model.is_active,
            is_featured: model.is_featured,
            stock_quantity: model.stock_quantity,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
