// shop-backend/src/service/product_service.rs
use crate::api::dto::product_dto::{
    CreateProductRequest, ProductResponse, ProductSearchQuery, UpdateProductRequest,
};
use crate::domain::product_model;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::repository::album_repository::AlbumRepository;
use crate::repository::category_repository::CategoryRepository;
use crate::repository::product_repository::{ProductRepository, UpdateProduct};
use crate::repository::provider_repository::ProviderRepository;
use crate::types::pagination::normalize_page;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::convert_validation_errors;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct ProductService {
    product_repo: Arc<ProductRepository>,
    provider_repo: Arc<ProviderRepository>,
    album_repo: Arc<AlbumRepository>,
    category_repo: Arc<CategoryRepository>,
}

impl ProductService {
    pub fn new(
        product_repo: Arc<ProductRepository>,
        provider_repo: Arc<ProviderRepository>,
        album_repo: Arc<AlbumRepository>,
        category_repo: Arc<CategoryRepository>,
    ) -> Self {
        Self {
            product_repo,
            provider_repo,
            album_repo,
            category_repo,
        }
    }

    /// 公開商品一覧（販売中のみ）
    pub async fn search_products(
        &self,
        query: &ProductSearchQuery,
    ) -> AppResult<PaginatedResponse<ProductResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);
        let (items, total_count) = self
            .product_repo
            .search(
                &query.to_filter(),
                query.sort_by.unwrap_or_default(),
                query.sort_order.unwrap_or_default(),
                page,
                per_page,
            )
            .await?;

        let items = items.into_iter().map(ProductResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total_count))
    }

    /// 商品詳細
    ///
    /// 販売停止中の商品は出品者本人と管理者以外には存在しないものとして扱う。
    pub async fn get_product(
        &self,
        viewer: Option<&AuthenticatedUser>,
        id: Uuid,
    ) -> AppResult<ProductResponse> {
        let product = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if !product.is_active {
            let visible = match viewer {
                Some(user) => self.can_manage(user, &product).await?,
                None => false,
            };
            if !visible {
                return Err(AppError::NotFound("Product not found".to_string()));
            }
        }

        Ok(product.into())
    }

    /// 出品（審査済みプロバイダーのみ）
    pub async fn create_product(
        &self,
        user: &AuthenticatedUser,
        request: CreateProductRequest,
    ) -> AppResult<ProductResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "product_service::create_product"))?;

        let provider = self
            .provider_repo
            .find_by_user_id(user.user_id)
            .await?
            .ok_or_else(|| {
                AppError::Forbidden("A provider profile is required to list products".to_string())
            })?;

        if !provider.is_verified() {
            warn!(
                user_id = %user.user_id,
                provider_id = %provider.id,
                "Product creation rejected: provider not verified"
            );
            return Err(AppError::Forbidden(
                "Provider must be verified to list products".to_string(),
            ));
        }

        self.ensure_album_exists(request.album_id).await?;
        self.ensure_category_exists(request.category_id).await?;

        let product = self
            .product_repo
            .create(request.into_create(provider.id))
            .await?;

        info!(
            product_id = %product.id,
            provider_id = %provider.id,
            price_cents = product.price_cents,
            "Product created"
        );
        Ok(product.into())
    }

    pub async fn update_product(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
        request: UpdateProductRequest,
    ) -> AppResult<ProductResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "product_service::update_product"))?;

        let product = self.find_managed(user, id).await?;

        let update: UpdateProduct = request.into();
        if let Some(album_id) = update.album_id {
            self.ensure_album_exists(album_id).await?;
        }
        if let Some(category_id) = update.category_id {
            self.ensure_category_exists(category_id).await?;
        }

        let updated = self
            .product_repo
            .update(product.id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        info!(product_id = %id, user_id = %user.user_id, "Product updated");
        Ok(updated.into())
    }

    /// 論理削除（販売停止）
    pub async fn delete_product(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<()> {
        let product = self.find_managed(user, id).await?;

        self.product_repo
            .deactivate(product.id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        info!(product_id = %id, user_id = %user.user_id, "Product deactivated");
        Ok(())
    }

    /// 呼び出し元が管理できる商品を取得する
    async fn find_managed(
        &self,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> AppResult<product_model::Model> {
        let product = self
            .product_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

        if !self.can_manage(user, &product).await? {
            warn!(
                product_id = %id,
                user_id = %user.user_id,
                "Product access denied: not the owner"
            );
            return Err(AppError::Forbidden(
                "You can only manage your own products".to_string(),
            ));
        }

        Ok(product)
    }

    /// 管理者、または出品者本人か
    async fn can_manage(
        &self,
        user: &AuthenticatedUser,
        product: &product_model::Model,
    ) -> AppResult<bool> {
        if user.is_admin() {
            return Ok(true);
        }
        let provider = self.provider_repo.find_by_user_id(user.user_id).await?;
        Ok(provider.is_some_and(|p| p.id == product.provider_id))
    }

    async fn ensure_album_exists(&self, album_id: Uuid) -> AppResult<()> {
        if self.album_repo.find_by_id(album_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Album {} does not exist",
                album_id
            )));
        }
        Ok(())
    }

    async fn ensure_category_exists(&self, category_id: Uuid) -> AppResult<()> {
        if self.category_repo.find_by_id(category_id).await?.is_none() {
            return Err(AppError::BadRequest(format!(
                "Category {} does not exist",
                category_id
            )));
        }
        Ok(())
    }
}
