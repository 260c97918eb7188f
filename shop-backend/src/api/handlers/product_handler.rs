// shop-backend/src/api/handlers/product_handler.rs
use crate::api::dto::product_dto::{
    CreateProductRequest, ProductResponse, ProductSearchQuery, UpdateProductRequest,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::get,
    Extension, Router,
};

/// 商品一覧（販売中のみ）
pub async fn list_products_handler(
    State(app_state): State<AppState>,
    Query(query): Query<ProductSearchQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<ProductResponse>>> {
    let products = app_state.product_service.search_products(&query).await?;
    Ok(ApiResponse::success(products))
}

/// 商品詳細（ログイン中なら販売停止中の自分の商品も参照可能）
pub async fn get_product_handler(
    State(app_state): State<AppState>,
    viewer: Option<Extension<AuthenticatedUser>>,
    ValidatedUuid(product_id): ValidatedUuid,
) -> AppResult<ApiResponse<ProductResponse>> {
    let viewer = viewer.map(|Extension(user)| user);
    let product = app_state
        .product_service
        .get_product(viewer.as_ref(), product_id)
        .await?;
    Ok(ApiResponse::success(product))
}

pub async fn create_product_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateProductRequest>,
) -> AppResult<(StatusCode, ApiResponse<ProductResponse>)> {
    let product = app_state
        .product_service
        .create_product(&user, payload)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(product)))
}

pub async fn update_product_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(product_id): ValidatedUuid,
    Json(payload): Json<UpdateProductRequest>,
) -> AppResult<ApiResponse<ProductResponse>> {
    let product = app_state
        .product_service
        .update_product(&user, product_id, payload)
        .await?;
    Ok(ApiResponse::success(product))
}

/// 販売停止（論理削除）
pub async fn delete_product_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(product_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    app_state
        .product_service
        .delete_product(&user, product_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn product_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/products",
            get(list_products_handler).post(create_product_handler),
        )
        .route(
            "/products/{id}",
            get(get_product_handler)
                .patch(update_product_handler)
                .delete(delete_product_handler),
        )
        .with_state(app_state)
}
