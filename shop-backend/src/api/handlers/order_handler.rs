// shop-backend/src/api/handlers/order_handler.rs
use crate::api::dto::order_dto::{
    CreateOrderRequest, OrderListQuery, OrderResponse, SalesReportResponse,
    UpdateOrderStatusRequest,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::{get, patch, post},
    Router,
};
use tracing::info;

// --- 顧客用 ---

/// 注文確定
pub async fn create_order_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<(StatusCode, ApiResponse<OrderResponse>)> {
    info!(
        user_id = %user.user_id,
        line_count = payload.items.len(),
        "Order placement attempt"
    );
    let order = app_state
        .order_service
        .place_order(user.user_id, payload)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(order)))
}

pub async fn list_own_orders_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<OrderResponse>>> {
    let orders = app_state
        .order_service
        .list_own(user.user_id, &query)
        .await?;
    Ok(ApiResponse::success(orders))
}

pub async fn get_order_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(order_id): ValidatedUuid,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = app_state.order_service.get_order(&user, order_id).await?;
    Ok(ApiResponse::success(order))
}

pub async fn cancel_order_handler(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    ValidatedUuid(order_id): ValidatedUuid,
) -> AppResult<ApiResponse<OrderResponse>> {
    let order = app_state
        .order_service
        .cancel_order(&user, order_id)
        .await?;
    Ok(ApiResponse::success(order))
}

// --- 管理者用 ---

pub async fn list_all_orders_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<OrderResponse>>> {
    admin.require_admin()?;
    let orders = app_state.order_service.list_all(&query).await?;
    Ok(ApiResponse::success(orders))
}

pub async fn update_order_status_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(order_id): ValidatedUuid,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<ApiResponse<OrderResponse>> {
    admin.require_admin()?;
    let order = app_state
        .order_service
        .update_status(order_id, payload)
        .await?;
    Ok(ApiResponse::success(order))
}

/// 売上レポート
pub async fn sales_report_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
) -> AppResult<ApiResponse<SalesReportResponse>> {
    admin.require_admin()?;
    let report = app_state.order_service.sales_report().await?;
    Ok(ApiResponse::success(report))
}

pub fn order_router(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/orders",
            get(list_own_orders_handler).post(create_order_handler),
        )
        .route("/orders/{id}", get(get_order_handler))
        .route("/orders/{id}/cancel", post(cancel_order_handler))
        .route("/admin/orders", get(list_all_orders_handler))
        .route(
            "/admin/orders/{id}/status",
            patch(update_order_status_handler),
        )
        .route("/admin/reports/sales", get(sales_report_handler))
        .with_state(app_state)
}
