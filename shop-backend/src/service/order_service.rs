// shop-backend/src/service/order_service.rs
use crate::api::dto::order_dto::{
    CreateOrderRequest, OrderListQuery, OrderResponse, SalesReportResponse,
    UpdateOrderStatusRequest,
};
use crate::domain::order_model;
use crate::domain::order_status::OrderStatus;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthenticatedUser;
use crate::repository::order_repository::{OrderRepository, PlaceOrderOutcome};
use crate::types::pagination::normalize_page;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::convert_validation_errors;
use crate::utils::validation::trim_optional;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

pub struct OrderService {
    order_repo: Arc<OrderRepository>,
}

impl OrderService {
    pub fn new(order_repo: Arc<OrderRepository>) -> Self {
        Self { order_repo }
    }

    /// 注文確定
    pub async fn place_order(
        &self,
        user_id: Uuid,
        request: CreateOrderRequest,
    ) -> AppResult<OrderResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "order_service::place_order"))?;

        let lines = request.merged_lines();
        let outcome = self
            .order_repo
            .place_order(user_id, &lines, trim_optional(request.shipping_address))
            .await?;

        match outcome {
            PlaceOrderOutcome::Placed { order, items } => {
                info!(
                    order_id = %order.id,
                    user_id = %user_id,
                    total_cents = order.total_cents,
                    item_count = items.len(),
                    "Order placed"
                );
                Ok(OrderResponse::new(order, items))
            }
            PlaceOrderOutcome::ProductUnavailable(product_id) => {
                warn!(user_id = %user_id, product_id = %product_id, "Order rejected: product unavailable");
                Err(AppError::BadRequest(format!(
                    "Product {} is not available",
                    product_id
                )))
            }
            PlaceOrderOutcome::InsufficientStock {
                product_id,
                available,
            } => {
                warn!(
                    user_id = %user_id,
                    product_id = %product_id,
                    available,
                    "Order rejected: insufficient stock"
                );
                Err(AppError::Conflict(format!(
                    "Insufficient stock for product {} ({} available)",
                    product_id, available
                )))
            }
        }
    }

    /// 自分の注文一覧
    pub async fn list_own(
        &self,
        user_id: Uuid,
        query: &OrderListQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        self.list(Some(user_id), query).await
    }

    /// 全注文一覧（管理者）
    pub async fn list_all(
        &self,
        query: &OrderListQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        self.list(None, query).await
    }

    async fn list(
        &self,
        user_id: Option<Uuid>,
        query: &OrderListQuery,
    ) -> AppResult<PaginatedResponse<OrderResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);
        let (orders, total_count) = self
            .order_repo
            .list(user_id, query.status_filter(), page, per_page)
            .await?;

        let order_ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
        let items = self.order_repo.find_items_for_orders(&order_ids).await?;

        Ok(PaginatedResponse::new(
            OrderResponse::from_grouped(orders, items),
            page,
            per_page,
            total_count,
        ))
    }

    /// 注文詳細（本人または管理者）
    pub async fn get_order(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<OrderResponse> {
        let order = self.find_order(id).await?;
        user.ensure_owner_or_admin(order.user_id)?;

        let items = self.order_repo.find_items(order.id).await?;
        Ok(OrderResponse::new(order, items))
    }

    /// 本人によるキャンセル（PENDING のみ、在庫を戻す）
    pub async fn cancel_order(&self, user: &AuthenticatedUser, id: Uuid) -> AppResult<OrderResponse> {
        let order = self.find_order(id).await?;
        if order.user_id != user.user_id {
            warn!(order_id = %id, user_id = %user.user_id, "Cancel rejected: not the order owner");
            return Err(AppError::Forbidden(
                "You can only cancel your own orders".to_string(),
            ));
        }

        if order.status() != OrderStatus::Pending {
            return Err(AppError::Conflict(
                "Only pending orders can be cancelled".to_string(),
            ));
        }

        let updated = self
            .order_repo
            .transition_status(id, OrderStatus::Pending, OrderStatus::Cancelled)
            .await?
            .ok_or_else(|| AppError::Conflict("Order status has changed".to_string()))?;

        info!(order_id = %id, user_id = %user.user_id, "Order cancelled by customer");
        let items = self.order_repo.find_items(id).await?;
        Ok(OrderResponse::new(updated, items))
    }

    /// ステータス更新（管理者）
    pub async fn update_status(
        &self,
        id: Uuid,
        request: UpdateOrderStatusRequest,
    ) -> AppResult<OrderResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "order_service::update_status"))?;

        let new_status = OrderStatus::parse(&request.status)
            .ok_or_else(|| AppError::BadRequest("Invalid order status".to_string()))?;

        let order = self.find_order(id).await?;
        let current = order.status();
        if !current.can_transition_to(new_status) {
            return Err(AppError::BadRequest(format!(
                "Cannot change order status from {} to {}",
                current.as_str(),
                new_status.as_str()
            )));
        }

        let updated = self
            .order_repo
            .transition_status(id, current, new_status)
            .await?
            .ok_or_else(|| AppError::Conflict("Order status has changed".to_string()))?;

        info!(
            order_id = %id,
            from = current.as_str(),
            to = new_status.as_str(),
            "Order status updated"
        );
        let items = self.order_repo.find_items(id).await?;
        Ok(OrderResponse::new(updated, items))
    }

    /// 売上レポート
    pub async fn sales_report(&self) -> AppResult<SalesReportResponse> {
        let summary = self.order_repo.sales_summary().await?;
        Ok(summary.into())
    }

    async fn find_order(&self, id: Uuid) -> AppResult<order_model::Model> {
        self.order_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Order not found".to_string()))
    }
}
