// shop-backend/src/api/dto/order_dto.rs

use crate::domain::order_item_model;
use crate::domain::order_model;
use crate::domain::order_status::OrderStatus;
use crate::repository::order_repository::{OrderLine, SalesSummary};
use crate::utils::validation;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;
use validator::Validate;

/// 1回の注文に含められる明細数の上限
pub const MAX_ORDER_LINES: u64 = 50;

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemRequest {
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 1000, message = "Quantity must be between 1 and 1000"))]
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(
        length(min = 1, max = MAX_ORDER_LINES, message = "Order must contain 1 to 50 items"),
        nested
    )]
    pub items: Vec<OrderItemRequest>,

    #[validate(length(max = 1000))]
    pub shipping_address: Option<String>,
}

impl CreateOrderRequest {
    /// 同じ商品の明細を1行にまとめる（初出順を維持）
    pub fn merged_lines(&self) -> Vec<OrderLine> {
        let mut lines: Vec<OrderLine> = Vec::with_capacity(self.items.len());
        for item in &self.items {
            match lines.iter_mut().find(|l| l.product_id == item.product_id) {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => lines.push(OrderLine {
                    product_id: item.product_id,
                    quantity: item.quantity,
                }),
            }
        }
        lines
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl OrderListQuery {
    pub fn status_filter(&self) -> Option<OrderStatus> {
        self.status.as_deref().and_then(OrderStatus::parse)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateOrderStatusRequest {
    #[validate(custom(function = validation::validate_order_status))]
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
}

impl From<order_item_model::Model> for OrderItemResponse {
    fn from(model: order_item_model::Model) -> Self {
        let line_total_cents = model.line_total_cents();
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            unit_price_cents: model.unit_price_cents,
            line_total_cents,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub total_cents: i64,
    pub shipping_address: Option<String>,
    pub items: Vec<OrderItemResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OrderResponse {
    pub fn new(order: order_model::Model, items: Vec<order_item_model::Model>) -> Self {
        let status = order.status();
        Self {
            id: order.id,
            user_id: order.user_id,
            status,
            total_cents: order.total_cents,
            shipping_address: order.shipping_address,
            items: items.into_iter().map(Into::into).collect(),
            created_at: order.created_at,
            updated_at: order.updated_at,
        }
    }

    /// 一覧取得時の明細付与
    pub fn from_grouped(
        orders: Vec<order_model::Model>,
        mut items: HashMap<Uuid, Vec<order_item_model::Model>>,
    ) -> Vec<Self> {
        orders
            .into_iter()
            .map(|order| {
                let order_items = items.remove(&order.id).unwrap_or_default();
                Self::new(order, order_items)
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalesReportResponse {
    pub total_orders: u64,
    pub revenue_cents: i64,
    pub orders_by_status: BTreeMap<String, u64>,
}

impl From<SalesSummary> for SalesReportResponse {
    fn from(summary: SalesSummary) -> Self {
        // 件数ゼロのステータスも0として返す
        let mut orders_by_status: BTreeMap<String, u64> = OrderStatus::all()
            .into_iter()
            .map(|s| (s.as_str().to_string(), 0))
            .collect();
        orders_by_status.extend(summary.orders_by_status);

        Self {
            total_orders: summary.total_orders,
            revenue_cents: summary.revenue_cents,
            orders_by_status,
        }
    }
}
