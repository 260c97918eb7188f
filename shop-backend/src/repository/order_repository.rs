// shop-backend/src/repository/order_repository.rs

use crate::domain::order_item_model::{
    self, ActiveModel as OrderItemActiveModel, Entity as OrderItemEntity,
};
use crate::domain::order_model::{self, ActiveModel as OrderActiveModel, Entity as OrderEntity};
use crate::domain::order_status::OrderStatus;
use crate::domain::product_model::{self, Entity as ProductEntity};
use crate::types::pagination::offset_of;
use chrono::Utc;
use sea_orm::entity::*;
use sea_orm::sea_query::{Alias, Expr, Func};
use sea_orm::{
    Condition, ConnectionTrait, DbConn, DbErr, FromQueryResult, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct OrderRepository {
    db: DbConn,
}

/// 注文明細の入力（商品IDは重複なしの想定）
#[derive(Debug, Clone, Copy)]
pub struct OrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// 注文確定処理の結果
///
/// 在庫不足などの業務エラーはロールバックした上でここに載せて返す。
#[derive(Debug)]
pub enum PlaceOrderOutcome {
    Placed {
        order: order_model::Model,
        items: Vec<order_item_model::Model>,
    },
    ProductUnavailable(Uuid),
    InsufficientStock { product_id: Uuid, available: i32 },
}

/// 売上集計
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesSummary {
    pub total_orders: u64,
    pub revenue_cents: i64,
    pub orders_by_status: HashMap<String, u64>,
}

#[derive(Debug, FromQueryResult)]
struct RevenueRow {
    total_orders: i64,
    revenue_cents: Option<i64>,
}

#[derive(Debug, FromQueryResult)]
struct StatusCountRow {
    status: String,
    order_count: i64,
}

// 在庫を戻す（在庫管理対象の商品のみ）
async fn restock_items<C>(conn: &C, order_id: Uuid) -> Result<(), DbErr>
where
    C: ConnectionTrait,
{
    let items = OrderItemEntity::find()
        .filter(order_item_model::Column::OrderId.eq(order_id))
        .find_also_related(ProductEntity)
        .all(conn)
        .await?;

    for (item, product) in items {
        let tracks_stock = product.is_some_and(|p| p.product_type().tracks_stock());
        if !tracks_stock {
            continue;
        }
        ProductEntity::update_many()
            .col_expr(
                product_model::Column::StockQuantity,
                Expr::col(product_model::Column::StockQuantity).add(item.quantity),
            )
            .col_expr(product_model::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product_model::Column::Id.eq(item.product_id))
            .exec(conn)
            .await?;
    }

    Ok(())
}

impl OrderRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<order_model::Model>, DbErr> {
        OrderEntity::find_by_id(id).one(&self.db).await
    }

    pub async fn find_items(&self, order_id: Uuid) -> Result<Vec<order_item_model::Model>, DbErr> {
        OrderItemEntity::find()
            .filter(order_item_model::Column::OrderId.eq(order_id))
            .all(&self.db)
            .await
    }

    /// 複数注文の明細をまとめて取得し、注文IDごとに分ける
    pub async fn find_items_for_orders(
        &self,
        order_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<order_item_model::Model>>, DbErr> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let items = OrderItemEntity::find()
            .filter(order_item_model::Column::OrderId.is_in(order_ids.iter().copied()))
            .all(&self.db)
            .await?;

        let mut grouped: HashMap<Uuid, Vec<order_item_model::Model>> = HashMap::new();
        for item in items {
            grouped.entry(item.order_id).or_default().push(item);
        }
        Ok(grouped)
    }

    /// 注文一覧（`user_id` が None の場合は全ユーザー）
    pub async fn list(
        &self,
        user_id: Option<Uuid>,
        status: Option<OrderStatus>,
        page: u64,
        per_page: u64,
    ) -> Result<(Vec<order_model::Model>, u64), DbErr> {
        let mut condition = Condition::all();
        if let Some(user_id) = user_id {
            condition = condition.add(order_model::Column::UserId.eq(user_id));
        }
        if let Some(status) = status {
            condition = condition.add(order_model::Column::Status.eq(status.as_str()));
        }

        let query = OrderEntity::find().filter(condition);
        let total_count = query.clone().count(&self.db).await?;
        let items = query
            .order_by(order_model::Column::CreatedAt, Order::Desc)
            .order_by(order_model::Column::Id, Order::Asc)
            .limit(per_page)
            .offset(offset_of(page, per_page))
            .all(&self.db)
            .await?;

        Ok((items, total_count))
    }

    /// 注文を確定する
    ///
    /// 在庫確認・在庫引当・価格スナップショット・合計計算を1トランザクションで行う。
    pub async fn place_order(
        &self,
        user_id: Uuid,
        lines: &[OrderLine],
        shipping_address: Option<String>,
    ) -> Result<PlaceOrderOutcome, DbErr> {
        let txn = self.db.begin().await?;

        let mut priced_lines = Vec::with_capacity(lines.len());
        let mut total_cents: i64 = 0;

        for line in lines {
            let product = match ProductEntity::find_by_id(line.product_id).one(&txn).await? {
                Some(p) if p.is_active => p,
                _ => return Ok(PlaceOrderOutcome::ProductUnavailable(line.product_id)),
            };

            if product.product_type().tracks_stock() {
                // 在庫が足りる場合のみ減算する条件付き更新
                let result = ProductEntity::update_many()
                    .col_expr(
                        product_model::Column::StockQuantity,
                        Expr::col(product_model::Column::StockQuantity).sub(line.quantity),
                    )
                    .col_expr(product_model::Column::UpdatedAt, Expr::value(Utc::now()))
                    .filter(product_model::Column::Id.eq(product.id))
                    .filter(product_model::Column::StockQuantity.gte(line.quantity))
                    .exec(&txn)
                    .await?;

                if result.rows_affected == 0 {
                    return Ok(PlaceOrderOutcome::InsufficientStock {
                        product_id: product.id,
                        available: product.stock_quantity,
                    });
                }
            }

            total_cents += product.price_cents * i64::from(line.quantity);
            priced_lines.push((product.id, line.quantity, product.price_cents));
        }

        let order = OrderActiveModel {
            user_id: Set(user_id),
            total_cents: Set(total_cents),
            shipping_address: Set(shipping_address),
            ..OrderActiveModel::new()
        }
        .insert(&txn)
        .await?;

        let mut items = Vec::with_capacity(priced_lines.len());
        for (product_id, quantity, unit_price_cents) in priced_lines {
            let item = OrderItemActiveModel {
                order_id: Set(order.id),
                product_id: Set(product_id),
                quantity: Set(quantity),
                unit_price_cents: Set(unit_price_cents),
                ..OrderItemActiveModel::new()
            }
            .insert(&txn)
            .await?;
            items.push(item);
        }

        txn.commit().await?;
        Ok(PlaceOrderOutcome::Placed { order, items })
    }

    /// ステータスを更新する（CANCELLED への遷移では在庫を戻す）
    ///
    /// 遷移可否は呼び出し側で検証済みの想定。`expected` と現在値が異なる場合は None を返す。
    pub async fn transition_status(
        &self,
        order_id: Uuid,
        expected: OrderStatus,
        new_status: OrderStatus,
    ) -> Result<Option<order_model::Model>, DbErr> {
        let txn = self.db.begin().await?;

        let order = match OrderEntity::find_by_id(order_id).one(&txn).await? {
            Some(o) if o.status() == expected => o,
            _ => return Ok(None),
        };

        let mut active_model: OrderActiveModel = order.into();
        active_model.status = Set(new_status.as_str().to_string());
        let updated = active_model.update(&txn).await?;

        if new_status == OrderStatus::Cancelled {
            restock_items(&txn, order_id).await?;
        }

        txn.commit().await?;
        Ok(Some(updated))
    }

    /// 売上集計（キャンセル済みは売上に含めない）
    pub async fn sales_summary(&self) -> Result<SalesSummary, DbErr> {
        let revenue_expr = Expr::expr(Func::sum(
            Expr::case(
                order_model::Column::Status.ne(OrderStatus::Cancelled.as_str()),
                Expr::col(order_model::Column::TotalCents),
            )
            .finally(0),
        ))
        .cast_as(Alias::new("bigint"));

        let revenue = OrderEntity::find()
            .select_only()
            .column_as(
                Expr::col((OrderEntity, order_model::Column::Id)).count(),
                "total_orders",
            )
            .column_as(revenue_expr, "revenue_cents")
            .into_model::<RevenueRow>()
            .one(&self.db)
            .await?;

        let by_status = OrderEntity::find()
            .select_only()
            .column(order_model::Column::Status)
            .column_as(
                Expr::col((OrderEntity, order_model::Column::Id)).count(),
                "order_count",
            )
            .group_by(order_model::Column::Status)
            .into_model::<StatusCountRow>()
            .all(&self.db)
            .await?;

        let (total_orders, revenue_cents) = revenue
            .map(|r| (r.total_orders.max(0) as u64, r.revenue_cents.unwrap_or(0)))
            .unwrap_or((0, 0));

        Ok(SalesSummary {
            total_orders,
            revenue_cents,
            orders_by_status: by_status
                .into_iter()
                .map(|row| (row.status, row.order_count.max(0) as u64))
                .collect(),
        })
    }
}
