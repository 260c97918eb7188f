// tests/integration/order/order_tests.rs

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::app_helper::{self, TestApp, TestUser};
use crate::common::request;

/// 管理者・出品者・購入者と在庫付き商品を用意
async fn shop_with_product(price_cents: i64, stock: i32) -> (TestApp, TestUser, TestUser, Uuid) {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, _) = app.verified_provider(&admin, "recordstore").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;
    let product_id = app
        .create_product(&seller, album_id, category_id, price_cents, stock)
        .await;
    let buyer = app.signup("buyer", "buyer@example.com").await;
    (app, admin, buyer, product_id)
}

async fn stock_of(app: &TestApp, product_id: Uuid) -> i64 {
    let (_, body) = request::get(&app.router, &format!("/products/{}", product_id), None).await;
    body["data"]["stock_quantity"].as_i64().unwrap()
}

async fn place(app: &TestApp, buyer: &TestUser, items: Value) -> (StatusCode, Value) {
    request::post(
        &app.router,
        "/orders",
        Some(&buyer.token),
        json!({ "items": items, "shipping_address": "1 Jazz Street" }),
    )
    .await
}

#[tokio::test]
async fn test_place_order_computes_totals_and_reserves_stock() {
    let (app, _, buyer, product_id) = shop_with_product(2500, 5).await;

    let (status, body) = place(
        &app,
        &buyer,
        json!([
            { "product_id": product_id, "quantity": 1 },
            { "product_id": product_id, "quantity": 2 },
        ]),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let order = &body["data"];
    assert_eq!(order["status"], "PENDING");
    assert_eq!(order["user_id"], buyer.id.to_string());
    assert_eq!(order["total_cents"], 7500);
    assert_eq!(order["shipping_address"], "1 Jazz Street");

    // 同一商品の明細はまとめられる
    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[0]["unit_price_cents"], 2500);
    assert_eq!(items[0]["line_total_cents"], 7500);

    assert_eq!(stock_of(&app, product_id).await, 2);
}

#[tokio::test]
async fn test_insufficient_stock_leaves_stock_untouched() {
    let (app, _, buyer, product_id) = shop_with_product(2500, 2).await;

    let (status, body) = place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 3 }])).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");
    assert_eq!(stock_of(&app, product_id).await, 2);

    let (_, orders) = request::get(&app.router, "/orders", Some(&buyer.token)).await;
    assert_eq!(orders["data"]["pagination"]["total_count"], 0);
}

#[tokio::test]
async fn test_order_for_unavailable_product_is_rejected() {
    let (app, admin, buyer, product_id) = shop_with_product(2500, 2).await;

    request::delete(
        &app.router,
        &format!("/products/{}", product_id),
        Some(&admin.token),
    )
    .await;

    let (status, _) = place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 1 }])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = place(&app, &buyer, json!([{ "product_id": Uuid::new_v4(), "quantity": 1 }])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_validation() {
    let (app, _, buyer, product_id) = shop_with_product(2500, 2).await;

    let (status, _) = place(&app, &buyer, json!([])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 0 }])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request::post(
        &app.router,
        "/orders",
        None,
        json!({ "items": [{ "product_id": product_id, "quantity": 1 }] }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cancel_restores_stock() {
    let (app, _, buyer, product_id) = shop_with_product(1000, 4).await;
    let (_, body) = place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 3 }])).await;
    let cancel_uri = format!("/orders/{}/cancel", body["data"]["id"].as_str().unwrap());
    assert_eq!(stock_of(&app, product_id).await, 1);

    let (status, body) = request::post(&app.router, &cancel_uri, Some(&buyer.token), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "CANCELLED");
    assert_eq!(stock_of(&app, product_id).await, 4);

    // 二重キャンセルで在庫が増えない
    let (status, _) = request::post(&app.router, &cancel_uri, Some(&buyer.token), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(stock_of(&app, product_id).await, 4);
}

#[tokio::test]
async fn test_orders_are_private_to_their_owner() {
    let (app, admin, buyer, product_id) = shop_with_product(1000, 4).await;
    let (_, body) = place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 1 }])).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let other = app.signup("nosy", "nosy@example.com").await;

    let (status, _) =
        request::get(&app.router, &format!("/orders/{}", order_id), Some(&other.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request::post(
        &app.router,
        &format!("/orders/{}/cancel", order_id),
        Some(&other.token),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        request::get(&app.router, &format!("/orders/{}", order_id), Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, own) = request::get(&app.router, "/orders", Some(&other.token)).await;
    assert_eq!(own["data"]["pagination"]["total_count"], 0);

    let (_, own) = request::get(&app.router, "/orders", Some(&buyer.token)).await;
    assert_eq!(own["data"]["pagination"]["total_count"], 1);
    assert_eq!(own["data"]["items"][0]["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_admin_status_transitions() {
    let (app, admin, buyer, product_id) = shop_with_product(1000, 4).await;
    let (_, body) = place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 1 }])).await;
    let order_id = body["data"]["id"].as_str().unwrap().to_string();
    let status_uri = format!("/admin/orders/{}/status", order_id);

    // PENDING から SHIPPED へは飛ばせない
    let (status, _) =
        request::patch(&app.router, &status_uri, Some(&admin.token), json!({ "status": "SHIPPED" }))
            .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    for next in ["PAID", "SHIPPED", "DELIVERED"] {
        let (status, body) =
            request::patch(&app.router, &status_uri, Some(&admin.token), json!({ "status": next }))
                .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        assert_eq!(body["data"]["status"], next);
    }

    let (status, _) = request::patch(
        &app.router,
        &status_uri,
        Some(&admin.token),
        json!({ "status": "CANCELLED" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // 購入者はステータスを変更できない
    let (status, _) =
        request::patch(&app.router, &status_uri, Some(&buyer.token), json!({ "status": "PAID" }))
            .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 発送済みの注文は購入者がキャンセルできない
    let (status, _) = request::post(
        &app.router,
        &format!("/orders/{}/cancel", order_id),
        Some(&buyer.token),
        json!({}),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_cancel_of_paid_order_restores_stock() {
    let (app, admin, buyer, product_id) = shop_with_product(1000, 4).await;
    let (_, body) = place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 2 }])).await;
    let status_uri = format!("/admin/orders/{}/status", body["data"]["id"].as_str().unwrap());

    request::patch(&app.router, &status_uri, Some(&admin.token), json!({ "status": "PAID" })).await;
    let (status, _) = request::patch(
        &app.router,
        &status_uri,
        Some(&admin.token),
        json!({ "status": "CANCELLED" }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&app, product_id).await, 4);
}

#[tokio::test]
async fn test_admin_order_list_filters_by_status() {
    let (app, admin, buyer, product_id) = shop_with_product(1000, 10).await;
    for _ in 0..3 {
        place(&app, &buyer, json!([{ "product_id": product_id, "quantity": 1 }])).await;
    }
    let (_, own) = request::get(&app.router, "/orders", Some(&buyer.token)).await;
    let first = own["data"]["items"][0]["id"].as_str().unwrap().to_string();
    request::patch(
        &app.router,
        &format!("/admin/orders/{}/status", first),
        Some(&admin.token),
        json!({ "status": "PAID" }),
    )
    .await;

    let (status, all) = request::get(&app.router, "/admin/orders", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["data"]["pagination"]["total_count"], 3);

    let (_, paid) = request::get(&app.router, "/admin/orders?status=PAID", Some(&admin.token)).await;
    assert_eq!(paid["data"]["pagination"]["total_count"], 1);
    assert_eq!(paid["data"]["items"][0]["id"], first);

    let (status, _) = request::get(&app.router, "/admin/orders", Some(&buyer.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
