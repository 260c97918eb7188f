// tests/integration/order/sales_report_tests.rs

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{app_helper, request};

#[tokio::test]
async fn test_empty_report_lists_every_status() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;

    let (status, body) =
        request::get(&app.router, "/admin/reports/sales", Some(&admin.token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_orders"], 0);
    assert_eq!(body["data"]["revenue_cents"], 0);
    for s in ["PENDING", "PAID", "SHIPPED", "DELIVERED", "CANCELLED"] {
        assert_eq!(body["data"]["orders_by_status"][s], 0, "missing {}", s);
    }
}

#[tokio::test]
async fn test_report_excludes_cancelled_revenue() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, _) = app.verified_provider(&admin, "reporter").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;
    let product_id = app.create_product(&seller, album_id, category_id, 1200, 10).await;
    let buyer = app.signup("regular", "regular@example.com").await;

    let mut order_ids = Vec::new();
    for quantity in [1, 2, 3] {
        let (status, body) = request::post(
            &app.router,
            "/orders",
            Some(&buyer.token),
            json!({ "items": [{ "product_id": product_id, "quantity": quantity }] }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        order_ids.push(body["data"]["id"].as_str().unwrap().to_string());
    }

    request::patch(
        &app.router,
        &format!("/admin/orders/{}/status", order_ids[0]),
        Some(&admin.token),
        json!({ "status": "PAID" }),
    )
    .await;
    request::post(
        &app.router,
        &format!("/orders/{}/cancel", order_ids[2]),
        Some(&buyer.token),
        json!({}),
    )
    .await;

    let (status, body) =
        request::get(&app.router, "/admin/reports/sales", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);

    let report = &body["data"];
    assert_eq!(report["total_orders"], 3);
    // 1200 * (1 + 2)、キャンセル分は含めない
    assert_eq!(report["revenue_cents"], 3600);
    assert_eq!(report["orders_by_status"]["PAID"], 1);
    assert_eq!(report["orders_by_status"]["PENDING"], 1);
    assert_eq!(report["orders_by_status"]["CANCELLED"], 1);
    assert_eq!(report["orders_by_status"]["SHIPPED"], 0);

    let (status, _) =
        request::get(&app.router, "/admin/reports/sales", Some(&buyer.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}
