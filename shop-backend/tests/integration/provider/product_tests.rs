// tests/integration/provider/product_tests.rs

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{app_helper, request, test_data};

#[tokio::test]
async fn test_pending_provider_cannot_list_products() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;

    let customer = app.signup("justbuying", "justbuying@example.com").await;
    let body = json!({
        "album_id": album_id,
        "category_id": category_id,
        "name": "Blue Train (LP)",
        "price_cents": 2999,
        "stock_quantity": 5,
    });

    // プロバイダー未登録
    let (status, _) =
        request::post(&app.router, "/products", Some(&customer.token), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // 審査待ち
    request::post(
        &app.router,
        "/providers",
        Some(&customer.token),
        test_data::provider_data("Waiting Records"),
    )
    .await;
    let (status, _) = request::post(&app.router, "/products", Some(&customer.token), body).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_verified_provider_creates_product() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, provider_id) = app.verified_provider(&admin, "vinylshop").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;

    let (status, body) = request::post(
        &app.router,
        "/products",
        Some(&seller.token),
        json!({
            "album_id": album_id,
            "category_id": category_id,
            "name": "  Blue Train (Mono)  ",
            "price_cents": 3499,
            "stock_quantity": 4,
            "is_featured": true,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let product = &body["data"];
    assert_eq!(product["name"], "Blue Train (Mono)");
    assert_eq!(product["provider_id"], provider_id.to_string());
    assert_eq!(product["product_type"], "PHYSICAL");
    assert_eq!(product["stock_quantity"], 4);
    assert_eq!(product["is_active"], true);
    assert_eq!(product["is_featured"], true);
}

#[tokio::test]
async fn test_create_product_with_missing_album_is_bad_request() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, _) = app.verified_provider(&admin, "typo").await;
    let (_, category_id) = app.seed_catalog(&admin).await;

    let (status, _) = request::post(
        &app.router,
        "/products",
        Some(&seller.token),
        json!({
            "album_id": uuid::Uuid::new_v4(),
            "category_id": category_id,
            "name": "Phantom Pressing",
            "price_cents": 1000,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_product_rejects_negative_price() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, _) = app.verified_provider(&admin, "cheapskate").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;

    let (status, body) = request::post(
        &app.router,
        "/products",
        Some(&seller.token),
        json!({
            "album_id": album_id,
            "category_id": category_id,
            "name": "Free Money",
            "price_cents": -1,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["validation_errors"]["price_cents"].is_array());
}

#[tokio::test]
async fn test_only_owner_or_admin_can_update_product() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (owner, _) = app.verified_provider(&admin, "owner").await;
    let (rival, _) = app.verified_provider(&admin, "rival").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;
    let product_id = app.create_product(&owner, album_id, category_id, 2000, 2).await;
    let uri = format!("/products/{}", product_id);

    let (status, _) = request::patch(
        &app.router,
        &uri,
        Some(&rival.token),
        json!({ "price_cents": 1 }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = request::patch(
        &app.router,
        &uri,
        Some(&owner.token),
        json!({ "price_cents": 1800, "stock_quantity": 10 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["price_cents"], 1800);
    assert_eq!(body["data"]["stock_quantity"], 10);

    let (status, body) = request::patch(
        &app.router,
        &uri,
        Some(&admin.token),
        json!({ "is_featured": true }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_featured"], true);
}

#[tokio::test]
async fn test_deleted_product_is_hidden_from_public() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (owner, _) = app.verified_provider(&admin, "retiring").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;
    let product_id = app.create_product(&owner, album_id, category_id, 2000, 2).await;
    let uri = format!("/products/{}", product_id);

    let (status, _) = request::delete(&app.router, &uri, Some(&owner.token)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request::get(&app.router, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = request::get(&app.router, "/products", None).await;
    assert_eq!(list["data"]["pagination"]["total_count"], 0);

    // 出品者本人と管理者には見える
    let (status, body) = request::get(&app.router, &uri, Some(&owner.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (status, _) = request::get(&app.router, &uri, Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_product_search_filters() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, provider_id) = app.verified_provider(&admin, "filterme").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;

    for (name, price) in [("Cheap Reissue", 999), ("Deluxe Box", 9999), ("Standard LP", 2999)] {
        let (status, _) = request::post(
            &app.router,
            "/products",
            Some(&seller.token),
            json!({
                "album_id": album_id,
                "category_id": category_id,
                "name": name,
                "price_cents": price,
                "stock_quantity": 1,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = request::get(
        &app.router,
        "/products?min_price_cents=1000&max_price_cents=5000",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total_count"], 1);
    assert_eq!(body["data"]["items"][0]["name"], "Standard LP");

    let (_, body) = request::get(&app.router, "/products?q=DELUXE", None).await;
    assert_eq!(body["data"]["items"][0]["name"], "Deluxe Box");

    let (_, body) = request::get(
        &app.router,
        &format!("/products?provider_id={}&sort_by=price&sort_order=asc", provider_id),
        None,
    )
    .await;
    let prices: Vec<i64> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["price_cents"].as_i64().unwrap())
        .collect();
    assert_eq!(prices, vec![999, 2999, 9999]);
}
