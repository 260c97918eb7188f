// tests/integration/admin/user_management_tests.rs

use axum::http::StatusCode;
use serde_json::json;
use shop_backend::repository::user_repository::UserRepository;

use crate::common::{app_helper, request};

#[tokio::test]
async fn test_get_user_includes_provider_profile() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, provider_id) = app.verified_provider(&admin, "crate_digger").await;

    let (status, body) = request::get(
        &app.router,
        &format!("/admin/users/{}", seller.id),
        Some(&admin.token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "crate_digger");
    assert_eq!(body["data"]["role"], "PROVIDER");
    assert_eq!(body["data"]["provider"]["id"], provider_id.to_string());
    assert_eq!(body["data"]["provider"]["verification_status"], "VERIFIED");
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_get_unknown_user_returns_not_found() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;

    let (status, _) = request::get(
        &app.router,
        &format!("/admin/users/{}", uuid::Uuid::new_v4()),
        Some(&admin.token),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_user_normalizes_fields() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let user = app.signup("bobby", "bobby@example.com").await;

    let (status, body) = request::put(
        &app.router,
        &format!("/admin/users/{}", user.id),
        Some(&admin.token),
        json!({
            "username": " Bob123 ",
            "email": " Bob@Example.COM ",
            "first_name": " Bob ",
            "last_name": " Builder ",
            "role": "CUSTOMER",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["username"], "bob123");
    assert_eq!(body["data"]["email"], "bob@example.com");
    assert_eq!(body["data"]["first_name"], "Bob");
    assert_eq!(body["data"]["last_name"], "Builder");
}

#[tokio::test]
async fn test_update_user_rejects_taken_username() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    app.signup("taken", "taken@example.com").await;
    let user = app.signup("other", "other@example.com").await;

    let (status, body) = request::put(
        &app.router,
        &format!("/admin/users/{}", user.id),
        Some(&admin.token),
        json!({
            "username": "TAKEN",
            "email": "other@example.com",
            "first_name": "Other",
            "last_name": "User",
            "role": "CUSTOMER",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");
}

#[tokio::test]
async fn test_availability_checks_respect_exclude_id() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let user = app.signup("rosa", "rosa@example.com").await;

    let (status, body) = request::get(
        &app.router,
        "/admin/users/check-username?value=ROSA",
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["value"], "rosa");
    assert_eq!(body["data"]["available"], false);

    let (_, body) = request::get(
        &app.router,
        &format!("/admin/users/check-username?value=rosa&exclude_id={}", user.id),
        Some(&admin.token),
    )
    .await;
    assert_eq!(body["data"]["available"], true);

    let (_, body) = request::get(
        &app.router,
        "/admin/users/check-email?value=fresh%40example.com",
        Some(&admin.token),
    )
    .await;
    assert_eq!(body["data"]["available"], true);
}

#[tokio::test]
async fn test_deactivation_revokes_sessions_and_blocks_signin() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let user = app.signup("sleepy", "sleepy@example.com").await;

    let (status, body) = request::patch(
        &app.router,
        &format!("/admin/users/{}/status", user.id),
        Some(&admin.token),
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_active"], false);

    let (status, _) = request::get(&app.router, "/auth/me", Some(&user.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .signin("sleepy", crate::common::test_data::DEFAULT_PASSWORD)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_cannot_change_own_status_or_delete_self() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;

    let (status, _) = request::patch(
        &app.router,
        &format!("/admin/users/{}/status", admin.id),
        Some(&admin.token),
        json!({ "is_active": false }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request::delete(
        &app.router,
        &format!("/admin/users/{}", admin.id),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_user_blocked_while_provider_has_products() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, _) = app.verified_provider(&admin, "busyseller").await;
    let (album_id, category_id) = app.seed_catalog(&admin).await;
    app.create_product(&seller, album_id, category_id, 2500, 3).await;

    let (status, body) = request::delete(
        &app.router,
        &format!("/admin/users/{}", seller.id),
        Some(&admin.token),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");
}

#[tokio::test]
async fn test_delete_user_without_products() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let user = app.signup("leaving", "leaving@example.com").await;

    let (status, _) = request::delete(
        &app.router,
        &format!("/admin/users/{}", user.id),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = request::get(
        &app.router,
        &format!("/admin/users/{}", user.id),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_can_be_deleted_flips_once_a_product_exists() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (seller, _) = app.verified_provider(&admin, "flipper").await;
    let user_repo = UserRepository::new(app.db.clone());

    assert!(user_repo.can_be_deleted(seller.id).await.unwrap());

    let (album_id, category_id) = app.seed_catalog(&admin).await;
    app.create_product(&seller, album_id, category_id, 1000, 1).await;

    assert!(!user_repo.can_be_deleted(seller.id).await.unwrap());
}
