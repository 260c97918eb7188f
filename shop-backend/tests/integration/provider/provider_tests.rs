// tests/integration/provider/provider_tests.rs

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{app_helper, request, test_data};

#[tokio::test]
async fn test_register_provider_starts_pending_and_promotes_role() {
    let app = app_helper::setup_app().await;
    let user = app.signup("newlabel", "newlabel@example.com").await;

    let (status, body) = request::post(
        &app.router,
        "/providers",
        Some(&user.token),
        test_data::provider_data("  New Label  "),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["business_name"], "New Label");
    assert_eq!(body["data"]["verification_status"], "PENDING");
    assert_eq!(body["data"]["user_id"], user.id.to_string());
    assert!(body["data"]["verified_at"].is_null());

    let (_, me) = request::get(&app.router, "/auth/me", Some(&user.token)).await;
    assert_eq!(me["data"]["role"], "PROVIDER");
}

#[tokio::test]
async fn test_register_provider_twice_conflicts() {
    let app = app_helper::setup_app().await;
    let user = app.signup("twice", "twice@example.com").await;

    let (status, _) = request::post(
        &app.router,
        "/providers",
        Some(&user.token),
        test_data::provider_data("Once Records"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request::post(
        &app.router,
        "/providers",
        Some(&user.token),
        test_data::provider_data("Twice Records"),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");
}

#[tokio::test]
async fn test_register_provider_requires_authentication() {
    let app = app_helper::setup_app().await;

    let (status, _) = request::post(
        &app.router,
        "/providers",
        None,
        test_data::provider_data("Ghost Records"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_provider_validates_payload() {
    let app = app_helper::setup_app().await;
    let user = app.signup("sloppy", "sloppy@example.com").await;

    let (status, body) = request::post(
        &app.router,
        "/providers",
        Some(&user.token),
        json!({ "business_name": "   ", "contact_email": "not-an-email" }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["validation_errors"]["contact_email"].is_array());
}

#[tokio::test]
async fn test_own_profile_read_and_update() {
    let app = app_helper::setup_app().await;
    let user = app.signup("selfedit", "selfedit@example.com").await;

    let (status, _) = request::get(&app.router, "/providers/me", Some(&user.token)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    request::post(
        &app.router,
        "/providers",
        Some(&user.token),
        test_data::provider_data("Self Edit Records"),
    )
    .await;

    let (status, body) = request::patch(
        &app.router,
        "/providers/me",
        Some(&user.token),
        json!({ "description": "Jazz reissues", "website": "https://selfedit.example.com" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["description"], "Jazz reissues");
    assert_eq!(body["data"]["business_name"], "Self Edit Records");

    let (status, body) = request::get(&app.router, "/providers/me", Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["website"], "https://selfedit.example.com");
}

#[tokio::test]
async fn test_public_provider_lookup() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (_, provider_id) = app.verified_provider(&admin, "publiclabel").await;

    let (status, body) =
        request::get(&app.router, &format!("/providers/{}", provider_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["verification_status"], "VERIFIED");
    assert!(!body["data"]["verified_at"].is_null());

    let (status, _) = request::get(
        &app.router,
        &format!("/providers/{}", uuid::Uuid::new_v4()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_verification_and_commission() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let user = app.signup("reviewme", "reviewme@example.com").await;
    let (_, body) = request::post(
        &app.router,
        "/providers",
        Some(&user.token),
        test_data::provider_data("Review Records"),
    )
    .await;
    let provider_id = app_helper::parse_id(&body["data"]["id"]);

    // 管理者以外は審査できない
    let (status, _) = request::patch(
        &app.router,
        &format!("/admin/providers/{}/verification", provider_id),
        Some(&user.token),
        json!({ "verification_status": "VERIFIED" }),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = request::patch(
        &app.router,
        &format!("/admin/providers/{}/verification", provider_id),
        Some(&admin.token),
        json!({ "verification_status": "APPROVED" }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = request::patch(
        &app.router,
        &format!("/admin/providers/{}/commission", provider_id),
        Some(&admin.token),
        json!({ "commission_rate": 15.5 }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["commission_rate"], 15.5);

    let (status, _) = request::patch(
        &app.router,
        &format!("/admin/providers/{}/commission", provider_id),
        Some(&admin.token),
        json!({ "commission_rate": 150.0 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
