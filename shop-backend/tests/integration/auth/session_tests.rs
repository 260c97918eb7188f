// tests/integration/auth/session_tests.rs

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use crate::common::{app_helper, request, test_data::DEFAULT_PASSWORD};

#[tokio::test]
async fn test_me_requires_authentication() {
    let app = app_helper::setup_app().await;

    let (status, _) = request::get(&app.router, "/auth/me", None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_bearer_token() {
    let app = app_helper::setup_app().await;
    let user = app.signup("dave", "dave@example.com").await;

    let (status, body) = request::get(&app.router, "/auth/me", Some(&user.token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], user.id.to_string());
}

#[tokio::test]
async fn test_me_with_session_cookie() {
    let app = app_helper::setup_app().await;
    let user = app.signup("erin", "erin@example.com").await;

    let req = Request::builder()
        .uri("/auth/me")
        .header(header::COOKIE, format!("session_token={}", user.token))
        .body(Body::empty())
        .unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();

    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_invalid_token_is_rejected_even_on_public_routes() {
    let app = app_helper::setup_app().await;

    let (status, _) = request::get(&app.router, "/artists", Some("not-a-real-token")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signout_invalidates_only_current_session() {
    let app = app_helper::setup_app().await;
    let user = app.signup("frank", "frank@example.com").await;
    let (_, second) = app.signin("frank", DEFAULT_PASSWORD).await;
    let second_token = second["data"]["token"].as_str().unwrap().to_string();

    let (status, _) = request::post(&app.router, "/auth/signout", Some(&user.token), json!({})).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = request::get(&app.router, "/auth/me", Some(&user.token)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = request::get(&app.router, "/auth/me", Some(&second_token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_revokes_all_sessions() {
    let app = app_helper::setup_app().await;
    let user = app.signup("grace", "grace@example.com").await;
    let (_, second) = app.signin("grace", DEFAULT_PASSWORD).await;
    let second_token = second["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = request::post(
        &app.router,
        "/auth/change-password",
        Some(&user.token),
        json!({
            "current_password": DEFAULT_PASSWORD,
            "new_password": "AnotherStr0ngPass",
            "new_password_confirmation": "AnotherStr0ngPass",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);

    for token in [&user.token, &second_token] {
        let (status, _) = request::get(&app.router, "/auth/me", Some(token)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let (status, _) = app.signin("grace", DEFAULT_PASSWORD).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _) = app.signin("grace", "AnotherStr0ngPass").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_wrong_current_password() {
    let app = app_helper::setup_app().await;
    let user = app.signup("heidi", "heidi@example.com").await;

    let (status, _) = request::post(
        &app.router,
        "/auth/change-password",
        Some(&user.token),
        json!({
            "current_password": "NotMyPassw0rd",
            "new_password": "AnotherStr0ngPass",
            "new_password_confirmation": "AnotherStr0ngPass",
        }),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // 現在のセッションは有効なまま
    let (status, _) = request::get(&app.router, "/auth/me", Some(&user.token)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_change_password_confirmation_mismatch() {
    let app = app_helper::setup_app().await;
    let user = app.signup("ivan", "ivan@example.com").await;

    let (status, body) = request::post(
        &app.router,
        "/auth/change-password",
        Some(&user.token),
        json!({
            "current_password": DEFAULT_PASSWORD,
            "new_password": "AnotherStr0ngPass",
            "new_password_confirmation": "Different1Pass",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["validation_errors"]["new_password_confirmation"].is_array());
}
