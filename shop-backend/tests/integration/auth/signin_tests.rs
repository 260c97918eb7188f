// tests/integration/auth/signin_tests.rs

use axum::http::StatusCode;

use crate::common::{app_helper, request, test_data::DEFAULT_PASSWORD};

#[tokio::test]
async fn test_signin_with_username_or_email() {
    let app = app_helper::setup_app().await;
    app.signup("alice", "alice@example.com").await;

    let (status, body) = app.signin("alice", DEFAULT_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["username"], "alice");
    assert!(body["data"]["user"]["last_login_at"].is_string());

    let (status, body) = app.signin("Alice@Example.com", DEFAULT_PASSWORD).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "alice@example.com");
}

#[tokio::test]
async fn test_signin_wrong_password_is_unauthorized() {
    let app = app_helper::setup_app().await;
    app.signup("bob", "bob@example.com").await;

    let (status, body) = app.signin("bob", "WrongPassw0rd!").await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error_type"], "unauthorized");
}

#[tokio::test]
async fn test_signin_unknown_user_is_unauthorized() {
    let app = app_helper::setup_app().await;

    let (status, _) = app.signin("nobody", DEFAULT_PASSWORD).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_signin_sets_session_cookie() {
    let app = app_helper::setup_app().await;
    app.signup("carol", "carol@example.com").await;

    let response = {
        use tower::ServiceExt;
        app.router
            .clone()
            .oneshot(request::json_request(
                "POST",
                "/auth/signin",
                None,
                Some(serde_json::json!({ "identifier": "carol", "password": DEFAULT_PASSWORD })),
            ))
            .await
            .unwrap()
    };

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(axum::http::header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(cookie.starts_with("session_token="));
    assert!(cookie.contains("HttpOnly"));
}
