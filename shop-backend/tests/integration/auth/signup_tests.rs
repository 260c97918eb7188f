// tests/integration/auth/signup_tests.rs

use axum::http::StatusCode;
use serde_json::json;

use crate::common::{app_helper, request, test_data};

#[tokio::test]
async fn test_signup_creates_customer_and_session() {
    let app = app_helper::setup_app().await;

    let (status, body) = request::post(
        &app.router,
        "/auth/signup",
        None,
        test_data::signup_data("  NewUser ", " NewUser@Example.com "),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["success"].as_bool().unwrap());

    let user = &body["data"]["user"];
    assert_eq!(user["username"], "newuser");
    assert_eq!(user["email"], "newuser@example.com");
    assert_eq!(user["role"], "CUSTOMER");
    assert!(user.get("password_hash").is_none());
    assert!(!body["data"]["token"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_signup_duplicate_email_is_conflict() {
    let app = app_helper::setup_app().await;
    app.signup("first", "dup@example.com").await;

    // 大文字小文字だけが異なるメールアドレスも重複扱い
    let (status, body) = request::post(
        &app.router,
        "/auth/signup",
        None,
        test_data::signup_data("second", "DUP@example.com"),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error_type"], "conflict");
}

#[tokio::test]
async fn test_signup_duplicate_username_is_conflict() {
    let app = app_helper::setup_app().await;
    app.signup("taken", "taken1@example.com").await;

    let (status, _) = request::post(
        &app.router,
        "/auth/signup",
        None,
        test_data::signup_data("TAKEN", "taken2@example.com"),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_signup_validation_errors() {
    let app = app_helper::setup_app().await;

    let (status, body) = request::post(
        &app.router,
        "/auth/signup",
        None,
        json!({
            "username": "ab",
            "email": "not-an-email",
            "password": "short",
            "first_name": "Test",
            "last_name": "User",
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = &body["validation_errors"];
    assert!(fields["username"].is_array());
    assert!(fields["email"].is_array());
    assert!(fields["password"].is_array());
}

#[tokio::test]
async fn test_signup_rejects_password_without_digit() {
    let app = app_helper::setup_app().await;

    let mut data = test_data::signup_data("weakpass", "weak@example.com");
    data["password"] = json!("OnlyLettersHere");

    let (status, _) = request::post(&app.router, "/auth/signup", None, data).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
