// tests/integration/system/health_tests.rs

use axum::http::StatusCode;

use crate::common::{app_helper, request};

#[tokio::test]
async fn test_health_check_without_auth() {
    let app = app_helper::setup_app().await;

    let (status, body) = request::get(&app.router, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["environment"], "test");
}

#[tokio::test]
async fn test_unknown_route_returns_not_found() {
    let app = app_helper::setup_app().await;

    let (status, _) = request::get(&app.router, "/does-not-exist", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
