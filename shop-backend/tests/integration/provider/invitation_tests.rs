// tests/integration/provider/invitation_tests.rs

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{app_helper, request};

async fn invite(app: &app_helper::TestApp, admin_token: &str, email: &str) -> (StatusCode, Value) {
    request::post(
        &app.router,
        "/admin/provider-invitations",
        Some(admin_token),
        json!({ "email": email, "business_name": "Invited Records", "commission_rate": 7.5 }),
    )
    .await
}

#[tokio::test]
async fn test_create_invitation_returns_token_once() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;

    let (status, body) = invite(&app, &admin.token, "Guest@Example.com").await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["data"]["email"], "guest@example.com");
    assert_eq!(body["data"]["status"], "PENDING");
    assert!(body["data"]["token"].as_str().is_some_and(|t| !t.is_empty()));

    let (status, list) =
        request::get(&app.router, "/admin/provider-invitations", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["data"]["pagination"]["total_count"], 1);
    // 一覧ではトークンを返さない
    assert!(list["data"]["items"][0].get("token").is_none());
}

#[tokio::test]
async fn test_duplicate_open_invitation_conflicts() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;

    let (status, _) = invite(&app, &admin.token, "dupe@example.com").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = invite(&app, &admin.token, "DUPE@example.com").await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_invitation_management_requires_admin() {
    let app = app_helper::setup_app().await;
    let user = app.signup("sneaky", "sneaky@example.com").await;

    let (status, _) = invite(&app, &user.token, "friend@example.com").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) =
        request::get(&app.router, "/admin/provider-invitations", Some(&user.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_accept_invitation_flow() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let (_, body) = invite(&app, &admin.token, "invitee@example.com").await;
    let token = body["data"]["token"].as_str().unwrap().to_string();
    let accept_uri = format!("/provider-invitations/{}/accept", token);

    // 招待先と異なるメールアドレスのユーザー
    let stranger = app.signup("stranger", "stranger@example.com").await;
    let (status, _) = request::post(&app.router, &accept_uri, Some(&stranger.token), json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let invitee = app.signup("invitee", "invitee@example.com").await;
    let (status, body) =
        request::post(&app.router, &accept_uri, Some(&invitee.token), json!({})).await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["verification_status"], "VERIFIED");
    assert_eq!(body["data"]["commission_rate"], 7.5);
    assert_eq!(body["data"]["business_name"], "Invited Records");

    let (_, me) = request::get(&app.router, "/auth/me", Some(&invitee.token)).await;
    assert_eq!(me["data"]["role"], "PROVIDER");

    let (status, _) =
        request::post(&app.router, &accept_uri, Some(&invitee.token), json!({})).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, list) = request::get(
        &app.router,
        "/admin/provider-invitations?status=ACCEPTED",
        Some(&admin.token),
    )
    .await;
    assert_eq!(list["data"]["pagination"]["total_count"], 1);
    assert!(!list["data"]["items"][0]["accepted_at"].is_null());
}

#[tokio::test]
async fn test_accept_unknown_invitation_returns_not_found() {
    let app = app_helper::setup_app().await;
    let user = app.signup("hopeful", "hopeful@example.com").await;

    let (status, _) = request::post(
        &app.router,
        "/provider-invitations/does-not-exist/accept",
        Some(&user.token),
        json!({}),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}
