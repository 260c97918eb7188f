// tests/integration/admin/user_stats_tests.rs

use axum::http::StatusCode;
use serde_json::{json, Value};

use crate::common::{app_helper, request};

fn count(stats: &Value, key: &str) -> u64 {
    stats["data"][key]
        .as_u64()
        .unwrap_or_else(|| panic!("missing {} in {}", key, stats))
}

#[tokio::test]
async fn test_stats_require_admin() {
    let app = app_helper::setup_app().await;
    let user = app.signup("curious", "curious@example.com").await;

    let (status, _) = request::get(&app.router, "/admin/users/stats", Some(&user.token)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_stats_totals_are_consistent() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    app.signup("first", "first@example.com").await;
    app.signup("second", "second@example.com").await;
    let third = app.signup("third", "third@example.com").await;

    request::patch(
        &app.router,
        &format!("/admin/users/{}/status", third.id),
        Some(&admin.token),
        json!({ "is_active": false }),
    )
    .await;

    let (status, stats) =
        request::get(&app.router, "/admin/users/stats", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);

    assert_eq!(count(&stats, "total_users"), 4);
    assert_eq!(count(&stats, "total_admins"), 1);
    assert_eq!(count(&stats, "total_customers"), 3);
    assert_eq!(count(&stats, "inactive_users"), 1);
    assert_eq!(
        count(&stats, "total_admins")
            + count(&stats, "total_providers")
            + count(&stats, "total_customers"),
        count(&stats, "total_users")
    );
    assert_eq!(
        count(&stats, "active_users") + count(&stats, "inactive_users"),
        count(&stats, "total_users")
    );
    // 全員このテスト中に作成されている
    assert_eq!(count(&stats, "new_users_this_month"), 4);
}

#[tokio::test]
async fn test_stats_count_providers_by_verification_status() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    app.verified_provider(&admin, "verifiedlabel").await;

    let pending = app.signup("pendinglabel", "pendinglabel@example.com").await;
    request::post(
        &app.router,
        "/providers",
        Some(&pending.token),
        json!({ "business_name": "Pending Records" }),
    )
    .await;

    let rejected = app.signup("rejectedlabel", "rejectedlabel@example.com").await;
    let (_, body) = request::post(
        &app.router,
        "/providers",
        Some(&rejected.token),
        json!({ "business_name": "Rejected Records" }),
    )
    .await;
    let rejected_id = app_helper::parse_id(&body["data"]["id"]);
    request::patch(
        &app.router,
        &format!("/admin/providers/{}/verification", rejected_id),
        Some(&admin.token),
        json!({ "verification_status": "REJECTED" }),
    )
    .await;

    let (_, stats) = request::get(&app.router, "/admin/users/stats", Some(&admin.token)).await;

    assert_eq!(count(&stats, "total_providers"), 3);
    assert_eq!(count(&stats, "verified_providers"), 1);
    assert_eq!(count(&stats, "pending_providers"), 1);
    assert_eq!(count(&stats, "rejected_providers"), 1);
    assert_eq!(count(&stats, "providers_verified_this_month"), 1);
}

#[tokio::test]
async fn test_stats_for_three_seeded_users() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    app.signup("active_customer", "active_customer@example.com").await;
    let dormant = app.signup("dormant_customer", "dormant_customer@example.com").await;
    request::patch(
        &app.router,
        &format!("/admin/users/{}/status", dormant.id),
        Some(&admin.token),
        json!({ "is_active": false }),
    )
    .await;

    let (_, stats) = request::get(&app.router, "/admin/users/stats", Some(&admin.token)).await;

    assert_eq!(count(&stats, "total_users"), 3);
    assert_eq!(count(&stats, "total_admins"), 1);
    assert_eq!(count(&stats, "total_customers"), 2);
    assert_eq!(count(&stats, "total_providers"), 0);
    assert_eq!(count(&stats, "active_users"), 2);
    assert_eq!(count(&stats, "inactive_users"), 1);
    assert_eq!(count(&stats, "verified_providers"), 0);
}
