// tests/integration/admin/user_search_tests.rs

use axum::http::StatusCode;
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};

use crate::common::{app_helper, request, test_data};

fn usernames(body: &Value) -> Vec<String> {
    body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_admin_routes_require_admin_role() {
    let app = app_helper::setup_app().await;
    let customer = app.signup("plainuser", "plain@example.com").await;

    let (status, _) = request::get(&app.router, "/admin/users", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request::get(&app.router, "/admin/users", Some(&customer.token)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error_type"], "forbidden");
}

#[tokio::test]
async fn test_search_query_is_case_insensitive_across_fields() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;

    request::post(
        &app.router,
        "/auth/signup",
        None,
        test_data::signup_data_with_name("jsmith", "js@example.com", "John", "Smith"),
    )
    .await;
    request::post(
        &app.router,
        "/auth/signup",
        None,
        test_data::signup_data_with_name("mjones", "mj@example.com", "Mary", "Jones"),
    )
    .await;

    let (status, body) =
        request::get(&app.router, "/admin/users?q=SMITH", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&body), vec!["jsmith".to_string()]);

    let (_, body) = request::get(&app.router, "/admin/users?q=MJ%40", Some(&admin.token)).await;
    assert_eq!(usernames(&body), vec!["mjones".to_string()]);

    // 空白だけの検索語は条件なしと同じ
    let (_, all) = request::get(&app.router, "/admin/users", Some(&admin.token)).await;
    let (_, blank) = request::get(&app.router, "/admin/users?q=%20%20", Some(&admin.token)).await;
    assert_eq!(
        all["data"]["pagination"]["total_count"],
        blank["data"]["pagination"]["total_count"]
    );
}

#[tokio::test]
async fn test_search_matches_provider_business_name() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let seller = app.signup("seller", "seller@example.com").await;
    request::post(
        &app.router,
        "/providers",
        Some(&seller.token),
        json!({ "business_name": "Groove Vault" }),
    )
    .await;

    let (_, body) = request::get(&app.router, "/admin/users?q=groove", Some(&admin.token)).await;

    assert_eq!(usernames(&body), vec!["seller".to_string()]);
    assert_eq!(body["data"]["items"][0]["provider"]["business_name"], "Groove Vault");
}

#[tokio::test]
async fn test_adding_filters_only_narrows_results() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    for i in 0..4 {
        app.signup(&format!("shopper{}", i), &format!("shopper{}@example.com", i))
            .await;
    }
    app.verified_provider(&admin, "labelowner").await;

    let total = |body: &Value| body["data"]["pagination"]["total_count"].as_u64().unwrap();

    let (_, base) = request::get(&app.router, "/admin/users", Some(&admin.token)).await;
    let (_, by_q) =
        request::get(&app.router, "/admin/users?q=shopper", Some(&admin.token)).await;
    let (_, by_q_role) = request::get(
        &app.router,
        "/admin/users?q=shopper&role=CUSTOMER",
        Some(&admin.token),
    )
    .await;
    let (_, by_q_role_active) = request::get(
        &app.router,
        "/admin/users?q=shopper&role=CUSTOMER&is_active=true",
        Some(&admin.token),
    )
    .await;

    assert_eq!(total(&base), 6);
    assert_eq!(total(&by_q), 4);
    assert!(total(&by_q_role) <= total(&by_q));
    assert!(total(&by_q_role_active) <= total(&by_q_role));

    let (_, providers) = request::get(
        &app.router,
        "/admin/users?role=PROVIDER&verification_status=VERIFIED",
        Some(&admin.token),
    )
    .await;
    assert_eq!(usernames(&providers), vec!["labelowner".to_string()]);
}

#[tokio::test]
async fn test_unknown_filter_values_are_ignored() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    app.signup("someone", "someone@example.com").await;

    let (status, body) = request::get(
        &app.router,
        "/admin/users?role=SUPERHERO",
        Some(&admin.token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total_count"], 2);
}

#[tokio::test]
async fn test_pagination_and_sorting() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    for name in ["zed", "amy", "kim"] {
        app.signup(name, &format!("{}@example.com", name)).await;
    }

    let (status, body) = request::get(
        &app.router,
        "/admin/users?role=CUSTOMER&sort_by=username&sort_order=asc&page=1&per_page=2",
        Some(&admin.token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&body), vec!["amy".to_string(), "kim".to_string()]);
    let pagination = &body["data"]["pagination"];
    assert_eq!(pagination["total_count"], 3);
    assert_eq!(pagination["total_pages"], 2);
    assert_eq!(pagination["has_next"], true);

    let (_, page2) = request::get(
        &app.router,
        "/admin/users?role=CUSTOMER&sort_by=username&sort_order=asc&page=2&per_page=2",
        Some(&admin.token),
    )
    .await;
    assert_eq!(usernames(&page2), vec!["zed".to_string()]);
}

#[tokio::test]
async fn test_search_treats_like_wildcards_literally() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    app.signup("ab_cd", "ab_cd@example.com").await;
    app.signup("abxcd", "abxcd@example.com").await;

    let (status, body) = request::get(&app.router, "/admin/users?q=b_c", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&body), vec!["ab_cd".to_string()]);

    // `%` も文字として扱うので誰にも一致しない
    let (status, body) = request::get(&app.router, "/admin/users?q=%25", Some(&admin.token)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["total_count"], 0);
}

#[tokio::test]
async fn test_created_date_range_is_inclusive() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    let old = app.signup("rangeold", "rangeold@example.com").await;
    let mid = app.signup("rangemid", "rangemid@example.com").await;
    let new = app.signup("rangenew", "rangenew@example.com").await;
    app.set_created_at(old.id, Utc.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap())
        .await;
    app.set_created_at(mid.id, Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap())
        .await;
    app.set_created_at(new.id, Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap())
        .await;

    let mid_at = "2025-03-15T12:00:00Z";

    // 両端が同じ時刻でも、その時刻に登録したユーザーは含まれる
    let (status, body) = request::get(
        &app.router,
        &format!("/admin/users?created_from={}&created_to={}", mid_at, mid_at),
        Some(&admin.token),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&body), vec!["rangemid".to_string()]);

    // 下限のみ
    let (_, body) = request::get(
        &app.router,
        &format!("/admin/users?q=range&created_from={}", mid_at),
        Some(&admin.token),
    )
    .await;
    assert_eq!(
        usernames(&body),
        vec!["rangenew".to_string(), "rangemid".to_string()]
    );

    // 上限のみ
    let (_, body) = request::get(
        &app.router,
        &format!("/admin/users?created_to={}", mid_at),
        Some(&admin.token),
    )
    .await;
    assert_eq!(
        usernames(&body),
        vec!["rangemid".to_string(), "rangeold".to_string()]
    );
}

#[tokio::test]
async fn test_verification_status_alone_excludes_users_without_provider() {
    let app = app_helper::setup_app().await;
    let admin = app.admin().await;
    app.signup("buyerone", "buyerone@example.com").await;
    app.signup("buyertwo", "buyertwo@example.com").await;
    app.verified_provider(&admin, "approvedlabel").await;
    let waiting = app.signup("waitinglabel", "waitinglabel@example.com").await;
    let (status, _) = request::post(
        &app.router,
        "/providers",
        Some(&waiting.token),
        test_data::provider_data("Waiting Records"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = request::get(
        &app.router,
        "/admin/users?verification_status=PENDING",
        Some(&admin.token),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(usernames(&body), vec!["waitinglabel".to_string()]);
    assert_eq!(body["data"]["items"][0]["provider"]["verification_status"], "PENDING");
}
