// tests/common/app_helper.rs
use axum::{http::StatusCode, Router};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde_json::{json, Value};
use shop_backend::{
    api::{app_router, AppState},
    config::app::BootstrapAdmin,
    domain::user_model,
};
use uuid::Uuid;

use crate::common::{self, db::TestDatabase, request, test_data};

pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_EMAIL: &str = "admin@example.com";

/// テスト用アプリ
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub db: DatabaseConnection,
    _database: TestDatabase,
}

/// ログイン済みユーザー
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub token: String,
}

pub async fn setup_app() -> TestApp {
    common::init_test_env();
    build_app(TestDatabase::new().await)
}

/// 環境変数に関係なく Postgres コンテナで起動（Docker が必要）
pub async fn setup_postgres_app() -> TestApp {
    common::init_test_env();
    build_app(TestDatabase::postgres().await)
}

fn build_app(database: TestDatabase) -> TestApp {
    let db = database.connection.clone();
    let state = AppState::new(db.clone(), database.config.clone()).unwrap();
    let router = app_router(state.clone());

    TestApp {
        router,
        state,
        db,
        _database: database,
    }
}

impl TestApp {
    /// 顧客として登録し、トークンを取得
    pub async fn signup(&self, username: &str, email: &str) -> TestUser {
        let (status, body) = request::post(
            &self.router,
            "/auth/signup",
            None,
            test_data::signup_data(username, email),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
        Self::test_user_from(&body)
    }

    pub async fn signin(&self, identifier: &str, password: &str) -> (StatusCode, Value) {
        request::post(
            &self.router,
            "/auth/signin",
            None,
            json!({ "identifier": identifier, "password": password }),
        )
        .await
    }

    /// 初期管理者を作成してログイン
    pub async fn admin(&self) -> TestUser {
        self.state
            .user_service
            .ensure_bootstrap_admin(&BootstrapAdmin {
                username: ADMIN_USERNAME.to_string(),
                email: ADMIN_EMAIL.to_string(),
                password: test_data::DEFAULT_PASSWORD.to_string(),
            })
            .await
            .unwrap();

        let (status, body) = self.signin(ADMIN_USERNAME, test_data::DEFAULT_PASSWORD).await;
        assert_eq!(status, StatusCode::OK, "admin signin failed: {}", body);
        Self::test_user_from(&body)
    }

    /// 審査済みプロバイダーを用意（登録 → 管理者が承認）
    pub async fn verified_provider(&self, admin: &TestUser, username: &str) -> (TestUser, Uuid) {
        let user = self
            .signup(username, &format!("{}@example.com", username))
            .await;

        let (status, body) = request::post(
            &self.router,
            "/providers",
            Some(&user.token),
            test_data::provider_data(&format!("{} Records", username)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "provider registration failed: {}", body);
        let provider_id = parse_id(&body["data"]["id"]);

        let (status, _) = request::patch(
            &self.router,
            &format!("/admin/providers/{}/verification", provider_id),
            Some(&admin.token),
            json!({ "verification_status": "VERIFIED" }),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        (user, provider_id)
    }

    /// アーティスト・カテゴリ・アルバムを作成して (album_id, category_id) を返す
    pub async fn seed_catalog(&self, admin: &TestUser) -> (Uuid, Uuid) {
        let (status, artist) = request::post(
            &self.router,
            "/artists",
            Some(&admin.token),
            json!({ "name": "John Coltrane", "country": "US" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "artist: {}", artist);
        let artist_id = parse_id(&artist["data"]["id"]);

        let (status, category) = request::post(
            &self.router,
            "/categories",
            Some(&admin.token),
            json!({ "name": "Vinyl" }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "category: {}", category);
        let category_id = parse_id(&category["data"]["id"]);

        let (status, album) = request::post(
            &self.router,
            "/albums",
            Some(&admin.token),
            json!({ "artist_id": artist_id, "title": "Blue Train", "release_year": 1957 }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "album: {}", album);
        let album_id = parse_id(&album["data"]["id"]);

        (album_id, category_id)
    }

    /// プロバイダーとして商品を出品
    pub async fn create_product(
        &self,
        provider: &TestUser,
        album_id: Uuid,
        category_id: Uuid,
        price_cents: i64,
        stock_quantity: i32,
    ) -> Uuid {
        let (status, body) = request::post(
            &self.router,
            "/products",
            Some(&provider.token),
            json!({
                "album_id": album_id,
                "category_id": category_id,
                "name": "Blue Train (LP)",
                "price_cents": price_cents,
                "stock_quantity": stock_quantity,
            }),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "product: {}", body);
        parse_id(&body["data"]["id"])
    }

    /// 登録日時を任意の値に書き換える（期間検索用）
    pub async fn set_created_at(&self, user_id: Uuid, created_at: DateTime<Utc>) {
        user_model::Entity::update_many()
            .col_expr(user_model::Column::CreatedAt, Expr::value(created_at))
            .filter(user_model::Column::Id.eq(user_id))
            .exec(&self.db)
            .await
            .unwrap();
    }

    fn test_user_from(body: &Value) -> TestUser {
        let data = &body["data"];
        TestUser {
            id: parse_id(&data["user"]["id"]),
            username: data["user"]["username"].as_str().unwrap().to_string(),
            email: data["user"]["email"].as_str().unwrap().to_string(),
            token: data["token"].as_str().unwrap().to_string(),
        }
    }
}

pub fn parse_id(value: &Value) -> Uuid {
    Uuid::parse_str(value.as_str().unwrap()).unwrap()
}
