// shop-backend/src/config/app.rs

use std::env;

#[derive(Clone, Debug)]
pub struct SecurityConfig {
    pub cookie_secure: bool,
    /// セッショントークンの有効期間（時間）
    pub session_ttl_hours: i64,
}

#[derive(Clone, Debug)]
pub struct BootstrapAdmin {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    pub database_url: String,
    pub db_max_connections: u32,
    pub security: SecurityConfig,
    pub bootstrap_admin: Option<BootstrapAdmin>,
}

const DEFAULT_SESSION_TTL_HOURS: i64 = 24;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 20;

impl AppConfig {
    pub fn from_env() -> Result<Self, String> {
        dotenvy::dotenv().ok(); // .env ファイルは無くてもよい

        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        let is_production = environment == "production";

        Ok(Self {
            environment,
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()
                .map_err(|_| "Invalid PORT value")?,
            cors_allowed_origins: parse_origins(
                &env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3001".to_string()),
            ),
            database_url: env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?,
            db_max_connections: match env::var("DB_MAX_CONNECTIONS") {
                Ok(v) => v.parse().map_err(|_| "Invalid DB_MAX_CONNECTIONS value")?,
                Err(_) => DEFAULT_DB_MAX_CONNECTIONS,
            },
            security: SecurityConfig {
                cookie_secure: is_production,
                session_ttl_hours: match env::var("SESSION_TTL_HOURS") {
                    Ok(v) => v
                        .parse()
                        .ok()
                        .filter(|h: &i64| *h > 0)
                        .ok_or("Invalid SESSION_TTL_HOURS value")?,
                    Err(_) => DEFAULT_SESSION_TTL_HOURS,
                },
            },
            bootstrap_admin: bootstrap_admin_from_env(),
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_test(&self) -> bool {
        self.environment == "test"
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// テスト用の設定を作成
    pub fn for_testing() -> Self {
        Self {
            environment: "test".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_allowed_origins: vec!["http://localhost:3001".to_string()],
            database_url: "sqlite::memory:".to_string(),
            db_max_connections: 1,
            security: SecurityConfig {
                cookie_secure: false,
                session_ttl_hours: DEFAULT_SESSION_TTL_HOURS,
            },
            bootstrap_admin: None,
        }
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// 初期管理者は3つの変数がすべて揃った場合のみ有効
fn bootstrap_admin_from_env() -> Option<BootstrapAdmin> {
    Some(BootstrapAdmin {
        username: env::var("ADMIN_USERNAME").ok()?,
        email: env::var("ADMIN_EMAIL").ok()?,
        password: env::var("ADMIN_PASSWORD").ok()?,
    })
}
