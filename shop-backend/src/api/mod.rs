// shop-backend/src/api/mod.rs
use crate::config::AppConfig;
use crate::logging::{inject_request_context, logging_middleware};
use crate::middleware::auth::{cors_layer, session_auth_middleware, AuthMiddlewareConfig};
use crate::repository::{
    album_repository::AlbumRepository, artist_repository::ArtistRepository,
    category_repository::CategoryRepository, genre_repository::GenreRepository,
    order_repository::OrderRepository, product_repository::ProductRepository,
    provider_invitation_repository::ProviderInvitationRepository,
    provider_repository::ProviderRepository, song_repository::SongRepository,
    user_repository::UserRepository, user_session_repository::UserSessionRepository,
};
use crate::service::{
    auth_service::AuthService, catalog_service::CatalogService, order_service::OrderService,
    product_service::ProductService, provider_service::ProviderService,
    user_service::UserService,
};
use crate::utils::password::{Argon2Config, PasswordError, PasswordManager, PasswordPolicy};
use axum::{middleware as axum_middleware, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod dto;
pub mod handlers;

/// 統一されたアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub auth_service: Arc<AuthService>,
    pub user_service: Arc<UserService>,
    pub provider_service: Arc<ProviderService>,
    pub catalog_service: Arc<CatalogService>,
    pub product_service: Arc<ProductService>,
    pub order_service: Arc<OrderService>,
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// リポジトリとサービスを組み立てる
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Result<Self, PasswordError> {
        // テストではハッシュ計算を軽くする
        let argon2_config = if config.is_test() {
            Argon2Config::for_testing()
        } else {
            Argon2Config::from_env()
        };
        let password_manager = Arc::new(PasswordManager::new(
            argon2_config,
            PasswordPolicy::default(),
        )?);

        let user_repo = Arc::new(UserRepository::new(db.clone()));
        let session_repo = Arc::new(UserSessionRepository::new(db.clone()));
        let provider_repo = Arc::new(ProviderRepository::new(db.clone()));
        let invitation_repo = Arc::new(ProviderInvitationRepository::new(db.clone()));
        let album_repo = Arc::new(AlbumRepository::new(db.clone()));
        let category_repo = Arc::new(CategoryRepository::new(db.clone()));

        let auth_service = Arc::new(AuthService::new(
            user_repo.clone(),
            session_repo,
            password_manager.clone(),
            config.security.session_ttl_hours,
        ));
        let user_service = Arc::new(UserService::new(
            user_repo.clone(),
            provider_repo.clone(),
            password_manager,
        ));
        let provider_service = Arc::new(ProviderService::new(
            provider_repo.clone(),
            invitation_repo,
            user_repo,
        ));
        let catalog_service = Arc::new(CatalogService::new(
            Arc::new(ArtistRepository::new(db.clone())),
            Arc::new(GenreRepository::new(db.clone())),
            category_repo.clone(),
            album_repo.clone(),
            Arc::new(SongRepository::new(db.clone())),
        ));
        let product_service = Arc::new(ProductService::new(
            Arc::new(ProductRepository::new(db.clone())),
            provider_repo,
            album_repo,
            category_repo,
        ));
        let order_service = Arc::new(OrderService::new(Arc::new(OrderRepository::new(
            db.clone(),
        ))));

        Ok(Self {
            auth_service,
            user_service,
            provider_service,
            catalog_service,
            product_service,
            order_service,
            db,
            config: Arc::new(config),
        })
    }
}

/// 全ルートとミドルウェアを組み立てたルーター
pub fn app_router(app_state: AppState) -> Router {
    let auth_config = AuthMiddlewareConfig::new(app_state.auth_service.clone());
    let cors = cors_layer(&app_state.config);

    Router::new()
        .merge(handlers::system_handler::system_router(app_state.clone()))
        .merge(handlers::auth_handler::auth_router(app_state.clone()))
        .merge(handlers::user_handler::user_router(app_state.clone()))
        .merge(handlers::provider_handler::provider_router(app_state.clone()))
        .merge(handlers::catalog_handler::catalog_router(app_state.clone()))
        .merge(handlers::product_handler::product_router(app_state.clone()))
        .merge(handlers::order_handler::order_router(app_state))
        .layer(axum_middleware::from_fn_with_state(
            auth_config,
            session_auth_middleware,
        ))
        .layer(axum_middleware::from_fn(logging_middleware))
        .layer(axum_middleware::from_fn(inject_request_context))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
