// src/main.rs
use migration::{Migrator, MigratorTrait};
use shop_backend::api::{app_router, AppState};
use shop_backend::config::AppConfig;
use shop_backend::db::create_db_pool;
use shop_backend::logging::init_tracing;
use shop_backend::repository::user_session_repository::UserSessionRepository;
use tokio::net::TcpListener;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    info!("Starting Shop Backend server...");

    // 設定を読み込む
    let app_config = AppConfig::from_env()?;
    info!(
        environment = %app_config.environment,
        address = %app_config.bind_address(),
        "Configuration loaded"
    );

    // データベース接続とマイグレーション
    let db_pool = create_db_pool(&app_config).await?;
    Migrator::up(&db_pool, None).await?;
    info!("Database pool created and migrations applied.");

    // 期限切れセッションの掃除
    let purged = UserSessionRepository::new(db_pool.clone())
        .purge_stale()
        .await?;
    if purged > 0 {
        info!(purged = purged, "Stale sessions removed");
    }

    let bootstrap_admin = app_config.bootstrap_admin.clone();
    let bind_address = app_config.bind_address();
    let app_state = AppState::new(db_pool, app_config)?;

    // 初期管理者（環境変数で指定された場合のみ）
    if let Some(admin) = bootstrap_admin {
        match app_state.user_service.ensure_bootstrap_admin(&admin).await {
            Ok(Some(user)) => info!(user_id = %user.id, "Bootstrap admin ready"),
            Ok(None) => info!("Bootstrap admin skipped: an admin already exists"),
            Err(e) => warn!(error = %e, "Failed to create bootstrap admin"),
        }
    }

    let app = app_router(app_state);

    let listener = TcpListener::bind(&bind_address).await?;
    info!("Server listening on {}", bind_address);

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
    }
}
