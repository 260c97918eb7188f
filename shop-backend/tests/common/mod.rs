// tests/common/mod.rs
pub mod app_helper;
pub mod request;
pub mod test_data;

use std::sync::Once;

// テスト環境の初期化を一度だけ実行
static INIT: Once = Once::new();

/// テスト用のログ設定
pub fn init_test_env() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("shop_backend=debug,tower_http=warn")
            .with_test_writer()
            .try_init();
    });
}
