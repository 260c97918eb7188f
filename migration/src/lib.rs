// migration/src/lib.rs
pub use sea_orm_migration::prelude::*;

// 認証関連マイグレーション
mod m20250612_000001_create_users_table;
mod m20250612_000002_create_user_sessions_table;

// プロバイダー関連マイグレーション
mod m20250620_000001_create_providers_table;
mod m20250620_000002_create_provider_invitations_table;

// カタログ関連マイグレーション
mod m20250625_000001_create_catalog_tables;
mod m20250625_000002_create_products_table;

// 注文関連マイグレーション
mod m20250701_000001_create_orders_tables;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            // 1. 基本テーブル作成（依存関係なし）
            Box::new(m20250612_000001_create_users_table::Migration),
            // 2. usersテーブルに依存するテーブル
            Box::new(m20250612_000002_create_user_sessions_table::Migration),
            Box::new(m20250620_000001_create_providers_table::Migration),
            Box::new(m20250620_000002_create_provider_invitations_table::Migration),
            // 3. カタログ（アーティスト・アルバム・楽曲・ジャンル・カテゴリ）
            Box::new(m20250625_000001_create_catalog_tables::Migration),
            // 4. 商品（providers / albums / categories に依存）
            Box::new(m20250625_000002_create_products_table::Migration),
            // 5. 注文
            Box::new(m20250701_000001_create_orders_tables::Migration),
        ]
    }
}
