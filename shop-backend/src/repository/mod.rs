// shop-backend/src/repository/mod.rs

pub mod album_repository;
pub mod artist_repository;
pub mod category_repository;
pub mod genre_repository;
pub mod order_repository;
pub mod product_repository;
pub mod provider_invitation_repository;
pub mod provider_repository;
pub(crate) mod query_expr;
pub mod song_repository;
pub mod user_repository;
pub mod user_session_repository;
