// shop-backend/src/domain/mod.rs

pub mod album_model;
pub mod artist_model;
pub mod category_model;
pub mod genre_model;
pub mod order_item_model;
pub mod order_model;
pub mod order_status;
pub mod product_model;
pub mod product_type;
pub mod provider_invitation_model;
pub mod provider_model;
pub mod song_model;
pub mod user_model;
pub mod user_role;
pub mod user_session_model;
pub mod verification_status;
