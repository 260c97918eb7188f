use crate::error::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use uuid::Uuid;

/// 直前のパスセグメントからパラメータ名を推測する
fn uuid_param_name(path: &str) -> &'static str {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    // 最後のリソース名を優先（/albums/{id}/songs のようなネストに対応）
    for window in segments.windows(2).rev() {
        let name = match window[0] {
            "users" => "user_id",
            "providers" => "provider_id",
            "artists" => "artist_id",
            "genres" => "genre_id",
            "categories" => "category_id",
            "albums" => "album_id",
            "songs" => "song_id",
            "products" => "product_id",
            "orders" => "order_id",
            _ => continue,
        };
        return name;
    }

    "id"
}

/// パスパラメータからUUIDを抽出し、検証を行う
#[derive(Debug, Clone, Copy)]
pub struct ValidatedUuid(pub Uuid);

impl<S> FromRequestParts<S> for ValidatedUuid
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| {
                let param_name = uuid_param_name(parts.uri.path());
                AppError::BadRequest(format!("Missing path parameter '{}': {}", param_name, e))
            })?;

        let uuid = Uuid::parse_str(&raw).map_err(|_| {
            let param_name = uuid_param_name(parts.uri.path());
            AppError::BadRequest(format!("Invalid UUID format for '{}': '{}'", param_name, raw))
        })?;

        Ok(ValidatedUuid(uuid))
    }
}
