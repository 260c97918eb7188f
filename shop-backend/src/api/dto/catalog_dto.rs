// shop-backend/src/api/dto/catalog_dto.rs

use crate::domain::{album_model, artist_model, category_model, genre_model, song_model};
use crate::repository::album_repository::{AlbumFilter, CreateAlbum, UpdateAlbum};
use crate::repository::artist_repository::ArtistData;
use crate::types::query::normalize_search_term;
use crate::utils::validation::{self, catalog};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// --- クエリ ---

/// 名前検索つき一覧クエリ（アーティスト・ジャンル・カテゴリ共通）
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogListQuery {
    pub q: Option<String>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl CatalogListQuery {
    pub fn search_term(&self) -> Option<String> {
        normalize_search_term(self.q.as_deref())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AlbumListQuery {
    pub q: Option<String>,
    pub artist_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

impl AlbumListQuery {
    pub fn to_filter(&self) -> AlbumFilter {
        AlbumFilter {
            q: normalize_search_term(self.q.as_deref()),
            artist_id: self.artist_id,
            genre_id: self.genre_id,
        }
    }
}

// --- アーティスト ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateArtistRequest {
    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub name: String,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub bio: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateArtistRequest {
    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub name: Option<String>,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub bio: Option<String>,

    #[validate(length(max = 100))]
    pub country: Option<String>,
}

impl From<UpdateArtistRequest> for ArtistData {
    fn from(req: UpdateArtistRequest) -> Self {
        Self {
            name: req.name.map(|s| s.trim().to_string()),
            bio: req.bio,
            country: req.country.map(|s| s.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtistResponse {
    pub id: Uuid,
    pub name: String,
    pub bio: Option<String>,
    pub country: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<artist_model::Model> for ArtistResponse {
    fn from(model: artist_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            bio: model.bio,
            country: model.country,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

// --- ジャンル・カテゴリ ---

/// ジャンル・カテゴリの作成
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateTaxonomyRequest {
    #[validate(
        length(min = 1, max = 100),
        custom(function = validation::validate_not_blank)
    )]
    pub name: String,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateTaxonomyRequest {
    #[validate(
        length(min = 1, max = 100),
        custom(function = validation::validate_not_blank)
    )]
    pub name: Option<String>,

    #[validate(length(max = catalog::DESCRIPTION_MAX_LENGTH))]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonomyResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<genre_model::Model> for TaxonomyResponse {
    fn from(model: genre_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

impl From<category_model::Model> for TaxonomyResponse {
    fn from(model: category_model::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            created_at: model.created_at,
        }
    }
}

// --- アルバム ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateAlbumRequest {
    pub artist_id: Uuid,
    pub genre_id: Option<Uuid>,

    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub title: String,

    #[validate(range(min = 1900, max = 2100, message = "Release year is out of range"))]
    pub release_year: Option<i32>,

    #[validate(url(message = "Invalid cover URL"))]
    pub cover_url: Option<String>,
}

impl From<CreateAlbumRequest> for CreateAlbum {
    fn from(req: CreateAlbumRequest) -> Self {
        Self {
            artist_id: req.artist_id,
            genre_id: req.genre_id,
            title: req.title.trim().to_string(),
            release_year: req.release_year,
            cover_url: validation::trim_optional(req.cover_url),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateAlbumRequest {
    pub artist_id: Option<Uuid>,
    pub genre_id: Option<Uuid>,

    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub title: Option<String>,

    #[validate(range(min = 1900, max = 2100, message = "Release year is out of range"))]
    pub release_year: Option<i32>,

    #[validate(url(message = "Invalid cover URL"))]
    pub cover_url: Option<String>,
}

impl From<UpdateAlbumRequest> for UpdateAlbum {
    fn from(req: UpdateAlbumRequest) -> Self {
        Self {
            artist_id: req.artist_id,
            genre_id: req.genre_id,
            title: req.title.map(|s| s.trim().to_string()),
            release_year: req.release_year,
            cover_url: req.cover_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlbumResponse {
    pub id: Uuid,
    pub artist_id: Uuid,
    pub genre_id: Option<Uuid>,
    pub title: String,
    pub release_year: Option<i32>,
    pub cover_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub songs: Option<Vec<SongResponse>>,
}

impl AlbumResponse {
    pub fn with_songs(model: album_model::Model, songs: Vec<song_model::Model>) -> Self {
        Self {
            songs: Some(songs.into_iter().map(Into::into).collect()),
            ..Self::from(model)
        }
    }
}

impl From<album_model::Model> for AlbumResponse {
    fn from(model: album_model::Model) -> Self {
        Self {
            id: model.id,
            artist_id: model.artist_id,
            genre_id: model.genre_id,
            title: model.title,
            release_year: model.release_year,
            cover_url: model.cover_url,
            created_at: model.created_at,
            updated_at: model.updated_at,
            songs: None,
        }
    }
}

// --- 楽曲 ---

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateSongRequest {
    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub title: String,

    #[validate(range(min = 1, message = "Track number must be positive"))]
    pub track_number: i32,

    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_seconds: Option<i32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct UpdateSongRequest {
    #[validate(
        length(min = 1, max = catalog::TITLE_MAX_LENGTH),
        custom(function = validation::validate_not_blank)
    )]
    pub title: Option<String>,

    #[validate(range(min = 1, message = "Track number must be positive"))]
    pub track_number: Option<i32>,

    #[validate(range(min = 1, message = "Duration must be positive"))]
    pub duration_seconds: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongResponse {
    pub id: Uuid,
    pub album_id: Uuid,
    pub title: String,
    pub track_number: i32,
    pub duration_seconds: Option<i32>,
}

impl From<song_model::Model> for SongResponse {
    fn from(model: song_model::Model) -> Self {
        Self {
            id: model.id,
            album_id: model.album_id,
            title: model.title,
            track_number: model.track_number,
            duration_seconds: model.duration_seconds,
        }
    }
}
