// shop-backend/src/api/handlers/catalog_handler.rs
use crate::api::dto::catalog_dto::{
    AlbumListQuery, AlbumResponse, ArtistResponse, CatalogListQuery, CreateAlbumRequest,
    CreateArtistRequest, CreateSongRequest, CreateTaxonomyRequest, SongResponse, TaxonomyResponse,
    UpdateAlbumRequest, UpdateArtistRequest, UpdateSongRequest, UpdateTaxonomyRequest,
};
use crate::api::AppState;
use crate::error::AppResult;
use crate::extractors::ValidatedUuid;
use crate::middleware::auth::AuthenticatedUser;
use crate::types::{ApiResponse, PaginatedResponse};
use axum::{
    extract::{Json, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Router,
};

// 参照系は誰でも利用可能、更新系は管理者のみ

// --- アーティスト ---

pub async fn list_artists_handler(
    State(app_state): State<AppState>,
    Query(query): Query<CatalogListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<ArtistResponse>>> {
    let artists = app_state.catalog_service.list_artists(&query).await?;
    Ok(ApiResponse::success(artists))
}

pub async fn get_artist_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(artist_id): ValidatedUuid,
) -> AppResult<ApiResponse<ArtistResponse>> {
    let artist = app_state.catalog_service.get_artist(artist_id).await?;
    Ok(ApiResponse::success(artist))
}

pub async fn create_artist_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Json(payload): Json<CreateArtistRequest>,
) -> AppResult<(StatusCode, ApiResponse<ArtistResponse>)> {
    admin.require_admin()?;
    let artist = app_state.catalog_service.create_artist(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(artist)))
}

pub async fn update_artist_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(artist_id): ValidatedUuid,
    Json(payload): Json<UpdateArtistRequest>,
) -> AppResult<ApiResponse<ArtistResponse>> {
    admin.require_admin()?;
    let artist = app_state
        .catalog_service
        .update_artist(artist_id, payload)
        .await?;
    Ok(ApiResponse::success(artist))
}

pub async fn delete_artist_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(artist_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    admin.require_admin()?;
    app_state.catalog_service.delete_artist(artist_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- ジャンル ---

pub async fn list_genres_handler(
    State(app_state): State<AppState>,
    Query(query): Query<CatalogListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<TaxonomyResponse>>> {
    let genres = app_state.catalog_service.list_genres(&query).await?;
    Ok(ApiResponse::success(genres))
}

pub async fn get_genre_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(genre_id): ValidatedUuid,
) -> AppResult<ApiResponse<TaxonomyResponse>> {
    let genre = app_state.catalog_service.get_genre(genre_id).await?;
    Ok(ApiResponse::success(genre))
}

pub async fn create_genre_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Json(payload): Json<CreateTaxonomyRequest>,
) -> AppResult<(StatusCode, ApiResponse<TaxonomyResponse>)> {
    admin.require_admin()?;
    let genre = app_state.catalog_service.create_genre(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(genre)))
}

pub async fn update_genre_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(genre_id): ValidatedUuid,
    Json(payload): Json<UpdateTaxonomyRequest>,
) -> AppResult<ApiResponse<TaxonomyResponse>> {
    admin.require_admin()?;
    let genre = app_state
        .catalog_service
        .update_genre(genre_id, payload)
        .await?;
    Ok(ApiResponse::success(genre))
}

pub async fn delete_genre_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(genre_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    admin.require_admin()?;
    app_state.catalog_service.delete_genre(genre_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- カテゴリ ---

pub async fn list_categories_handler(
    State(app_state): State<AppState>,
    Query(query): Query<CatalogListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<TaxonomyResponse>>> {
    let categories = app_state.catalog_service.list_categories(&query).await?;
    Ok(ApiResponse::success(categories))
}

pub async fn get_category_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(category_id): ValidatedUuid,
) -> AppResult<ApiResponse<TaxonomyResponse>> {
    let category = app_state.catalog_service.get_category(category_id).await?;
    Ok(ApiResponse::success(category))
}

pub async fn create_category_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Json(payload): Json<CreateTaxonomyRequest>,
) -> AppResult<(StatusCode, ApiResponse<TaxonomyResponse>)> {
    admin.require_admin()?;
    let category = app_state.catalog_service.create_category(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(category)))
}

pub async fn update_category_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(category_id): ValidatedUuid,
    Json(payload): Json<UpdateTaxonomyRequest>,
) -> AppResult<ApiResponse<TaxonomyResponse>> {
    admin.require_admin()?;
    let category = app_state
        .catalog_service
        .update_category(category_id, payload)
        .await?;
    Ok(ApiResponse::success(category))
}

pub async fn delete_category_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(category_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    admin.require_admin()?;
    app_state.catalog_service.delete_category(category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- アルバム ---

pub async fn list_albums_handler(
    State(app_state): State<AppState>,
    Query(query): Query<AlbumListQuery>,
) -> AppResult<ApiResponse<PaginatedResponse<AlbumResponse>>> {
    let albums = app_state.catalog_service.list_albums(&query).await?;
    Ok(ApiResponse::success(albums))
}

/// アルバム詳細（収録曲を含む）
pub async fn get_album_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(album_id): ValidatedUuid,
) -> AppResult<ApiResponse<AlbumResponse>> {
    let album = app_state.catalog_service.get_album(album_id).await?;
    Ok(ApiResponse::success(album))
}

pub async fn create_album_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    Json(payload): Json<CreateAlbumRequest>,
) -> AppResult<(StatusCode, ApiResponse<AlbumResponse>)> {
    admin.require_admin()?;
    let album = app_state.catalog_service.create_album(payload).await?;
    Ok((StatusCode::CREATED, ApiResponse::success(album)))
}

pub async fn update_album_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(album_id): ValidatedUuid,
    Json(payload): Json<UpdateAlbumRequest>,
) -> AppResult<ApiResponse<AlbumResponse>> {
    admin.require_admin()?;
    let album = app_state
        .catalog_service
        .update_album(album_id, payload)
        .await?;
    Ok(ApiResponse::success(album))
}

pub async fn delete_album_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(album_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    admin.require_admin()?;
    app_state.catalog_service.delete_album(album_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- 楽曲 ---

pub async fn list_songs_handler(
    State(app_state): State<AppState>,
    ValidatedUuid(album_id): ValidatedUuid,
) -> AppResult<ApiResponse<Vec<SongResponse>>> {
    let songs = app_state.catalog_service.list_songs(album_id).await?;
    Ok(ApiResponse::success(songs))
}

pub async fn create_song_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(album_id): ValidatedUuid,
    Json(payload): Json<CreateSongRequest>,
) -> AppResult<(StatusCode, ApiResponse<SongResponse>)> {
    admin.require_admin()?;
    let song = app_state
        .catalog_service
        .create_song(album_id, payload)
        .await?;
    Ok((StatusCode::CREATED, ApiResponse::success(song)))
}

pub async fn update_song_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(song_id): ValidatedUuid,
    Json(payload): Json<UpdateSongRequest>,
) -> AppResult<ApiResponse<SongResponse>> {
    admin.require_admin()?;
    let song = app_state
        .catalog_service
        .update_song(song_id, payload)
        .await?;
    Ok(ApiResponse::success(song))
}

pub async fn delete_song_handler(
    State(app_state): State<AppState>,
    admin: AuthenticatedUser,
    ValidatedUuid(song_id): ValidatedUuid,
) -> AppResult<StatusCode> {
    admin.require_admin()?;
    app_state.catalog_service.delete_song(song_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn catalog_router(app_state: AppState) -> Router {
    Router::new()
        // アーティスト
        .route(
            "/artists",
            get(list_artists_handler).post(create_artist_handler),
        )
        .route(
            "/artists/{id}",
            get(get_artist_handler)
                .patch(update_artist_handler)
                .delete(delete_artist_handler),
        )
        // ジャンル
        .route("/genres", get(list_genres_handler).post(create_genre_handler))
        .route(
            "/genres/{id}",
            get(get_genre_handler)
                .patch(update_genre_handler)
                .delete(delete_genre_handler),
        )
        // カテゴリ
        .route(
            "/categories",
            get(list_categories_handler).post(create_category_handler),
        )
        .route(
            "/categories/{id}",
            get(get_category_handler)
                .patch(update_category_handler)
                .delete(delete_category_handler),
        )
        // アルバム・楽曲
        .route("/albums", get(list_albums_handler).post(create_album_handler))
        .route(
            "/albums/{id}",
            get(get_album_handler)
                .patch(update_album_handler)
                .delete(delete_album_handler),
        )
        .route(
            "/albums/{id}/songs",
            get(list_songs_handler).post(create_song_handler),
        )
        .route(
            "/songs/{id}",
            patch(update_song_handler).delete(delete_song_handler),
        )
        .with_state(app_state)
}
