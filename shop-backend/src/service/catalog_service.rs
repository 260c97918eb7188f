// shop-backend/src/service/catalog_service.rs
use crate::api::dto::catalog_dto::{
    AlbumListQuery, AlbumResponse, ArtistResponse, CatalogListQuery, CreateAlbumRequest,
    CreateArtistRequest, CreateSongRequest, CreateTaxonomyRequest, SongResponse, TaxonomyResponse,
    UpdateAlbumRequest, UpdateArtistRequest, UpdateSongRequest, UpdateTaxonomyRequest,
};
use crate::error::{AppError, AppResult};
use crate::repository::album_repository::{AlbumRepository, UpdateAlbum};
use crate::repository::artist_repository::ArtistRepository;
use crate::repository::category_repository::CategoryRepository;
use crate::repository::genre_repository::GenreRepository;
use crate::repository::song_repository::SongRepository;
use crate::types::pagination::normalize_page;
use crate::types::PaginatedResponse;
use crate::utils::error_helper::convert_validation_errors;
use crate::utils::validation::trim_optional;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;
use validator::Validate;

/// カタログ（アーティスト・ジャンル・カテゴリ・アルバム・楽曲）管理サービス
pub struct CatalogService {
    artist_repo: Arc<ArtistRepository>,
    genre_repo: Arc<GenreRepository>,
    category_repo: Arc<CategoryRepository>,
    album_repo: Arc<AlbumRepository>,
    song_repo: Arc<SongRepository>,
}

impl CatalogService {
    pub fn new(
        artist_repo: Arc<ArtistRepository>,
        genre_repo: Arc<GenreRepository>,
        category_repo: Arc<CategoryRepository>,
        album_repo: Arc<AlbumRepository>,
        song_repo: Arc<SongRepository>,
    ) -> Self {
        Self {
            artist_repo,
            genre_repo,
            category_repo,
            album_repo,
            song_repo,
        }
    }

    // --- アーティスト ---

    pub async fn list_artists(
        &self,
        query: &CatalogListQuery,
    ) -> AppResult<PaginatedResponse<ArtistResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);
        let (items, total_count) = self
            .artist_repo
            .search(query.search_term().as_deref(), page, per_page)
            .await?;
        let items = items.into_iter().map(ArtistResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total_count))
    }

    pub async fn get_artist(&self, id: Uuid) -> AppResult<ArtistResponse> {
        self.artist_repo
            .find_by_id(id)
            .await?
            .map(ArtistResponse::from)
            .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))
    }

    pub async fn create_artist(&self, request: CreateArtistRequest) -> AppResult<ArtistResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::create_artist"))?;

        let artist = self
            .artist_repo
            .create(
                request.name.trim().to_string(),
                trim_optional(request.bio),
                trim_optional(request.country),
            )
            .await?;

        info!(artist_id = %artist.id, name = %artist.name, "Artist created");
        Ok(artist.into())
    }

    pub async fn update_artist(
        &self,
        id: Uuid,
        request: UpdateArtistRequest,
    ) -> AppResult<ArtistResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::update_artist"))?;

        let artist = self
            .artist_repo
            .update(id, request.into())
            .await?
            .ok_or_else(|| AppError::NotFound("Artist not found".to_string()))?;

        info!(artist_id = %id, "Artist updated");
        Ok(artist.into())
    }

    /// アルバムが残っているアーティストは削除不可
    pub async fn delete_artist(&self, id: Uuid) -> AppResult<()> {
        if self.artist_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("Artist not found".to_string()));
        }
        if self.artist_repo.has_albums(id).await? {
            warn!(artist_id = %id, "Delete blocked: artist has albums");
            return Err(AppError::Conflict(
                "Artist cannot be deleted while albums reference it".to_string(),
            ));
        }

        self.artist_repo.delete(id).await?;
        info!(artist_id = %id, "Artist deleted");
        Ok(())
    }

    // --- ジャンル ---

    pub async fn list_genres(
        &self,
        query: &CatalogListQuery,
    ) -> AppResult<PaginatedResponse<TaxonomyResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);
        let (items, total_count) = self
            .genre_repo
            .search(query.search_term().as_deref(), page, per_page)
            .await?;
        let items = items.into_iter().map(TaxonomyResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total_count))
    }

    pub async fn get_genre(&self, id: Uuid) -> AppResult<TaxonomyResponse> {
        self.genre_repo
            .find_by_id(id)
            .await?
            .map(TaxonomyResponse::from)
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))
    }

    pub async fn create_genre(&self, request: CreateTaxonomyRequest) -> AppResult<TaxonomyResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::create_genre"))?;

        let name = request.name.trim().to_string();
        if self.genre_repo.name_exists(&name, None).await? {
            return Err(AppError::Conflict("Genre already exists".to_string()));
        }

        let genre = self
            .genre_repo
            .create(name, trim_optional(request.description))
            .await?;
        info!(genre_id = %genre.id, name = %genre.name, "Genre created");
        Ok(genre.into())
    }

    pub async fn update_genre(
        &self,
        id: Uuid,
        request: UpdateTaxonomyRequest,
    ) -> AppResult<TaxonomyResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::update_genre"))?;

        let name = request.name.map(|n| n.trim().to_string());
        if let Some(name) = name.as_deref() {
            if self.genre_repo.name_exists(name, Some(id)).await? {
                return Err(AppError::Conflict("Genre already exists".to_string()));
            }
        }

        let genre = self
            .genre_repo
            .update(id, name, request.description)
            .await?
            .ok_or_else(|| AppError::NotFound("Genre not found".to_string()))?;
        Ok(genre.into())
    }

    /// 参照しているアルバムの genre_id は NULL になる
    pub async fn delete_genre(&self, id: Uuid) -> AppResult<()> {
        if self.genre_repo.delete(id).await? == 0 {
            return Err(AppError::NotFound("Genre not found".to_string()));
        }
        info!(genre_id = %id, "Genre deleted");
        Ok(())
    }

    // --- カテゴリ ---

    pub async fn list_categories(
        &self,
        query: &CatalogListQuery,
    ) -> AppResult<PaginatedResponse<TaxonomyResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);
        let (items, total_count) = self
            .category_repo
            .search(query.search_term().as_deref(), page, per_page)
            .await?;
        let items = items.into_iter().map(TaxonomyResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total_count))
    }

    pub async fn get_category(&self, id: Uuid) -> AppResult<TaxonomyResponse> {
        self.category_repo
            .find_by_id(id)
            .await?
            .map(TaxonomyResponse::from)
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))
    }

    pub async fn create_category(
        &self,
        request: CreateTaxonomyRequest,
    ) -> AppResult<TaxonomyResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::create_category"))?;

        let name = request.name.trim().to_string();
        if self.category_repo.name_exists(&name, None).await? {
            return Err(AppError::Conflict("Category already exists".to_string()));
        }

        let category = self
            .category_repo
            .create(name, trim_optional(request.description))
            .await?;
        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category.into())
    }

    pub async fn update_category(
        &self,
        id: Uuid,
        request: UpdateTaxonomyRequest,
    ) -> AppResult<TaxonomyResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::update_category"))?;

        let name = request.name.map(|n| n.trim().to_string());
        if let Some(name) = name.as_deref() {
            if self.category_repo.name_exists(name, Some(id)).await? {
                return Err(AppError::Conflict("Category already exists".to_string()));
            }
        }

        let category = self
            .category_repo
            .update(id, name, request.description)
            .await?
            .ok_or_else(|| AppError::NotFound("Category not found".to_string()))?;
        Ok(category.into())
    }

    pub async fn delete_category(&self, id: Uuid) -> AppResult<()> {
        if self.category_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("Category not found".to_string()));
        }
        if self.category_repo.product_count(id).await? > 0 {
            return Err(AppError::Conflict(
                "Category cannot be deleted while products reference it".to_string(),
            ));
        }

        self.category_repo.delete(id).await?;
        info!(category_id = %id, "Category deleted");
        Ok(())
    }

    // --- アルバム ---

    pub async fn list_albums(
        &self,
        query: &AlbumListQuery,
    ) -> AppResult<PaginatedResponse<AlbumResponse>> {
        let (page, per_page) = normalize_page(query.page, query.per_page);
        let (items, total_count) = self
            .album_repo
            .search(&query.to_filter(), page, per_page)
            .await?;
        let items = items.into_iter().map(AlbumResponse::from).collect();
        Ok(PaginatedResponse::new(items, page, per_page, total_count))
    }

    /// アルバム詳細（収録曲つき）
    pub async fn get_album(&self, id: Uuid) -> AppResult<AlbumResponse> {
        let album = self
            .album_repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;
        let songs = self.song_repo.find_by_album(id).await?;
        Ok(AlbumResponse::with_songs(album, songs))
    }

    pub async fn create_album(&self, request: CreateAlbumRequest) -> AppResult<AlbumResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::create_album"))?;

        self.ensure_artist_exists(request.artist_id).await?;
        if let Some(genre_id) = request.genre_id {
            self.ensure_genre_exists(genre_id).await?;
        }

        let album = self.album_repo.create(request.into()).await?;
        info!(album_id = %album.id, artist_id = %album.artist_id, "Album created");
        Ok(album.into())
    }

    pub async fn update_album(
        &self,
        id: Uuid,
        request: UpdateAlbumRequest,
    ) -> AppResult<AlbumResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::update_album"))?;

        let update: UpdateAlbum = request.into();
        if let Some(artist_id) = update.artist_id {
            self.ensure_artist_exists(artist_id).await?;
        }
        if let Some(genre_id) = update.genre_id {
            self.ensure_genre_exists(genre_id).await?;
        }

        let album = self
            .album_repo
            .update(id, update)
            .await?
            .ok_or_else(|| AppError::NotFound("Album not found".to_string()))?;
        info!(album_id = %id, "Album updated");
        Ok(album.into())
    }

    /// 商品が紐づくアルバムは削除不可（収録曲は一緒に削除される）
    pub async fn delete_album(&self, id: Uuid) -> AppResult<()> {
        if self.album_repo.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound("Album not found".to_string()));
        }
        if self.album_repo.product_count(id).await? > 0 {
            return Err(AppError::Conflict(
                "Album cannot be deleted while products reference it".to_string(),
            ));
        }

        self.album_repo.delete(id).await?;
        info!(album_id = %id, "Album deleted");
        Ok(())
    }

    // --- 楽曲 ---

    pub async fn list_songs(&self, album_id: Uuid) -> AppResult<Vec<SongResponse>> {
        if self.album_repo.find_by_id(album_id).await?.is_none() {
            return Err(AppError::NotFound("Album not found".to_string()));
        }
        let songs = self.song_repo.find_by_album(album_id).await?;
        Ok(songs.into_iter().map(SongResponse::from).collect())
    }

    pub async fn create_song(
        &self,
        album_id: Uuid,
        request: CreateSongRequest,
    ) -> AppResult<SongResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::create_song"))?;

        if self.album_repo.find_by_id(album_id).await?.is_none() {
            return Err(AppError::NotFound("Album not found".to_string()));
        }

        let song = self
            .song_repo
            .create(
                album_id,
                request.title.trim().to_string(),
                request.track_number,
                request.duration_seconds,
            )
            .await?;
        info!(song_id = %song.id, album_id = %album_id, "Song created");
        Ok(song.into())
    }

    pub async fn update_song(&self, id: Uuid, request: UpdateSongRequest) -> AppResult<SongResponse> {
        request
            .validate()
            .map_err(|e| convert_validation_errors(e, "catalog_service::update_song"))?;

        let song = self
            .song_repo
            .update(
                id,
                request.title.map(|t| t.trim().to_string()),
                request.track_number,
                request.duration_seconds,
            )
            .await?
            .ok_or_else(|| AppError::NotFound("Song not found".to_string()))?;
        Ok(song.into())
    }

    pub async fn delete_song(&self, id: Uuid) -> AppResult<()> {
        if self.song_repo.delete(id).await? == 0 {
            return Err(AppError::NotFound("Song not found".to_string()));
        }
        info!(song_id = %id, "Song deleted");
        Ok(())
    }

    // --- 参照チェック ---

    async fn ensure_artist_exists(&self, artist_id: Uuid) -> AppResult<()> {
        match self.artist_repo.find_by_id(artist_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest(format!(
                "Artist {} does not exist",
                artist_id
            ))),
        }
    }

    async fn ensure_genre_exists(&self, genre_id: Uuid) -> AppResult<()> {
        match self.genre_repo.find_by_id(genre_id).await? {
            Some(_) => Ok(()),
            None => Err(AppError::BadRequest(format!(
                "Genre {} does not exist",
                genre_id
            ))),
        }
    }
}
