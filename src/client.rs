//! Paginated fetch client for the gallery API.
//!
//! [`GalleryClient`] is built once from a [`ClientConfig`] and owns everything
//! a request needs: the API base URL, a [`Transport`], and a [`Transformer`]
//! carrying the storage URL and placeholder. Nothing is read from globals.
//!
//! ## Failure handling
//!
//! Every operation swallows its failures at this boundary and says so in
//! its return type:
//!
//! | Operation kind | On failure |
//! |---|---|
//! | Detail (`get_*`) | `None` |
//! | Paginated list (`list_*`) | `None`: no records and no metadata |
//! | Unpaginated list | empty `Vec` |
//!
//! The cause is logged with `tracing::warn!` and never reaches the caller.
//! Invalid records inside an otherwise good page are dropped one by one.
//!
//! ## Composite operations
//!
//! Operations such as [`GalleryClient::get_collection`] issue a primary
//! request plus dependent ones. Dependent failures degrade: the primary
//! entity comes back with an empty (or whatever was embedded) nested list.
//!
//! ## Concurrency
//!
//! Independent requests are issued together and awaited jointly
//! (`tokio::join!`, `join_all`); they can complete in any order. There is no
//! de-duplication: two identical calls are two network requests.

use crate::api::{
    self, ApiAlbum, ApiCollection, ApiFeaturedImage, ApiImage, DecodeError, id_string,
};
use crate::config::ClientConfig;
use crate::http::HttpTransport;
use crate::resolve::PathResolver;
use crate::transform::Transformer;
use crate::transport::{Transport, TransportError};
use crate::types::{Album, Collection, FeaturedImage, Image, Paginated, PaginationMeta};
use futures_util::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("{url} returned status {status}")]
    Status { url: Url, status: u16 },
    #[error("Invalid JSON from {url}: {source}")]
    Body {
        url: Url,
        source: serde_json::Error,
    },
    #[error("Unexpected response shape: {0}")]
    Decode(#[from] DecodeError),
    #[error("Failed to build request URL: {0}")]
    Url(#[from] url::ParseError),
    #[error("API base URL cannot take path segments: {0}")]
    BaseUrl(Url),
}

/// Page and page size for a list request. Both are at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub per_page: u32,
}

impl PageRequest {
    /// Clamp to the valid range. There is no upper bound; the server may cap
    /// `per_page` on its own.
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.max(1),
        }
    }
}

/// Everything the landing view shows, fetched together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landing {
    pub collections: Option<Paginated<Collection>>,
    pub albums: Option<Paginated<Album>>,
    pub featured: Vec<FeaturedImage>,
}

/// Log a swallowed failure and turn it into an absent value.
fn settle<T>(operation: &str, result: Result<T, FetchError>) -> Option<T> {
    result
        .inspect_err(|err| warn!("{operation} failed: {err}"))
        .ok()
}

#[derive(Clone)]
pub struct GalleryClient {
    api_base: Url,
    transport: Arc<dyn Transport>,
    transformer: Transformer,
    per_page: u32,
}

impl GalleryClient {
    pub fn new(
        api_base: Url,
        transport: Arc<dyn Transport>,
        transformer: Transformer,
        per_page: u32,
    ) -> Self {
        Self {
            api_base,
            transport,
            transformer,
            per_page: per_page.max(1),
        }
    }

    /// Build a client that talks HTTP, configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, FetchError> {
        let transport = HttpTransport::with_timeout(config.api.timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Build a client from `config` over an arbitrary transport.
    pub fn with_transport(
        config: &ClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, FetchError> {
        let api_base = Url::parse(&config.api.base_url)?;
        let resolver = PathResolver::new(
            config.api.storage_url.clone(),
            config.images.placeholder_url.clone(),
        );
        let transformer = Transformer::new(resolver, config.images.default_alt.clone());
        Ok(Self::new(
            api_base,
            transport,
            transformer,
            config.pagination.per_page,
        ))
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn transformer(&self) -> &Transformer {
        &self.transformer
    }

    /// Page size used when a caller doesn't pick one.
    pub fn default_per_page(&self) -> u32 {
        self.per_page
    }

    // =========================================================================
    // Request plumbing
    // =========================================================================

    fn endpoint(&self, segments: &[&str], page: Option<PageRequest>) -> Result<Url, FetchError> {
        let mut url = self.api_base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::BaseUrl(self.api_base.clone()))?
            .pop_if_empty()
            .extend(segments);
        if let Some(page) = page {
            url.query_pairs_mut()
                .append_pair("page", &page.page.to_string())
                .append_pair("per_page", &page.per_page.to_string());
        }
        Ok(url)
    }

    async fn fetch_body(&self, url: Url) -> Result<Value, FetchError> {
        debug!("GET {url}");
        let response = self.transport.get(&url).await?;
        if !response.is_success() {
            return Err(FetchError::Status {
                url,
                status: response.status,
            });
        }
        serde_json::from_str(&response.body).map_err(|source| FetchError::Body { url, source })
    }

    async fn fetch_detail<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FetchError> {
        let url = self.endpoint(segments, None)?;
        let body = self.fetch_body(url).await?;
        Ok(api::decode_detail(body)?)
    }

    async fn fetch_page<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        page: PageRequest,
    ) -> Result<(Vec<T>, PaginationMeta), FetchError> {
        let url = self.endpoint(segments, Some(page))?;
        let mut body = self.fetch_body(url).await?;
        let meta = api::decode_meta(&body)?;
        let records = api::decode_list(&mut body)?;
        Ok((records, meta))
    }

    /// Fetch a list endpoint without asking for a page; metadata is ignored.
    async fn fetch_list<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<Vec<T>, FetchError> {
        let url = self.endpoint(segments, None)?;
        let mut body = self.fetch_body(url).await?;
        Ok(api::decode_list(&mut body)?)
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// `GET /collections?page&per_page`. Invalid collections are dropped.
    pub async fn list_collections(&self, page: u32, per_page: u32) -> Option<Paginated<Collection>> {
        let result = self
            .fetch_page::<ApiCollection>(&["collections"], PageRequest::new(page, per_page))
            .await;
        let (records, meta) = settle("list collections", result)?;
        Some(Paginated {
            data: self.transformer.collections(records),
            meta,
        })
    }

    /// `GET /collections/{id}` plus `GET /collections/{id}/albums`.
    ///
    /// Both requests go out together. If the album request fails the
    /// collection is still returned, with whatever albums it embedded.
    pub async fn get_collection(&self, id: &str) -> Option<Collection> {
        let detail_path = ["collections", id];
        let albums_path = ["collections", id, "albums"];
        let (primary, albums) = tokio::join!(
            self.fetch_detail::<ApiCollection>(&detail_path),
            self.fetch_list::<ApiAlbum>(&albums_path),
        );
        let mut raw = settle("get collection", primary)?;
        match albums {
            Ok(albums) => raw.albums = Some(albums),
            Err(err) => warn!("albums for collection {id} unavailable, returning collection without them: {err}"),
        }
        self.transformer.collection(raw)
    }

    /// `GET /collections/{id}/albums?page&per_page`.
    pub async fn list_collection_albums(
        &self,
        collection_id: &str,
        page: u32,
        per_page: u32,
    ) -> Option<Paginated<Album>> {
        let result = self
            .fetch_page::<ApiAlbum>(
                &["collections", collection_id, "albums"],
                PageRequest::new(page, per_page),
            )
            .await;
        let (records, meta) = settle("list collection albums", result)?;
        Some(Paginated { data: records, meta }.map(|a| self.collection_album(collection_id, a)))
    }

    /// `GET /collections/{collection_id}/albums/{album_id}`, images included.
    pub async fn get_collection_album(&self, collection_id: &str, album_id: &str) -> Option<Album> {
        let result = self
            .fetch_detail::<ApiAlbum>(&["collections", collection_id, "albums", album_id])
            .await;
        settle("get collection album", result).map(|a| self.collection_album(collection_id, a))
    }

    fn collection_album(&self, collection_id: &str, raw: ApiAlbum) -> Album {
        Transformer::assign_collection_id(self.transformer.album(raw), collection_id)
    }

    /// Every album of a collection with its images.
    ///
    /// Lists the albums, then fetches each album's detail concurrently. An
    /// album whose detail fails is returned as listed, without images.
    pub async fn list_collection_albums_detailed(&self, collection_id: &str) -> Vec<Album> {
        let result = self
            .fetch_list::<ApiAlbum>(&["collections", collection_id, "albums"])
            .await;
        let Some(albums) = settle("list collection albums", result) else {
            return Vec::new();
        };
        self.hydrate_albums(collection_id, albums)
            .await
            .into_iter()
            .map(|a| self.collection_album(collection_id, a))
            .collect()
    }

    /// Every collection with its albums and their images.
    ///
    /// One request for the collections, one per collection for its albums
    /// and one per album for its images; each level is fetched
    /// concurrently. Dependent failures degrade to empty album lists or
    /// image-less albums.
    pub async fn list_all_collections(&self) -> Vec<Collection> {
        let result = self.fetch_list::<ApiCollection>(&["collections"]).await;
        let Some(collections) = settle("list collections", result) else {
            return Vec::new();
        };
        let hydrated = join_all(collections.into_iter().map(|c| self.hydrate_collection(c))).await;
        self.transformer.collections(hydrated)
    }

    async fn hydrate_collection(&self, mut collection: ApiCollection) -> ApiCollection {
        let Some(id) = id_string(collection.id.as_ref()) else {
            return collection;
        };
        match self.fetch_list::<ApiAlbum>(&["collections", &id, "albums"]).await {
            Ok(albums) => collection.albums = Some(self.hydrate_albums(&id, albums).await),
            Err(err) => {
                warn!("albums for collection {id} unavailable: {err}");
                collection.albums = Some(Vec::new());
            }
        }
        collection
    }

    async fn hydrate_albums(&self, collection_id: &str, albums: Vec<ApiAlbum>) -> Vec<ApiAlbum> {
        join_all(albums.into_iter().map(|album| self.hydrate_album(collection_id, album))).await
    }

    async fn hydrate_album(&self, collection_id: &str, album: ApiAlbum) -> ApiAlbum {
        let Some(album_id) = id_string(album.id.as_ref()) else {
            return album;
        };
        let result = self
            .fetch_detail::<ApiAlbum>(&["collections", collection_id, "albums", &album_id])
            .await;
        match result {
            Ok(detailed) => detailed,
            Err(err) => {
                warn!("images for album {album_id} unavailable: {err}");
                album
            }
        }
    }

    // =========================================================================
    // Albums
    // =========================================================================

    /// `GET /albums?page&per_page`.
    pub async fn list_albums(&self, page: u32, per_page: u32) -> Option<Paginated<Album>> {
        let result = self
            .fetch_page::<ApiAlbum>(&["albums"], PageRequest::new(page, per_page))
            .await;
        let (records, meta) = settle("list albums", result)?;
        Some(Paginated { data: records, meta }.map(|a| self.transformer.album(a)))
    }

    /// `GET /albums/{id}`.
    pub async fn get_album(&self, id: &str) -> Option<Album> {
        let result = self.fetch_detail::<ApiAlbum>(&["albums", id]).await;
        settle("get album", result).map(|a| self.transformer.album(a))
    }

    /// `GET /albums/{id}/images?page&per_page`.
    pub async fn list_album_images(
        &self,
        album_id: &str,
        page: u32,
        per_page: u32,
    ) -> Option<Paginated<Image>> {
        let result = self
            .fetch_page::<ApiImage>(&["albums", album_id, "images"], PageRequest::new(page, per_page))
            .await;
        let (records, meta) = settle("list album images", result)?;
        Some(Paginated { data: records, meta }.map(|i| {
            Transformer::assign_album_id(self.transformer.image(i), album_id)
        }))
    }

    // =========================================================================
    // Images
    // =========================================================================

    /// `GET /images?page&per_page`.
    pub async fn list_images(&self, page: u32, per_page: u32) -> Option<Paginated<Image>> {
        let result = self
            .fetch_page::<ApiImage>(&["images"], PageRequest::new(page, per_page))
            .await;
        let (records, meta) = settle("list images", result)?;
        Some(Paginated { data: records, meta }.map(|i| self.transformer.image(i)))
    }

    /// `GET /images/{id}`.
    pub async fn get_image(&self, id: &str) -> Option<Image> {
        let result = self.fetch_detail::<ApiImage>(&["images", id]).await;
        settle("get image", result).map(|i| self.transformer.image(i))
    }

    /// `GET /featured-images`: active entries only, ordered by position.
    pub async fn get_featured_images(&self) -> Vec<FeaturedImage> {
        let result = self.fetch_list::<ApiFeaturedImage>(&["featured-images"]).await;
        let mut featured: Vec<FeaturedImage> = settle("get featured images", result)
            .unwrap_or_default()
            .into_iter()
            .map(|f| self.transformer.featured(f))
            .filter(|f| f.is_active)
            .collect();
        featured.sort_by_key(|f| f.position);
        featured
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// First page of collections and albums plus the featured images,
    /// fetched concurrently. Each part fails on its own.
    pub async fn landing(&self, per_page: u32) -> Landing {
        let (collections, albums, featured) = tokio::join!(
            self.list_collections(1, per_page),
            self.list_albums(1, per_page),
            self.get_featured_images(),
        );
        Landing {
            collections,
            albums,
            featured,
        }
    }
}
