//! Shared test utilities for the gallery-client test suite.
//!
//! Provides a fixed configuration, a client wired to a [`MockTransport`],
//! canned API responses from `fixtures/api/`, and lookup helpers that work
//! with normalized entities (`Collection`, `Album`, `Image`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let (client, mock) = mock_client(
//!     MockTransport::new().ok("/api/albums/70", fixture(ALBUM_70)),
//! );
//! let album = client.get_album("70").await.unwrap();
//! assert_eq!(image_titles(&album), vec![Some("Brown"), Some("Tan")]);
//! assert_eq!(mock.request_count(), 1);
//! ```

use std::sync::Arc;

use crate::client::GalleryClient;
use crate::config::ClientConfig;
use crate::resolve::PathResolver;
use crate::transform::Transformer;
use crate::transport::tests::MockTransport;
use crate::types::{Album, Collection, Image};

pub const API_BASE: &str = "https://api.example.com/api";
pub const STORAGE: &str = "https://cdn.example.com/storage";
pub const PLACEHOLDER: &str = "https://cdn.example.com/placeholder.jpg";

// =========================================================================
// Canned responses
// =========================================================================

pub const COLLECTIONS_PAGE_2: &str = include_str!("../fixtures/api/collections_page_2.json");
pub const COLLECTION_7: &str = include_str!("../fixtures/api/collection_7.json");
pub const COLLECTION_7_ALBUMS: &str = include_str!("../fixtures/api/collection_7_albums.json");
pub const ALBUMS_PAGE_1: &str = include_str!("../fixtures/api/albums_page_1.json");
pub const ALBUM_70: &str = include_str!("../fixtures/api/album_70.json");
pub const ALBUM_70_IMAGES: &str = include_str!("../fixtures/api/album_70_images.json");
pub const FEATURED_IMAGES: &str = include_str!("../fixtures/api/featured_images.json");

/// Parse one of the canned responses above.
pub fn fixture(json: &str) -> serde_json::Value {
    serde_json::from_str(json).unwrap()
}

// =========================================================================
// Construction
// =========================================================================

/// Defaults with the test endpoints swapped in.
pub fn test_config() -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = API_BASE.into();
    config.api.storage_url = STORAGE.into();
    config.images.placeholder_url = PLACEHOLDER.into();
    config
}

pub fn transformer() -> Transformer {
    Transformer::new(PathResolver::new(STORAGE, PLACEHOLDER), "Product image")
}

/// A client over `mock`, plus a handle to inspect the recorded requests.
pub fn mock_client(mock: MockTransport) -> (GalleryClient, Arc<MockTransport>) {
    let mock = Arc::new(mock);
    let client = GalleryClient::with_transport(&test_config(), mock.clone()).unwrap();
    (client, mock)
}

// =========================================================================
// Lookups: panic with a clear message on miss
// =========================================================================

/// Find a collection by name. Panics if not found.
pub fn find_collection<'a>(collections: &'a [Collection], name: &str) -> &'a Collection {
    collections
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| {
            let names = collection_names(collections);
            panic!("collection '{name}' not found. Available: {names:?}")
        })
}

/// Find an album by name. Panics if not found.
pub fn find_album<'a>(albums: &'a [Album], name: &str) -> &'a Album {
    albums.iter().find(|a| a.name == name).unwrap_or_else(|| {
        let names: Vec<&str> = albums.iter().map(|a| a.name.as_str()).collect();
        panic!("album '{name}' not found. Available: {names:?}")
    })
}

/// Find an image by id within an album. Panics if not found.
pub fn find_image<'a>(album: &'a Album, id: &str) -> &'a Image {
    album.images.iter().find(|i| i.id == id).unwrap_or_else(|| {
        let ids: Vec<&str> = album.images.iter().map(|i| i.id.as_str()).collect();
        panic!(
            "image '{id}' not found in album '{}'. Available: {ids:?}",
            album.name
        )
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All collection names in order.
pub fn collection_names(collections: &[Collection]) -> Vec<&str> {
    collections.iter().map(|c| c.name.as_str()).collect()
}

/// All album names of a collection in order.
pub fn album_names(collection: &Collection) -> Vec<&str> {
    collection.albums.iter().map(|a| a.name.as_str()).collect()
}

/// All image titles in album order.
pub fn image_titles(album: &Album) -> Vec<Option<&str>> {
    album.images.iter().map(|i| i.title.as_deref()).collect()
}
