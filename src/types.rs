//! Normalized gallery entities.
//!
//! These are the stable shapes the rest of the crate (and any presentation
//! layer) works with, independent of how the API happened to spell things.
//! Every value is built fresh by [`crate::transform`] on each fetch and never
//! mutated afterwards.
//!
//! Ownership runs strictly downwards: a [`Collection`] owns its [`Album`]s and
//! an album owns its [`Image`]s. Upward links are plain foreign keys
//! ([`ImageOwner`], [`CollectionRef`]) so there are no cycles.

use serde::{Deserialize, Serialize};

/// An image ready for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Image {
    pub id: String,
    /// Absolute display URL. Never empty: falls back to the placeholder.
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Alt text: the title, or the configured default when untitled.
    pub alt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<ImageOwner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Back-reference from an image to the album that holds it.
///
/// Only keys, never the album itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageOwner {
    pub album_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection_id: Option<String>,
}

/// Summary of a collection embedded in an album response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRef {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Album {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Absolute cover URL. Never empty.
    pub cover_image: String,
    pub collection_id: String,
    /// Denormalized collection label, when the API embedded one or the
    /// album was loaded through its collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<CollectionRef>,
    /// Images in API order. Empty on list endpoints that don't embed them.
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Album {
    pub fn collection_name(&self) -> Option<&str> {
        self.collection.as_ref().map(|c| c.name.as_str())
    }

    /// Number of images, preferring the server's count over what was embedded.
    pub fn image_count(&self) -> u64 {
        self.images_count.unwrap_or(self.images.len() as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Absolute cover URL. Never empty.
    pub cover_image: String,
    /// Albums in API order. Empty when albums are loaded lazily.
    #[serde(default)]
    pub albums: Vec<Album>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub albums_count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl Collection {
    pub fn album_count(&self) -> u64 {
        self.albums_count.unwrap_or(self.albums.len() as u64)
    }
}

/// A curated image shown on the landing view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeaturedImage {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub position: i64,
    pub url: String,
    pub is_active: bool,
}

/// Pagination metadata as reported by a list endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub per_page: u32,
    pub total: u64,
    /// 1-based index of the first item on this page, 0 when the page is empty.
    pub from: u64,
    /// 1-based index of the last item on this page, 0 when the page is empty.
    pub to: u64,
}

impl PaginationMeta {
    /// Number of pages needed for `total` items, never less than one.
    pub fn page_count(total: u64, per_page: u32) -> u32 {
        if per_page == 0 {
            return 1;
        }
        let pages = total.div_ceil(u64::from(per_page)).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    /// Build metadata from counts the way a Laravel-style paginator would.
    pub fn from_counts(current_page: u32, per_page: u32, total: u64) -> Self {
        let last_page = Self::page_count(total, per_page);
        let start = u64::from(current_page.saturating_sub(1)) * u64::from(per_page);
        let (from, to) = if start < total {
            (start + 1, (start + u64::from(per_page)).min(total))
        } else {
            (0, 0)
        };
        Self {
            current_page,
            last_page,
            per_page,
            total,
            from,
            to,
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page
    }
}

/// One page of transformed records with its metadata.
///
/// List operations return `Option<Paginated<T>>`: either both halves are
/// present or the whole page is absent because the fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub meta: PaginationMeta,
}

impl<T> Paginated<T> {
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paginated<U> {
        Paginated {
            data: self.data.into_iter().map(f).collect(),
            meta: self.meta,
        }
    }

    /// The records of a page, or nothing when the fetch failed.
    pub fn items_or_empty(page: Option<Self>) -> Vec<T> {
        page.map(|p| p.data).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_count_rounds_up() {
        assert_eq!(PaginationMeta::page_count(40, 15), 3);
        assert_eq!(PaginationMeta::page_count(45, 15), 3);
        assert_eq!(PaginationMeta::page_count(46, 15), 4);
    }

    #[test]
    fn page_count_is_at_least_one() {
        assert_eq!(PaginationMeta::page_count(0, 15), 1);
        assert_eq!(PaginationMeta::page_count(10, 0), 1);
    }

    #[test]
    fn from_counts_middle_page() {
        let meta = PaginationMeta::from_counts(2, 15, 40);
        assert_eq!(meta.last_page, 3);
        assert_eq!(meta.from, 16);
        assert_eq!(meta.to, 30);
        assert!(meta.has_previous());
        assert!(meta.has_next());
    }

    #[test]
    fn from_counts_last_page_is_partial() {
        let meta = PaginationMeta::from_counts(3, 15, 40);
        assert_eq!((meta.from, meta.to), (31, 40));
        assert!(!meta.has_next());
    }

    #[test]
    fn from_counts_past_the_end_is_empty() {
        let meta = PaginationMeta::from_counts(9, 15, 40);
        assert_eq!((meta.from, meta.to), (0, 0));
    }

    #[test]
    fn items_or_empty_on_failure() {
        let failed: Option<Paginated<u8>> = None;
        assert!(Paginated::items_or_empty(failed).is_empty());

        let page = Paginated {
            data: vec![1u8, 2],
            meta: PaginationMeta::from_counts(1, 2, 2),
        };
        assert_eq!(Paginated::items_or_empty(Some(page)), vec![1, 2]);
    }

    #[test]
    fn album_prefers_server_image_count() {
        let album = Album {
            id: "1".into(),
            name: "Travel".into(),
            description: None,
            slug: None,
            cover_image: "https://x.test/c.jpg".into(),
            collection_id: "9".into(),
            collection: None,
            images: Vec::new(),
            images_count: Some(12),
            created_at: None,
            updated_at: None,
        };
        assert_eq!(album.image_count(), 12);
    }
}
