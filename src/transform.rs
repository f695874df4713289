//! Mapping raw API records to normalized entities.
//!
//! All transforms are pure and total: no I/O, and an absent field never
//! causes a failure. The single validation gate is
//! [`Transformer::collection`], which rejects records without an id or a
//! name. Batch callers filter those out instead of failing the page.
//!
//! ## Cover resolution
//!
//! Each field is resolved independently; the first source that yields a
//! value wins:
//!
//! - **Album cover**: `cover_image_url` → `cover_image` (storage path) →
//!   first image → placeholder
//! - **Collection cover**: `cover_image_url` → `cover_image` → first
//!   album's first image → placeholder
//! - **Image URL**: `image_url` → `image_path` → `path` → `url` →
//!   `filename` → placeholder
//! - **Image alt**: title → configured default
//!
//! ## Back-references
//!
//! Images keep an [`ImageOwner`] key pair pointing at their album, and
//! albums keep a [`CollectionRef`]. Images transformed as part of an album
//! always take that album's keys, whatever the image record itself says.

use crate::api::{ApiAlbum, ApiCollection, ApiFeaturedImage, ApiImage, id_string};
use crate::resolve::PathResolver;
use crate::types::{Album, Collection, CollectionRef, FeaturedImage, Image, ImageOwner};
use tracing::debug;

/// Applies the normalization rules with a fixed resolver and alt text.
#[derive(Debug, Clone)]
pub struct Transformer {
    resolver: PathResolver,
    default_alt: String,
}

/// A display field as received. Blank counts as absent; nothing is trimmed.
fn text(value: Option<&str>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).map(String::from)
}

impl Transformer {
    pub fn new(resolver: PathResolver, default_alt: impl Into<String>) -> Self {
        Self {
            resolver,
            default_alt: default_alt.into(),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.resolver
    }

    /// Normalize a standalone image, taking its owner from the record.
    pub fn image(&self, raw: ApiImage) -> Image {
        let owner = Self::owner_from_record(&raw);
        self.image_with_owner(raw, owner)
    }

    fn owner_from_record(raw: &ApiImage) -> Option<ImageOwner> {
        let embedded = raw.album.as_ref();
        let album_id = id_string(raw.album_id.as_ref())
            .or_else(|| id_string(embedded.and_then(|a| a.id.as_ref())))?;
        let collection_id = id_string(raw.collection_id.as_ref())
            .or_else(|| id_string(embedded.and_then(|a| a.collection_id.as_ref())));
        Some(ImageOwner {
            album_id,
            collection_id,
        })
    }

    fn image_with_owner(&self, raw: ApiImage, owner: Option<ImageOwner>) -> Image {
        let url = self.resolver.resolve(&raw.path_candidates());
        let title = text(raw.title.as_deref());
        let alt = title.clone().unwrap_or_else(|| self.default_alt.clone());
        Image {
            id: id_string(raw.id.as_ref()).unwrap_or_default(),
            url,
            title,
            alt,
            original_url: text(raw.original_url.as_deref()),
            owner,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }

    /// Normalize an album and the images embedded in it.
    pub fn album(&self, raw: ApiAlbum) -> Album {
        let id = id_string(raw.id.as_ref()).unwrap_or_default();
        let embedded = raw.collection.as_ref();
        let collection_id = id_string(raw.collection_id.as_ref())
            .or_else(|| id_string(embedded.and_then(|c| c.id.as_ref())))
            .unwrap_or_default();
        let collection = embedded.and_then(|c| {
            let name = text(c.name.as_deref())?;
            let id = id_string(c.id.as_ref()).unwrap_or_else(|| collection_id.clone());
            Some(CollectionRef { id, name })
        });

        let owner = ImageOwner {
            album_id: id.clone(),
            collection_id: Some(collection_id.clone()).filter(|c| !c.is_empty()),
        };
        let images: Vec<Image> = raw
            .images
            .unwrap_or_default()
            .into_iter()
            .map(|image| self.image_with_owner(image, Some(owner.clone())))
            .collect();

        let cover_image = self
            .resolver
            .try_resolve(&[raw.cover_image_url.as_deref(), raw.cover_image.as_deref()])
            .or_else(|| images.first().map(|image| image.url.clone()))
            .unwrap_or_else(|| self.resolver.placeholder().to_string());

        Album {
            name: text(raw.title.as_deref())
                .or_else(|| text(raw.name.as_deref()))
                .unwrap_or_default(),
            id,
            description: text(raw.description.as_deref()),
            slug: text(raw.slug.as_deref()),
            cover_image,
            collection_id,
            collection,
            images,
            images_count: raw.images_count,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        }
    }

    /// Normalize a collection, or `None` when it has no id or no name.
    pub fn collection(&self, raw: ApiCollection) -> Option<Collection> {
        let (Some(id), Some(name)) = (id_string(raw.id.as_ref()), text(raw.name.as_deref())) else {
            debug!("rejecting collection without id or name: id={:?}", raw.id);
            return None;
        };
        let summary = CollectionRef {
            id: id.clone(),
            name: name.clone(),
        };

        let albums: Vec<Album> = raw
            .albums
            .unwrap_or_default()
            .into_iter()
            .map(|album| self.album(album))
            .map(|album| Self::attach_collection(album, &summary))
            .collect();

        let cover_image = self
            .resolver
            .try_resolve(&[raw.cover_image_url.as_deref(), raw.cover_image.as_deref()])
            .or_else(|| {
                albums
                    .first()
                    .and_then(|album| album.images.first())
                    .map(|image| image.url.clone())
            })
            .unwrap_or_else(|| self.resolver.placeholder().to_string());

        Some(Collection {
            id,
            name,
            slug: text(raw.slug.as_deref()),
            description: text(raw.description.as_deref()),
            cover_image,
            albums,
            albums_count: raw.albums_count,
            created_at: raw.created_at,
            updated_at: raw.updated_at,
        })
    }

    /// Normalize a batch of collections, dropping invalid records.
    pub fn collections(&self, raw: Vec<ApiCollection>) -> Vec<Collection> {
        raw.into_iter().filter_map(|c| self.collection(c)).collect()
    }

    /// Fill in the collection key on an album that was requested under
    /// `/collections/{collection_id}` but did not carry one.
    pub fn assign_collection_id(mut album: Album, collection_id: &str) -> Album {
        if album.collection_id.is_empty() {
            album.collection_id = collection_id.to_string();
            for image in &mut album.images {
                if let Some(owner) = image.owner.as_mut() {
                    owner
                        .collection_id
                        .get_or_insert_with(|| collection_id.to_string());
                }
            }
        }
        album
    }

    /// Give an image requested under `/albums/{album_id}` an owner when the
    /// record named none.
    pub fn assign_album_id(mut image: Image, album_id: &str) -> Image {
        image.owner.get_or_insert_with(|| ImageOwner {
            album_id: album_id.to_string(),
            collection_id: None,
        });
        image
    }

    /// Fill in collection keys on an album loaded through that collection.
    pub fn attach_collection(album: Album, collection: &CollectionRef) -> Album {
        let mut album = Self::assign_collection_id(album, &collection.id);
        if album.collection.is_none() && album.collection_id == collection.id {
            album.collection = Some(collection.clone());
        }
        album
    }

    pub fn featured(&self, raw: ApiFeaturedImage) -> FeaturedImage {
        FeaturedImage {
            id: id_string(raw.id.as_ref()).unwrap_or_default(),
            title: text(raw.title.as_deref()).unwrap_or_default(),
            description: text(raw.description.as_deref()),
            position: raw.position.unwrap_or(0),
            url: self.resolver.resolve(&[raw.image_url.as_deref()]),
            is_active: raw.is_active.unwrap_or(true),
        }
    }
}
