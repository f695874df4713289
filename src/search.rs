//! Client-side search over already-fetched collections.
//!
//! Walks collections → albums → images in order and collects album names
//! and image titles that contain the query, ignoring case. For each album
//! the album hit (if any) comes before its image hits. Results stop at the
//! configured maximum.

use crate::config::SearchConfig;
use crate::types::{Album, Collection, Image};
use serde::Serialize;

/// One search result, labelled with the collection it was found in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum SearchHit<'a> {
    Album {
        album: &'a Album,
        collection_name: &'a str,
    },
    Image {
        image: &'a Image,
        album: &'a Album,
        collection_name: &'a str,
    },
}

impl<'a> SearchHit<'a> {
    pub fn album(&self) -> &'a Album {
        match *self {
            SearchHit::Album { album, .. } | SearchHit::Image { album, .. } => album,
        }
    }

    pub fn collection_name(&self) -> &'a str {
        match *self {
            SearchHit::Album {
                collection_name, ..
            }
            | SearchHit::Image {
                collection_name, ..
            } => collection_name,
        }
    }

    /// Text that matched: the album name or the image title.
    pub fn label(&self) -> &'a str {
        match *self {
            SearchHit::Album { album, .. } => &album.name,
            SearchHit::Image { image, .. } => image.title.as_deref().unwrap_or_default(),
        }
    }
}

/// Search `collections` for `query`.
///
/// The query is trimmed; anything shorter than `config.min_query_len`
/// characters matches nothing. Images without a title never match.
pub fn search<'a>(
    collections: &'a [Collection],
    query: &str,
    config: &SearchConfig,
) -> Vec<SearchHit<'a>> {
    let query = query.trim();
    if query.chars().count() < config.min_query_len {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    let matches = |text: &str| text.to_lowercase().contains(&needle);

    collections
        .iter()
        .flat_map(move |collection| {
            let collection_name = collection.name.as_str();
            collection.albums.iter().flat_map(move |album| {
                let album_hit = matches(&album.name).then_some(SearchHit::Album {
                    album,
                    collection_name,
                });
                let image_hits = album
                    .images
                    .iter()
                    .filter(move |image| image.title.as_deref().is_some_and(matches))
                    .map(move |image| SearchHit::Image {
                        image,
                        album,
                        collection_name,
                    });
                album_hit.into_iter().chain(image_hits)
            })
        })
        .take(config.max_results)
        .collect()
}
