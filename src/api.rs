//! Wire records and envelope decoding for the gallery REST API.
//!
//! Every endpoint wraps its payload in an envelope:
//!
//! ```text
//! GET /collections?page=2&per_page=15  →  { "data": [ ... ], "meta": { current_page, last_page, ... } }
//! GET /collections/7                   →  { "data": { ... } }
//! ```
//!
//! The records inside are loosely typed. Ids arrive as numbers or strings,
//! most fields are optional, and image references use several field names.
//! The structs here accept all of that and leave interpretation to
//! [`crate::transform`].
//!
//! Tolerances:
//! - A list endpoint whose `data` is a single object is read as a one-item list.
//! - Each list element is decoded on its own; malformed elements are dropped.
//! - Pagination fields are read from `meta`, or from the top level of the
//!   body for paginators that don't nest them. `from`/`to` may be `null`.

use crate::types::PaginationMeta;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Response has no `data` field")]
    MissingData,
    #[error("Response has no pagination metadata")]
    MissingMeta,
}

/// A record id as sent by the API: numeric or textual.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ApiId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ApiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiId::Number(n) => write!(f, "{n}"),
            ApiId::Text(s) => f.write_str(s),
        }
    }
}

/// Convert an optional id to a string, treating blank text ids as absent.
pub fn id_string(id: Option<&ApiId>) -> Option<String> {
    id.map(ApiId::to_string).filter(|s| !s.trim().is_empty())
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiCollection {
    pub id: Option<ApiId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub cover_image: Option<String>,
    pub cover_image_url: Option<String>,
    pub albums: Option<Vec<ApiAlbum>>,
    pub albums_count: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Collection summary some album endpoints embed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiCollectionRef {
    pub id: Option<ApiId>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiAlbum {
    pub id: Option<ApiId>,
    pub title: Option<String>,
    /// Older endpoints call the album title `name`.
    pub name: Option<String>,
    pub description: Option<String>,
    pub slug: Option<String>,
    pub collection_id: Option<ApiId>,
    pub collection: Option<ApiCollectionRef>,
    pub cover_image: Option<String>,
    pub cover_image_url: Option<String>,
    pub images: Option<Vec<ApiImage>>,
    pub images_count: Option<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Album keys some image endpoints embed.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiAlbumRef {
    pub id: Option<ApiId>,
    pub collection_id: Option<ApiId>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiImage {
    pub id: Option<ApiId>,
    pub title: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub filename: Option<String>,
    pub original_url: Option<String>,
    pub album_id: Option<ApiId>,
    pub collection_id: Option<ApiId>,
    pub album: Option<ApiAlbumRef>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl ApiImage {
    /// Image reference candidates in priority order.
    ///
    /// `image_url` is what current endpoints send; the rest are legacy names.
    pub fn path_candidates(&self) -> [Option<&str>; 5] {
        [
            self.image_url.as_deref(),
            self.image_path.as_deref(),
            self.path.as_deref(),
            self.url.as_deref(),
            self.filename.as_deref(),
        ]
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiFeaturedImage {
    pub id: Option<ApiId>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<i64>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

/// Pagination fields with every value optional and nullable.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiPaginationMeta {
    pub current_page: Option<u32>,
    pub last_page: Option<u32>,
    pub per_page: Option<u32>,
    pub total: Option<u64>,
    pub from: Option<u64>,
    pub to: Option<u64>,
}

impl ApiPaginationMeta {
    /// Normalize. `total` and `per_page` are required; everything else can
    /// be derived from them.
    pub fn normalize(self) -> Option<PaginationMeta> {
        let total = self.total?;
        let per_page = self.per_page?;
        let current_page = self.current_page.unwrap_or(1);
        let derived = PaginationMeta::from_counts(current_page, per_page, total);
        Some(PaginationMeta {
            current_page,
            last_page: self.last_page.unwrap_or(derived.last_page),
            per_page,
            total,
            from: self.from.unwrap_or(derived.from),
            to: self.to.unwrap_or(derived.to),
        })
    }
}

fn take_data(body: &mut Value) -> Result<Value, DecodeError> {
    match body.get_mut("data").map(Value::take) {
        None | Some(Value::Null) => Err(DecodeError::MissingData),
        Some(data) => Ok(data),
    }
}

/// Decode the `data` record of a detail response.
pub fn decode_detail<T: DeserializeOwned>(mut body: Value) -> Result<T, DecodeError> {
    let data = take_data(&mut body)?;
    Ok(serde_json::from_value(data)?)
}

/// Decode the `data` records of a list response, dropping malformed ones.
pub fn decode_list<T: DeserializeOwned>(body: &mut Value) -> Result<Vec<T>, DecodeError> {
    let items = match take_data(body)? {
        Value::Array(items) => items,
        single @ Value::Object(_) => vec![single],
        other => {
            return Err(DecodeError::Json(serde::de::Error::custom(format!(
                "expected `data` to be a list, got {other}"
            ))));
        }
    };

    let total = items.len();
    let records: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(record) => Some(record),
            Err(err) => {
                debug!("dropping malformed record {idx} of {total}: {err}");
                None
            }
        })
        .collect();
    Ok(records)
}

/// Read pagination metadata from `meta`, or from the body's top level.
pub fn decode_meta(body: &Value) -> Result<PaginationMeta, DecodeError> {
    let source = match body.get("meta") {
        Some(meta @ Value::Object(_)) => meta,
        _ => body,
    };
    let raw: ApiPaginationMeta = serde_json::from_value(source.clone())?;
    raw.normalize().ok_or(DecodeError::MissingMeta)
}
