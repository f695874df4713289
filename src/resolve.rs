//! Image path and URL resolution.
//!
//! The API is inconsistent about where it puts an image reference. The same
//! concept arrives as `image_url`, `image_path`, `path`, `url` or `filename`
//! depending on the endpoint and its age, and the value may be an absolute
//! URL or a path relative to the static storage host.
//!
//! ## Resolution priority
//!
//! Candidates are scanned in a fixed order and the first non-empty value
//! wins. Empty and whitespace-only strings count as absent.
//!
//! ```text
//! image:       resolve(&[image_url, image_path, path, url, filename])
//! album cover: resolve(&[cover_image_url, cover_image]) → first image → placeholder
//! ```
//!
//! ## Joining
//!
//! - Values starting with `http://` or `https://` are returned unchanged.
//! - Anything else is joined onto the storage base with exactly one `/`.
//!   No `..` normalization happens; the storage host owns that.
//! - When nothing resolves, the configured placeholder is returned, so a
//!   resolved URL is never empty.

use tracing::debug;

/// URL prefixes that mark a candidate as already absolute.
const ABSOLUTE_SCHEMES: &[&str] = &["http://", "https://"];

/// Return the first candidate that is present and not blank.
///
/// This is the core fallback operation shared by every field that has
/// several possible sources. Values are trimmed.
pub fn first_present<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .filter_map(|opt| opt.map(str::trim).filter(|s| !s.is_empty()))
        .next()
}

/// Whether `value` already carries a recognized absolute scheme.
pub fn is_absolute(value: &str) -> bool {
    ABSOLUTE_SCHEMES.iter().any(|scheme| {
        value
            .get(..scheme.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
    })
}

/// Join a relative storage path onto `base` with a single separating slash.
pub fn join_storage(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Turns raw API image references into display URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathResolver {
    storage_url: String,
    placeholder: String,
}

impl PathResolver {
    pub fn new(storage_url: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            storage_url: storage_url.into(),
            placeholder: placeholder.into(),
        }
    }

    pub fn storage_url(&self) -> &str {
        &self.storage_url
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    /// Resolve candidates to a URL, if any of them is present.
    ///
    /// Unlike [`resolve`](Self::resolve) this does not fall back to the
    /// placeholder, so callers can continue their own fallback chain.
    pub fn try_resolve(&self, candidates: &[Option<&str>]) -> Option<String> {
        first_present(candidates).map(|value| self.absolutize(value))
    }

    /// Resolve candidates to a URL, falling back to the placeholder.
    pub fn resolve(&self, candidates: &[Option<&str>]) -> String {
        self.try_resolve(candidates).unwrap_or_else(|| {
            debug!("no image reference among {} candidates, using placeholder", candidates.len());
            self.placeholder.clone()
        })
    }

    fn absolutize(&self, value: &str) -> String {
        if is_absolute(value) {
            value.to_string()
        } else {
            join_storage(&self.storage_url, value)
        }
    }
}
