//! Client configuration.
//!
//! Handles loading, validating, and merging `gallery.toml`. Stock defaults
//! are the base layer; a user file overrides only the keys it names.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [api]
//! base_url = "https://akbag.elev8xr.com/api"        # JSON API root
//! storage_url = "https://akbag.elev8xr.com/storage" # Base for relative image paths
//! # timeout_secs = 30                               # Omit for no client-side timeout
//!
//! [images]
//! placeholder_url = "https://images.pexels.com/..." # Shown when no image resolves
//! default_alt = "Product image"                     # Alt text for untitled images
//!
//! [pagination]
//! per_page = 15             # Items requested per page
//! window = 5                # Page buttons shown around the current page
//!
//! [search]
//! min_query_len = 2         # Shorter queries return nothing
//! max_results = 10          # Hits returned per query
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Default config file name looked up in the working directory.
pub const CONFIG_FILE: &str = "gallery.toml";

/// Client configuration loaded from `gallery.toml`.
///
/// All fields have defaults. Unknown keys are rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
    /// Where the API and the image storage live.
    pub api: ApiConfig,
    /// Placeholder and alt-text fallbacks.
    pub images: ImagesConfig,
    /// Page size and page-button window.
    pub pagination: PaginationConfig,
    /// Client-side search limits.
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    /// Root of the JSON API; endpoint paths are appended to it.
    pub base_url: String,
    /// Root that relative image paths are joined onto.
    pub storage_url: String,
    /// Whole-request timeout. `None` leaves requests unbounded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://akbag.elev8xr.com/api".to_string(),
            storage_url: "https://akbag.elev8xr.com/storage".to_string(),
            timeout_secs: None,
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    pub placeholder_url: String,
    pub default_alt: String,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            placeholder_url: "https://images.pexels.com/photos/1152077/pexels-photo-1152077.jpeg?auto=compress&cs=tinysrgb&w=800".to_string(),
            default_alt: "Product image".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PaginationConfig {
    pub per_page: u32,
    /// Number of page buttons in the sliding window (excluding first/last).
    pub window: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            per_page: 15,
            window: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub min_query_len: usize,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_query_len: 2,
            max_results: 10,
        }
    }
}

fn validate_http_url(key: &str, value: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::Validation(format!("{key} is not a valid URL: {e}")))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::Validation(format!(
            "{key} must be an http(s) URL"
        )));
    }
    Ok(())
}

impl ClientConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_http_url("api.base_url", &self.api.base_url)?;
        validate_http_url("api.storage_url", &self.api.storage_url)?;
        if self.api.timeout_secs == Some(0) {
            return Err(ConfigError::Validation(
                "api.timeout_secs must be positive (omit it for no timeout)".into(),
            ));
        }
        if self.images.placeholder_url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "images.placeholder_url must not be empty".into(),
            ));
        }
        if self.pagination.per_page == 0 {
            return Err(ConfigError::Validation(
                "pagination.per_page must be at least 1".into(),
            ));
        }
        if self.pagination.window == 0 {
            return Err(ConfigError::Validation(
                "pagination.window must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ClientConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ClientConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ClientConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load a config file.
///
/// Returns `Err` if the file is missing, is invalid TOML, has unknown keys,
/// or fails validation.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Load `path` if given, else `gallery.toml` in `dir` if present, else defaults.
pub fn discover_config(path: Option<&Path>, dir: &Path) -> Result<ClientConfig, ConfigError> {
    match path {
        Some(explicit) => load_config(explicit),
        None => {
            let implicit = dir.join(CONFIG_FILE);
            if implicit.exists() {
                load_config(&implicit)
            } else {
                resolve_config(None)
            }
        }
    }
}

/// Returns a fully-commented stock `gallery.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Gallery Client Configuration
# ============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# API endpoints
# ---------------------------------------------------------------------------
[api]
# Root of the JSON API. Endpoint paths (/collections, /albums, ...) are
# appended to it.
base_url = "https://akbag.elev8xr.com/api"

# Root that relative image paths from the API are joined onto.
# Absolute image URLs are used as-is.
storage_url = "https://akbag.elev8xr.com/storage"

# Whole-request timeout in seconds.
# Omit or comment out to never time out on the client side.
# timeout_secs = 30

# ---------------------------------------------------------------------------
# Image fallbacks
# ---------------------------------------------------------------------------
[images]
# Shown wherever no image reference resolves (covers, broken records).
placeholder_url = "https://images.pexels.com/photos/1152077/pexels-photo-1152077.jpeg?auto=compress&cs=tinysrgb&w=800"

# Alt text for images without a title.
default_alt = "Product image"

# ---------------------------------------------------------------------------
# Pagination
# ---------------------------------------------------------------------------
[pagination]
# Items requested per page. The server may cap this.
per_page = 15

# Page buttons shown around the current page. First and last page are
# always shown on top of these, with "..." for any gap.
window = 5

# ---------------------------------------------------------------------------
# Search
# ---------------------------------------------------------------------------
[search]
# Queries shorter than this return nothing.
min_query_len = 2

# Maximum hits returned per query.
max_results = 10
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_has_endpoints() {
        let config = ClientConfig::default();
        assert_eq!(config.api.base_url, "https://akbag.elev8xr.com/api");
        assert_eq!(config.api.storage_url, "https://akbag.elev8xr.com/storage");
        assert_eq!(config.api.timeout(), None);
    }

    #[test]
    fn default_config_has_pagination_settings() {
        let config = ClientConfig::default();
        assert_eq!(config.pagination.per_page, 15);
        assert_eq!(config.pagination.window, 5);
        assert_eq!(config.search.min_query_len, 2);
        assert_eq!(config.search.max_results, 10);
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(ClientConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[pagination]
per_page = 30
"#;
        let config: ClientConfig = toml::from_str(toml).unwrap();
        // Overridden value
        assert_eq!(config.pagination.per_page, 30);
        // Default values preserved
        assert_eq!(config.pagination.window, 5);
        assert_eq!(config.images.default_alt, "Product image");
    }

    #[test]
    fn timeout_converts_to_duration() {
        let toml = r#"
[api]
timeout_secs = 12
"#;
        let config: ClientConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(12)));
    }

    // =========================================================================
    // validation
    // =========================================================================

    #[test]
    fn validate_rejects_relative_base_url() {
        let mut config = ClientConfig::default();
        config.api.base_url = "/api".into();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_non_http_storage() {
        let mut config = ClientConfig::default();
        config.api.storage_url = "ftp://files.example.com".into();
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("api.storage_url"));
    }

    #[test]
    fn validate_rejects_zero_per_page() {
        let mut config = ClientConfig::default();
        config.pagination.per_page = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_window_and_timeout() {
        let mut config = ClientConfig::default();
        config.pagination.window = 0;
        assert!(config.validate().is_err());

        let mut config = ClientConfig::default();
        config.api.timeout_secs = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_blank_placeholder() {
        let mut config = ClientConfig::default();
        config.images.placeholder_url = "  ".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml
    // =========================================================================

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[pagination]
per_page = 15
window = 5
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r#"
[pagination]
window = 7
"#,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let pagination = merged.get("pagination").unwrap();
        assert_eq!(pagination.get("window").unwrap().as_integer(), Some(7));
        // per_page preserved from base
        assert_eq!(pagination.get("per_page").unwrap().as_integer(), Some(15));
    }

    #[test]
    fn merge_toml_scalar_replaces_table() {
        let base: toml::Value = toml::from_str("[a]\nb = 1").unwrap();
        let overlay: toml::Value = toml::from_str("a = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("a").unwrap().as_integer(), Some(3));
    }

    // =========================================================================
    // Unknown key rejection
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let toml_str = r#"
[pagination]
per_pgae = 20
"#;
        let result: Result<ClientConfig, _> = toml::from_str(toml_str);
        let err = result.unwrap_err().to_string();
        assert!(err.contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<ClientConfig, _> = toml::from_str("[paging]\nper_page = 2\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // load_config / discover_config
    // =========================================================================

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(
            &path,
            r#"
[api]
base_url = "http://localhost:8000/api"

[search]
max_results = 3
"#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000/api");
        assert_eq!(config.search.max_results, 3);
        // Unspecified values should be defaults
        assert_eq!(config.api.storage_url, "https://akbag.elev8xr.com/storage");
    }

    #[test]
    fn load_config_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "this is not [valid toml").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join(CONFIG_FILE);
        fs::write(&path, "[pagination]\nper_page = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn discover_config_defaults_without_file() {
        let tmp = TempDir::new().unwrap();
        let config = discover_config(None, tmp.path()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn discover_config_finds_file_in_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[pagination]\nwindow = 3\n").unwrap();
        let config = discover_config(None, tmp.path()).unwrap();
        assert_eq!(config.pagination.window, 3);
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let config: ClientConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, ClientConfig::default());
    }
}
