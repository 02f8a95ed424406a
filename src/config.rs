//! Site configuration.
//!
//! Every gallery publishes a `config.json` next to its root folder
//! descriptor. The raw document ([`SiteConfig`]) has gone through several
//! generator versions with different field spellings, so each field accepts
//! both the current and the legacy name. [`Site`] is the resolved form the
//! rest of the crate consumes: the size table is keyed by size name with its
//! directory and filename prefix precomputed, the storage base is parsed,
//! and the working directory is derived from the base URL.
//!
//! ## Working directory
//!
//! A site may live below the origin root (`https://host/gallery/`). The
//! working directory is the last path segment of the base URL (`gallery`),
//! or the empty string for an origin-root site. URL ascension in
//! [`crate::resolve`] never walks above it.
//!
//! ## Validation
//!
//! The size names the config points at (thumbnail, display, downloads) must
//! exist in the size table. The original page deferred these lookups until
//! render and produced broken image URLs; here a bad reference fails the
//! load instead.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::transport::{self, Transport, TransportError};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("config validation error: {0}")]
    Validation(String),
    #[error("storage URL {0:?} is not a valid URL")]
    BadStorageUrl(String),
}

/// Raw `config.json` document.
///
/// Field names follow the current generator output; aliases cover the
/// earlier exported-identifier spelling so old sites keep rendering.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    #[serde(rename = "websiteTitle", alias = "WebsiteTitle")]
    pub website_title: String,
    /// Remote storage base URL, or `"local"` / `""` for same-site images.
    #[serde(rename = "storageURL", alias = "PhotoURLBase", default)]
    pub storage_url: String,
    #[serde(rename = "imageRoot", alias = "ImageRootDir")]
    pub image_root: String,
    #[serde(rename = "thumbnailSize", alias = "ThumbnailFrom")]
    pub thumbnail_size: String,
    #[serde(rename = "displayImageSize", alias = "DisplayImageFrom")]
    pub display_image_size: String,
    /// Whether the site ships a theme bundle under `theme/`.
    #[serde(rename = "theme", alias = "Theme", default)]
    pub theme: bool,
    #[serde(rename = "downloadableSizes", alias = "DownloadSizes", default)]
    pub downloadable_sizes: Vec<String>,
    #[serde(rename = "imageSizes", alias = "ImageSizes")]
    pub image_sizes: Vec<ImageSizeEntry>,
}

/// One entry of the raw size list.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageSizeEntry {
    #[serde(rename = "sizeName", alias = "SizeName")]
    pub size_name: String,
    /// Directory of this size, relative to the image root.
    #[serde(rename = "dir", alias = "Directory")]
    pub dir: String,
    /// Whether this size is always served from the site itself, even when a
    /// remote storage base is configured.
    #[serde(rename = "local", alias = "LocalBool", default)]
    pub local: bool,
}

/// Where photo files are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBase {
    /// Photos live next to the pages that show them.
    Local,
    /// Photos live under an external base URL.
    Remote(Url),
}

/// A resolved image size: where its files live and how they are named.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSize {
    /// Directory relative to a folder URL, `<imageRoot>/<dir>`.
    pub directory: String,
    /// Filename prefix, `<sizeName>_`.
    pub prefix: String,
    pub local: bool,
}

/// Resolved site configuration.
#[derive(Debug, Clone)]
pub struct Site {
    pub title: String,
    pub base_url: Url,
    /// Last path segment of the base URL; empty for origin-root sites.
    pub working_directory: String,
    pub storage: StorageBase,
    pub image_root: String,
    pub thumbnail_size: String,
    /// Display size name plus its filename prefix (empty for `src`).
    pub display_size: String,
    pub display_prefix: String,
    pub download_sizes: Vec<String>,
    pub sizes: BTreeMap<String, ImageSize>,
    pub theme: bool,
}

impl Site {
    /// Resolve a raw config against the base URL it was fetched from.
    pub fn from_config(config: SiteConfig, base_url: Url) -> Result<Self, ConfigError> {
        // Folder pages live at directory URLs; keep the base in that form.
        let mut base_url = base_url;
        if !base_url.path().ends_with('/')
            && let Ok(mut segments) = base_url.path_segments_mut()
        {
            segments.push("");
        }
        let mut sizes = BTreeMap::new();
        for entry in &config.image_sizes {
            // Scaled files are named "<size>_<photo>"; the src directory
            // holds the originals under their own names.
            let prefix = if entry.size_name == "src" {
                String::new()
            } else {
                format!("{}_", entry.size_name)
            };
            sizes.insert(
                entry.size_name.clone(),
                ImageSize {
                    directory: format!("{}/{}", config.image_root, entry.dir),
                    prefix,
                    local: entry.local,
                },
            );
        }

        let storage = match config.storage_url.as_str() {
            "" | "local" => StorageBase::Local,
            remote => StorageBase::Remote(
                Url::parse(remote).map_err(|_| ConfigError::BadStorageUrl(remote.to_string()))?,
            ),
        };

        // "src" photos carry no size prefix: they are the originals.
        let display_prefix = if config.display_image_size == "src" {
            String::new()
        } else {
            format!("{}_", config.display_image_size)
        };

        let site = Site {
            title: config.website_title,
            working_directory: working_directory(&base_url),
            base_url,
            storage,
            image_root: config.image_root,
            thumbnail_size: config.thumbnail_size,
            display_size: config.display_image_size,
            display_prefix,
            download_sizes: config.downloadable_sizes,
            sizes,
            theme: config.theme,
        };
        site.validate()?;
        Ok(site)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::Validation(
                "imageSizes must not be empty".into(),
            ));
        }
        let mut referenced: Vec<&str> = vec![&self.thumbnail_size, &self.display_size];
        referenced.extend(self.download_sizes.iter().map(String::as_str));
        for name in referenced {
            if !self.sizes.contains_key(name) {
                return Err(ConfigError::Validation(format!(
                    "size {name:?} is referenced but not declared in imageSizes"
                )));
            }
        }
        Ok(())
    }

    /// Size table lookup.
    pub fn size(&self, name: &str) -> Option<&ImageSize> {
        self.sizes.get(name)
    }
}

/// Last non-empty path segment of the base URL.
fn working_directory(base_url: &Url) -> String {
    base_url
        .path_segments()
        .into_iter()
        .flatten()
        .filter(|segment| !segment.is_empty())
        .next_back()
        .unwrap_or("")
        .to_string()
}

/// Fetch and resolve the site configuration.
///
/// Tries `<base>/config.json`; when that fails and the base URL is below the
/// origin root, falls back to the origin's `config.json` (sites sometimes
/// publish the config only at the root).
pub fn load_site(transport: &dyn Transport, base_url: &Url) -> Result<Site, ConfigError> {
    let config_url = join(base_url, "config.json");
    match transport::fetch_json::<SiteConfig>(transport, &config_url) {
        Ok(config) => Site::from_config(config, base_url.clone()),
        Err(err) if base_url.path() != "/" => {
            tracing::warn!("config fetch failed at {config_url}, trying origin root: {err}");
            let mut origin = base_url.clone();
            origin.set_path("/config.json");
            origin.set_query(None);
            let config: SiteConfig = transport::fetch_json(transport, &origin)?;
            let mut root = base_url.clone();
            root.set_path("/");
            root.set_query(None);
            Site::from_config(config, root)
        }
        Err(err) => Err(err.into()),
    }
}

// =============================================================================
// Local CLI configuration (viewfinder.toml)
// =============================================================================

/// Local `viewfinder.toml`: where the site lives and how to render it.
///
/// Everything is optional — command-line flags override these values, and
/// built-in defaults cover the rest. Unknown keys are rejected to catch
/// typos early.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalConfig {
    /// Directory containing the gallery descriptors.
    pub site: Option<String>,
    /// Base URL the site is served from.
    pub base_url: Option<String>,
    /// Output directory for rendered pages.
    pub out: Option<String>,
    /// Theme setting overrides, layered over the site's theme bundle.
    pub theme: LocalTheme,
}

/// The `[theme]` table of `viewfinder.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LocalTheme {
    pub nav_range: Option<usize>,
    pub images_per_page: Option<usize>,
}

impl LocalTheme {
    /// The overrides as a JSON overlay for the theme settings merge.
    ///
    /// Only the keys that are actually set appear, so absent values never
    /// clobber what the site's theme bundle configured.
    pub fn as_overlay(&self) -> Option<serde_json::Value> {
        let mut map = serde_json::Map::new();
        if let Some(nav_range) = self.nav_range {
            map.insert("navRange".into(), nav_range.into());
        }
        if let Some(images_per_page) = self.images_per_page {
            map.insert("imagesPerPage".into(), images_per_page.into());
        }
        if map.is_empty() {
            None
        } else {
            Some(serde_json::Value::Object(map))
        }
    }
}

/// Load `viewfinder.toml` if it exists.
pub fn load_local_config(path: &Path) -> Result<Option<LocalConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)
        .map_err(|err| ConfigError::Validation(format!("{}: {err}", path.display())))?;
    let config: LocalConfig = toml::from_str(&content)
        .map_err(|err| ConfigError::Validation(format!("{}: {err}", path.display())))?;
    Ok(Some(config))
}

/// A fully-commented stock `viewfinder.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_local_toml() -> &'static str {
    r#"# Viewfinder Configuration
# ========================
# All settings are optional and overridden by command-line flags.
# Values shown below are the defaults.

# Directory containing the gallery descriptors.
site = "site"

# Base URL the site is served from. The last path segment becomes the
# working directory that bounds folder navigation.
base_url = "https://localhost/"

# Output directory for rendered pages.
out = "dist"

# ---------------------------------------------------------------------------
# Theme overrides
# ---------------------------------------------------------------------------
# Layered over the site's theme bundle (theme/theme.json), which in turn
# layers over the built-in defaults.
[theme]
# Maximum number of page links shown in the pagination bar.
# nav_range = 5

# Thumbnails per album page.
# images_per_page = 50
"#
}

/// Join a relative document name onto a directory URL.
///
/// Unlike [`Url::join`], this never drops the last path segment: the base is
/// treated as a directory whether or not it ends in `/`.
pub fn join(base: &Url, name: &str) -> Url {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .expect("gallery URLs are hierarchical");
        segments.pop_if_empty();
        for segment in name.split('/').filter(|s| !s.is_empty()) {
            segments.push(segment);
        }
    }
    url.set_query(None);
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::FsTransport;
    use std::fs;
    use tempfile::TempDir;

    const CURRENT: &str = r#"{
        "websiteTitle": "My Photos",
        "storageURL": "local",
        "imageRoot": "img",
        "thumbnailSize": "thumb",
        "displayImageSize": "large",
        "theme": false,
        "downloadableSizes": ["src", "large"],
        "imageSizes": [
            {"sizeName": "thumb", "dir": "thumb", "local": true},
            {"sizeName": "large", "dir": "large", "local": false},
            {"sizeName": "src", "dir": "src", "local": false}
        ]
    }"#;

    const LEGACY: &str = r#"{
        "WebsiteTitle": "Old Site",
        "PhotoURLBase": "",
        "ImageRootDir": "img",
        "ThumbnailFrom": "thumb",
        "DisplayImageFrom": "src",
        "ImageSizes": [
            {"SizeName": "thumb", "Directory": "t", "LocalBool": true},
            {"SizeName": "src", "Directory": "src"}
        ]
    }"#;

    fn base() -> Url {
        Url::parse("https://photos.example.com/gallery/").unwrap()
    }

    fn site_from(json: &str) -> Site {
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        Site::from_config(config, base()).unwrap()
    }

    // =========================================================================
    // Field normalization across versions
    // =========================================================================

    #[test]
    fn parses_current_spelling() {
        let site = site_from(CURRENT);
        assert_eq!(site.title, "My Photos");
        assert_eq!(site.storage, StorageBase::Local);
        assert_eq!(site.thumbnail_size, "thumb");
        assert_eq!(site.download_sizes, vec!["src", "large"]);
    }

    #[test]
    fn parses_legacy_spelling() {
        let site = site_from(LEGACY);
        assert_eq!(site.title, "Old Site");
        assert_eq!(site.storage, StorageBase::Local);
        let thumb = site.size("thumb").unwrap();
        assert_eq!(thumb.directory, "img/t");
        assert!(thumb.local);
    }

    // =========================================================================
    // Size table and prefixes
    // =========================================================================

    #[test]
    fn size_table_precomputes_directory_and_prefix() {
        let site = site_from(CURRENT);
        let large = site.size("large").unwrap();
        assert_eq!(large.directory, "img/large");
        assert_eq!(large.prefix, "large_");
        assert!(!large.local);
    }

    #[test]
    fn display_prefix_for_named_size() {
        let site = site_from(CURRENT);
        assert_eq!(site.display_prefix, "large_");
    }

    #[test]
    fn display_prefix_empty_for_src() {
        let site = site_from(LEGACY);
        assert_eq!(site.display_size, "src");
        assert_eq!(site.display_prefix, "");
    }

    // =========================================================================
    // Storage base
    // =========================================================================

    #[test]
    fn remote_storage_is_parsed() {
        let json = CURRENT.replace("\"local\"", "\"https://cdn.example.com/photos\"");
        let site = site_from(&json);
        match &site.storage {
            StorageBase::Remote(url) => {
                assert_eq!(url.as_str(), "https://cdn.example.com/photos")
            }
            other => panic!("expected remote storage, got {other:?}"),
        }
    }

    #[test]
    fn empty_storage_is_local() {
        let json = CURRENT.replace("\"local\"", "\"\"");
        assert_eq!(site_from(&json).storage, StorageBase::Local);
    }

    #[test]
    fn invalid_storage_url_is_an_error() {
        let json = CURRENT.replace("\"local\"", "\"not a url\"");
        let config: SiteConfig = serde_json::from_str(&json).unwrap();
        let err = Site::from_config(config, base()).unwrap_err();
        assert!(matches!(err, ConfigError::BadStorageUrl(_)));
    }

    // =========================================================================
    // Working directory derivation
    // =========================================================================

    #[test]
    fn working_directory_is_last_segment() {
        let site = site_from(CURRENT);
        assert_eq!(site.working_directory, "gallery");
    }

    #[test]
    fn working_directory_ignores_trailing_slash() {
        let url = Url::parse("https://photos.example.com/a/b/").unwrap();
        assert_eq!(working_directory(&url), "b");
    }

    #[test]
    fn working_directory_empty_at_origin_root() {
        let url = Url::parse("https://photos.example.com/").unwrap();
        assert_eq!(working_directory(&url), "");
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn missing_thumbnail_size_is_rejected() {
        let json = CURRENT.replace(
            "\"thumbnailSize\": \"thumb\"",
            "\"thumbnailSize\": \"huge\"",
        );
        let config: SiteConfig = serde_json::from_str(&json).unwrap();
        let err = Site::from_config(config, base()).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("huge"));
    }

    #[test]
    fn missing_download_size_is_rejected() {
        let json = CURRENT.replace(
            "\"downloadableSizes\": [\"src\", \"large\"]",
            "\"downloadableSizes\": [\"original\"]",
        );
        let config: SiteConfig = serde_json::from_str(&json).unwrap();
        assert!(Site::from_config(config, base()).is_err());
    }

    #[test]
    fn empty_size_table_is_rejected() {
        let json = r#"{
            "websiteTitle": "T",
            "imageRoot": "img",
            "thumbnailSize": "thumb",
            "displayImageSize": "src",
            "imageSizes": []
        }"#;
        let config: SiteConfig = serde_json::from_str(json).unwrap();
        let err = Site::from_config(config, base()).unwrap_err();
        assert!(err.to_string().contains("imageSizes"));
    }

    // =========================================================================
    // load_site
    // =========================================================================

    #[test]
    fn load_site_reads_config_at_base() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.json"), CURRENT).unwrap();
        let transport = FsTransport::new(tmp.path(), base());

        let site = load_site(&transport, &base()).unwrap();
        assert_eq!(site.title, "My Photos");
        assert_eq!(site.base_url, base());
    }

    #[test]
    fn load_site_missing_config_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let url = Url::parse("https://photos.example.com/").unwrap();
        let transport = FsTransport::new(tmp.path(), url.clone());
        assert!(load_site(&transport, &url).is_err());
    }

    // =========================================================================
    // Local config (viewfinder.toml)
    // =========================================================================

    #[test]
    fn stock_local_toml_is_valid() {
        let config: LocalConfig = toml::from_str(stock_local_toml()).unwrap();
        assert_eq!(config.site.as_deref(), Some("site"));
        assert_eq!(config.base_url.as_deref(), Some("https://localhost/"));
        assert_eq!(config.out.as_deref(), Some("dist"));
        assert_eq!(config.theme.nav_range, None);
    }

    #[test]
    fn local_config_partial() {
        let config: LocalConfig = toml::from_str(
            r#"
[theme]
images_per_page = 24
"#,
        )
        .unwrap();
        assert_eq!(config.site, None);
        assert_eq!(config.theme.images_per_page, Some(24));
    }

    #[test]
    fn local_config_unknown_key_rejected() {
        let result: Result<LocalConfig, _> = toml::from_str("sight = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn local_theme_overlay_only_includes_set_keys() {
        let theme = LocalTheme {
            nav_range: Some(7),
            images_per_page: None,
        };
        let overlay = theme.as_overlay().unwrap();
        assert_eq!(overlay, serde_json::json!({"navRange": 7}));

        assert!(LocalTheme::default().as_overlay().is_none());
    }

    #[test]
    fn load_local_config_missing_file_is_none() {
        let tmp = TempDir::new().unwrap();
        let loaded = load_local_config(&tmp.path().join("viewfinder.toml")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn load_local_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("viewfinder.toml");
        fs::write(&path, "out = \"public\"").unwrap();
        let loaded = load_local_config(&path).unwrap().unwrap();
        assert_eq!(loaded.out.as_deref(), Some("public"));
    }

    #[test]
    fn load_local_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("viewfinder.toml");
        fs::write(&path, "not [[ valid").unwrap();
        assert!(load_local_config(&path).is_err());
    }

    // =========================================================================
    // join
    // =========================================================================

    #[test]
    fn join_keeps_directory_base() {
        let url = join(&base(), "folderInfo.json");
        assert_eq!(
            url.as_str(),
            "https://photos.example.com/gallery/folderInfo.json"
        );
    }

    #[test]
    fn join_handles_multi_segment_names() {
        let url = join(&base(), "theme/theme.json");
        assert_eq!(
            url.as_str(),
            "https://photos.example.com/gallery/theme/theme.json"
        );
    }

    #[test]
    fn join_strips_query() {
        let with_query = Url::parse("https://photos.example.com/gallery/?page=2").unwrap();
        let url = join(&with_query, "itemsInfo.json");
        assert_eq!(
            url.as_str(),
            "https://photos.example.com/gallery/itemsInfo.json"
        );
    }
}
