//! Pluggable page rendering.
//!
//! Viewers decide *what* appears on a page; a [`Theme`] decides what each
//! element looks like. The trait covers exactly the construction callbacks
//! viewers invoke: thumbnails, folder cards, pagination links, prev/next
//! buttons, download buttons, and the error box. [`DefaultTheme`] is the
//! built-in look; a site can swap it by publishing a theme bundle.
//!
//! ## Settings layering
//!
//! [`ThemeSettings`] resolve in three layers, later wins:
//!
//! 1. built-in defaults (`navRange` 5, `imagesPerPage` 50);
//! 2. the site's `theme/theme.json` bundle, when the site config sets the
//!    theme flag — a missing or malformed bundle logs a warning and keeps
//!    the defaults rather than failing the render;
//! 3. local `[theme]` overrides from `viewfinder.toml`.
//!
//! Layering is a recursive JSON merge, the same shape the hierarchical
//! config merge uses elsewhere in this family of tools.

use maud::{Markup, PreEscaped, html};
use pulldown_cmark::{Parser, html as md_html};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::{Site, join};
use crate::transport::{self, Transport};

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("theme settings error: {0}")]
    Settings(#[from] serde_json::Error),
    #[error("theme validation error: {0}")]
    Validation(String),
}

/// Numeric knobs a theme exposes to the viewers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSettings {
    /// Maximum number of page links shown in the pagination bar.
    pub nav_range: usize,
    /// Thumbnails per album page.
    pub images_per_page: usize,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            nav_range: 5,
            images_per_page: 50,
        }
    }
}

impl ThemeSettings {
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.nav_range == 0 {
            return Err(ThemeError::Validation("navRange must be non-zero".into()));
        }
        if self.images_per_page == 0 {
            return Err(ThemeError::Validation(
                "imagesPerPage must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Everything a theme needs to draw one album thumbnail.
#[derive(Debug, Clone)]
pub struct ThumbnailSpec {
    /// Photo index within the album.
    pub index: usize,
    /// Photo file name (alt text).
    pub name: String,
    /// Page the thumbnail links to.
    pub href: String,
    /// Thumbnail image URL.
    pub src: String,
}

/// Everything a theme needs to draw one subfolder card.
#[derive(Debug, Clone)]
pub struct FolderCard {
    pub name: String,
    pub href: String,
    pub thumb_src: String,
    /// Photo count, when the folder descriptor recorded one.
    pub photo_count: Option<usize>,
    /// Number of nested folders; zero hides the count line.
    pub folder_count: usize,
}

/// Rendering callbacks the viewers build pages with.
///
/// `Sync` so the renderer can share one theme across its worker threads.
pub trait Theme: Sync {
    fn settings(&self) -> &ThemeSettings;

    /// One album thumbnail linking to its photo page.
    fn thumbnail(&self, spec: &ThumbnailSpec) -> Markup;

    /// One subfolder card with its counts.
    fn folder_link(&self, card: &FolderCard) -> Markup;

    /// One numbered pagination link; the current page renders unlinked.
    fn nav_page_link(&self, page: usize, current: usize, href: &str) -> Markup;

    /// A prev/next button; `None` renders the disabled form.
    fn nav_button(&self, label: &str, href: Option<&str>) -> Markup;

    /// A download button for one image size.
    fn download_button(&self, label: &str, href: &str) -> Markup;

    /// The user-visible error banner.
    fn error_box(&self, message: &str) -> Markup;
}

/// The built-in theme.
#[derive(Debug, Default)]
pub struct DefaultTheme {
    settings: ThemeSettings,
}

impl DefaultTheme {
    pub fn new(settings: ThemeSettings) -> Self {
        Self { settings }
    }
}

impl Theme for DefaultTheme {
    fn settings(&self) -> &ThemeSettings {
        &self.settings
    }

    fn thumbnail(&self, spec: &ThumbnailSpec) -> Markup {
        html! {
            a.fd-albumThumbnail href=(spec.href) {
                img.fd-albumThumbnailImage src=(spec.src) alt=(spec.name) loading="lazy";
            }
        }
    }

    fn folder_link(&self, card: &FolderCard) -> Markup {
        html! {
            div.fd-folderLink {
                a href=(card.href) {
                    div.fd-folderLinkContainer {
                        img.fd-folderThumbnail src=(card.thumb_src) alt=(card.name);
                        div.fd-folderInfoContainer {
                            span.fd-folderName { (card.name) }
                            div.fd-folderItemCount {
                                @if let Some(photos) = card.photo_count {
                                    div { "Photos: " (photos) }
                                }
                                @if card.folder_count > 0 {
                                    div { "Folders: " (card.folder_count) }
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn nav_page_link(&self, page: usize, current: usize, href: &str) -> Markup {
        // Pages are 0-based internally, 1-based on screen.
        html! {
            @if page == current {
                span.fd-navLink.active { (page + 1) }
            } @else {
                a.fd-navLink href=(href) { (page + 1) }
            }
        }
    }

    fn nav_button(&self, label: &str, href: Option<&str>) -> Markup {
        html! {
            @if let Some(href) = href {
                a.fd-navButton.button href=(href) { (label) }
            } @else {
                span.fd-navButton.button.disabled { (label) }
            }
        }
    }

    fn download_button(&self, label: &str, href: &str) -> Markup {
        html! {
            a.fd-downloadButton.button href=(href) download { (label) }
        }
    }

    fn error_box(&self, message: &str) -> Markup {
        html! {
            div.fd-errorBox {
                p.fd-error { (message) }
            }
        }
    }
}

/// Render a description as inline markdown.
///
/// Folder and photo descriptions are plain strings in the descriptors, but
/// generators let authors write markdown in them.
pub fn markdown(text: &str) -> Markup {
    let parser = Parser::new(text);
    let mut out = String::new();
    md_html::push_html(&mut out, parser);
    PreEscaped(out)
}

/// Recursively merge `overlay` on top of `base`.
///
/// Objects merge key-by-key; any other overlay value replaces the base
/// value entirely.
pub fn merge_json(base: serde_json::Value, overlay: serde_json::Value) -> serde_json::Value {
    use serde_json::Value;
    match (base, overlay) {
        (Value::Object(mut base_map), Value::Object(overlay_map)) => {
            for (key, overlay_val) in overlay_map {
                let merged = match base_map.remove(&key) {
                    Some(base_val) => merge_json(base_val, overlay_val),
                    None => overlay_val,
                };
                base_map.insert(key, merged);
            }
            Value::Object(base_map)
        }
        (_, overlay) => overlay,
    }
}

/// URL of the site's theme settings bundle.
pub fn bundle_url(site: &Site) -> Url {
    join(&site.base_url, "theme/theme.json")
}

/// Resolve theme settings through all three layers.
pub fn resolve_settings(
    transport: &dyn Transport,
    site: &Site,
    local: Option<&serde_json::Value>,
) -> Result<ThemeSettings, ThemeError> {
    let mut value = serde_json::to_value(ThemeSettings::default())?;

    if site.theme {
        let url = bundle_url(site);
        match transport::fetch_json::<serde_json::Value>(transport, &url) {
            Ok(bundle) => value = merge_json(value, bundle),
            Err(err) => {
                tracing::warn!("theme bundle unavailable, using default settings: {err}");
            }
        }
    }

    if let Some(local) = local {
        value = merge_json(value, local.clone());
    }

    let settings: ThemeSettings = serde_json::from_value(value)?;
    settings.validate()?;
    Ok(settings)
}

/// Load the theme for a site: resolved settings behind the built-in look.
pub fn load_theme(
    transport: &dyn Transport,
    site: &Site,
    local: Option<&serde_json::Value>,
) -> Result<Box<dyn Theme>, ThemeError> {
    let settings = resolve_settings(transport, site, local)?;
    Ok(Box::new(DefaultTheme::new(settings)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::transport::FsTransport;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn theme() -> DefaultTheme {
        DefaultTheme::default()
    }

    // =========================================================================
    // Settings
    // =========================================================================

    #[test]
    fn default_settings() {
        let settings = ThemeSettings::default();
        assert_eq!(settings.nav_range, 5);
        assert_eq!(settings.images_per_page, 50);
    }

    #[test]
    fn settings_parse_partial_json() {
        let settings: ThemeSettings = serde_json::from_str(r#"{"navRange": 9}"#).unwrap();
        assert_eq!(settings.nav_range, 9);
        assert_eq!(settings.images_per_page, 50);
    }

    #[test]
    fn settings_reject_zero_values() {
        let settings = ThemeSettings {
            nav_range: 0,
            images_per_page: 50,
        };
        assert!(settings.validate().is_err());

        let settings = ThemeSettings {
            nav_range: 5,
            images_per_page: 0,
        };
        assert!(settings.validate().is_err());
    }

    // =========================================================================
    // merge_json
    // =========================================================================

    #[test]
    fn merge_scalar_override() {
        let merged = merge_json(json!({"navRange": 5}), json!({"navRange": 7}));
        assert_eq!(merged, json!({"navRange": 7}));
    }

    #[test]
    fn merge_preserves_base_keys() {
        let merged = merge_json(
            json!({"navRange": 5, "imagesPerPage": 50}),
            json!({"navRange": 7}),
        );
        assert_eq!(merged, json!({"navRange": 7, "imagesPerPage": 50}));
    }

    #[test]
    fn merge_nested_objects() {
        let merged = merge_json(
            json!({"a": {"x": 1, "y": 2}}),
            json!({"a": {"y": 3}}),
        );
        assert_eq!(merged, json!({"a": {"x": 1, "y": 3}}));
    }

    // =========================================================================
    // resolve_settings layering
    // =========================================================================

    fn site_with_theme(tmp: &TempDir, theme: bool) -> (Site, FsTransport) {
        let base = Url::parse("https://h.test/g/").unwrap();
        let config: SiteConfig = serde_json::from_str(&format!(
            r#"{{
                "websiteTitle": "T",
                "imageRoot": "img",
                "thumbnailSize": "thumb",
                "displayImageSize": "thumb",
                "theme": {theme},
                "imageSizes": [{{"sizeName": "thumb", "dir": "thumb"}}]
            }}"#
        ))
        .unwrap();
        let site = Site::from_config(config, base.clone()).unwrap();
        (site, FsTransport::new(tmp.path(), base))
    }

    #[test]
    fn no_theme_flag_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let (site, transport) = site_with_theme(&tmp, false);
        let settings = resolve_settings(&transport, &site, None).unwrap();
        assert_eq!(settings.nav_range, 5);
    }

    #[test]
    fn bundle_overrides_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("theme")).unwrap();
        fs::write(
            tmp.path().join("theme/theme.json"),
            r#"{"navRange": 7, "imagesPerPage": 24}"#,
        )
        .unwrap();

        let (site, transport) = site_with_theme(&tmp, true);
        let settings = resolve_settings(&transport, &site, None).unwrap();
        assert_eq!(settings.nav_range, 7);
        assert_eq!(settings.images_per_page, 24);
    }

    #[test]
    fn missing_bundle_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let (site, transport) = site_with_theme(&tmp, true);
        let settings = resolve_settings(&transport, &site, None).unwrap();
        assert_eq!(settings.nav_range, 5);
        assert_eq!(settings.images_per_page, 50);
    }

    #[test]
    fn local_overrides_win_over_bundle() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("theme")).unwrap();
        fs::write(tmp.path().join("theme/theme.json"), r#"{"navRange": 7}"#).unwrap();

        let (site, transport) = site_with_theme(&tmp, true);
        let local = json!({"navRange": 3});
        let settings = resolve_settings(&transport, &site, Some(&local)).unwrap();
        assert_eq!(settings.nav_range, 3);
    }

    #[test]
    fn resolved_zero_setting_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let (site, transport) = site_with_theme(&tmp, false);
        let local = json!({"imagesPerPage": 0});
        assert!(resolve_settings(&transport, &site, Some(&local)).is_err());
    }

    // =========================================================================
    // Default theme markup
    // =========================================================================

    #[test]
    fn thumbnail_links_image() {
        let markup = theme()
            .thumbnail(&ThumbnailSpec {
                index: 3,
                name: "003.jpg".into(),
                href: "photo-3.html".into(),
                src: "img/thumb/thumb_003.jpg".into(),
            })
            .into_string();
        assert!(markup.contains(r#"href="photo-3.html""#));
        assert!(markup.contains(r#"src="img/thumb/thumb_003.jpg""#));
        assert!(markup.contains("fd-albumThumbnail"));
    }

    #[test]
    fn folder_card_shows_counts() {
        let markup = theme()
            .folder_link(&FolderCard {
                name: "Japan".into(),
                href: "japan/".into(),
                thumb_src: "japan/thumb.jpg".into(),
                photo_count: Some(42),
                folder_count: 2,
            })
            .into_string();
        assert!(markup.contains("Japan"));
        assert!(markup.contains("Photos: 42"));
        assert!(markup.contains("Folders: 2"));
    }

    #[test]
    fn folder_card_hides_absent_counts() {
        let markup = theme()
            .folder_link(&FolderCard {
                name: "Japan".into(),
                href: "japan/".into(),
                thumb_src: "thumb.png".into(),
                photo_count: None,
                folder_count: 0,
            })
            .into_string();
        assert!(!markup.contains("Photos:"));
        assert!(!markup.contains("Folders:"));
    }

    #[test]
    fn current_page_link_is_unlinked() {
        let markup = theme().nav_page_link(2, 2, "page-2.html").into_string();
        assert!(!markup.contains("href"));
        assert!(markup.contains("active"));
        assert!(markup.contains("3")); // 1-based label
    }

    #[test]
    fn other_page_link_is_an_anchor() {
        let markup = theme().nav_page_link(1, 2, "page-1.html").into_string();
        assert!(markup.contains(r#"href="page-1.html""#));
        assert!(markup.contains("2"));
    }

    #[test]
    fn nav_button_disabled_without_target() {
        let markup = theme().nav_button("Next", None).into_string();
        assert!(markup.contains("disabled"));
        assert!(!markup.contains("href"));

        let markup = theme().nav_button("Next", Some("page-1.html")).into_string();
        assert!(markup.contains(r#"href="page-1.html""#));
        assert!(!markup.contains("disabled"));
    }

    #[test]
    fn error_box_carries_message() {
        let markup = theme().error_box("Could not load album").into_string();
        assert!(markup.contains("fd-errorBox"));
        assert!(markup.contains("Could not load album"));
    }

    #[test]
    fn error_box_escapes_html() {
        let markup = theme().error_box("<script>x</script>").into_string();
        assert!(!markup.contains("<script>"));
        assert!(markup.contains("&lt;script&gt;"));
    }

    #[test]
    fn markdown_renders_emphasis() {
        let markup = markdown("Two **bold** weeks").into_string();
        assert!(markup.contains("<strong>bold</strong>"));
    }
}
