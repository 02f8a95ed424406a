//! Gallery URL arithmetic.
//!
//! Pages derive everything from their own URL: the album they belong to, the
//! ancestor folders above it, photo file locations, and the `page`/`index`
//! query parameters that select what the page shows. All of it is pure
//! path-segment math on [`Url`] values.
//!
//! Ascension is bounded by the site's working directory: walking up from
//! `/gallery/travel/japan/` by two levels lands on `/gallery/`, and a third
//! level is refused rather than escaping the site root.

use url::Url;

use crate::config::{ImageSize, Site, StorageBase};

/// `page` / `index` query parameters of a page URL.
///
/// Non-numeric values read as absent, matching how a hand-edited query
/// string should degrade.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageInfo {
    pub index: Option<usize>,
    pub page: Option<usize>,
}

/// Extract the pagination parameters from a URL.
pub fn page_info(url: &Url) -> PageInfo {
    let mut info = PageInfo::default();
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "index" => info.index = value.parse().ok(),
            "page" => info.page = value.parse().ok(),
            _ => {}
        }
    }
    info
}

/// Return a copy of `url` with one query parameter set, preserving the rest.
pub fn with_query_param(url: &Url, param: &str, value: usize) -> Url {
    let mut out = url.clone();
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, val)| (key.into_owned(), val.into_owned()))
        .collect();
    out.query_pairs_mut()
        .clear()
        .extend_pairs(kept)
        .append_pair(param, &value.to_string());
    out
}

/// The folder URL `level` steps above the page's own folder.
///
/// Level 0 is the folder containing the page itself. The trailing document
/// segment (`index.html`, `photo.html`, or the empty segment of a trailing
/// slash) is dropped before walking. Returns `None` when the walk would pass
/// above the working-directory root, or when the working directory does not
/// occur in the path at all.
pub fn folder_url(site: &Site, page_url: &Url, level: usize) -> Option<Url> {
    let mut segments: Vec<&str> = page_url.path().split('/').collect();
    // Drop the document segment; what remains is the folder path.
    segments.pop();

    let root = if site.working_directory.is_empty() {
        0
    } else {
        segments
            .iter()
            .position(|segment| *segment == site.working_directory)?
    };

    let depth_below_root = segments.len().checked_sub(root + 1)?;
    if level > depth_below_root {
        tracing::debug!(
            "refusing to ascend {level} levels from {page_url}: above the site root"
        );
        return None;
    }

    let mut path = segments[..segments.len() - level].join("/");
    path.push('/');

    let mut url = page_url.clone();
    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Some(url)
}

/// The URL of the folder containing the page (level-0 ascension).
pub fn album_url(site: &Site, page_url: &Url) -> Option<Url> {
    folder_url(site, page_url, 0)
}

/// Build the URL of one photo file at a given size.
///
/// `photo` is the already-prefixed file name. Local sizes (and sites without
/// remote storage) resolve under the album URL; remote sizes resolve under
/// the storage base, re-rooted at the working directory so the storage
/// mirror shares the site's folder layout.
pub fn photo_url(site: &Site, page_url: &Url, size: &ImageSize, photo: &str) -> Option<String> {
    match &site.storage {
        StorageBase::Remote(storage) if !size.local => {
            let segments: Vec<&str> = page_url.path().split('/').collect();
            let root = if site.working_directory.is_empty() {
                0
            } else {
                segments
                    .iter()
                    .position(|segment| *segment == site.working_directory)?
            };
            let from_root = segments[root..segments.len() - 1]
                .iter()
                .filter(|segment| !segment.is_empty())
                .copied()
                .collect::<Vec<_>>()
                .join("/");
            let base = storage.as_str().trim_end_matches('/');
            if from_root.is_empty() {
                Some(format!("{}/{}/{}", base, size.directory, photo))
            } else {
                Some(format!("{}/{}/{}/{}", base, from_root, size.directory, photo))
            }
        }
        _ => {
            let album = album_url(site, page_url)?;
            Some(format!("{}{}/{}", album, size.directory, photo))
        }
    }
}

/// File name the static renderer uses for an in-site page URL.
///
/// Query-addressed states map to distinct files: `?page=N` (N > 0) becomes
/// `page-N.html`, `?index=N` becomes `photo-N.html`, anything else is the
/// folder's `index.html`.
pub fn static_href(url: &Url) -> String {
    let info = page_info(url);
    if let Some(index) = info.index {
        return format!("photo-{index}.html");
    }
    match info.page {
        Some(page) if page > 0 => format!("page-{page}.html"),
        _ => "index.html".to_string(),
    }
}

/// Join title parts with " - " and append the website title.
pub fn page_title(parts: &[&str], site_title: &str) -> String {
    let mut items: Vec<&str> = parts.to_vec();
    items.push(site_title);
    items.join(" - ")
}
