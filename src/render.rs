//! Static site rendering.
//!
//! The original pages resolved their state at load time in the visitor's
//! browser; here every state is rendered ahead of time. The walker fetches
//! the folder tree from the base URL, then renders each folder's pages:
//!
//! ```text
//! dist/
//! ├── index.html               # root folder page
//! ├── travel/
//! │   ├── index.html           # album page 0 (+ subfolder cards)
//! │   ├── page-1.html          # album page 1
//! │   ├── photo-0.html         # one page per photo
//! │   └── photo-1.html
//! └── misc/
//!     └── index.html
//! ```
//!
//! Folders are independent of each other, so they render in parallel. A
//! folder whose descriptors fail to fetch gets an error page (the themed
//! error box) and its siblings keep rendering; the failure is recorded in
//! the summary.

use maud::{DOCTYPE, Markup, html};
use rayon::prelude::*;
use std::fs;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::config::{Site, join};
use crate::descriptor::{FOLDER_INFO, Folder};
use crate::resolve;
use crate::theme::Theme;
use crate::transport::{self, Transport};
use crate::viewer::album::AlbumViewer;
use crate::viewer::folder::FolderViewer;
use crate::viewer::photo::PhotoViewer;
use crate::viewer::{PageContext, ViewerError};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("viewer error: {0}")]
    Viewer(#[from] ViewerError),
}

/// One folder's rendering outcome.
#[derive(Debug)]
pub struct RenderedFolder {
    /// Path relative to the output root; empty for the site root.
    pub rel_path: String,
    pub title: String,
    pub is_album: bool,
    pub photo_count: usize,
    /// HTML files written for this folder.
    pub pages_written: usize,
    /// Fetch failure that turned this folder into an error page.
    pub error: Option<String>,
    /// Whether every viewer with content completed its load protocol.
    pub content_complete: bool,
}

/// Site-wide rendering outcome.
#[derive(Debug)]
pub struct RenderSummary {
    pub folders: Vec<RenderedFolder>,
}

impl RenderSummary {
    pub fn pages_written(&self) -> usize {
        self.folders.iter().map(|f| f.pages_written).sum()
    }

    pub fn error_count(&self) -> usize {
        self.folders.iter().filter(|f| f.error.is_some()).count()
    }
}

/// A folder discovered by the tree walk, descriptor fetched or failed.
struct Discovered {
    rel_path: String,
    url: Url,
    folder: Result<Folder, String>,
}

/// Render the whole gallery under `out_dir`.
pub fn render_site(
    transport: &dyn Transport,
    site: &Site,
    theme: &dyn Theme,
    out_dir: &Path,
) -> Result<RenderSummary, RenderError> {
    let discovered = discover(transport, site);
    fs::create_dir_all(out_dir)?;

    let ctx = PageContext {
        site,
        theme,
        transport,
    };

    let folders = discovered
        .par_iter()
        .map(|entry| render_folder(ctx, entry, out_dir))
        .collect::<Result<Vec<_>, RenderError>>()?;

    Ok(RenderSummary { folders })
}

/// Walk the folder tree from the base URL, breadth-first.
///
/// Children are only followed when the parent's descriptor resolved; a
/// failed folder is still recorded so it gets an error page.
fn discover(transport: &dyn Transport, site: &Site) -> Vec<Discovered> {
    let mut queue = std::collections::VecDeque::new();
    queue.push_back((String::new(), site.base_url.clone()));
    let mut discovered = Vec::new();

    while let Some((rel_path, url)) = queue.pop_front() {
        let info_url = join(&url, FOLDER_INFO);
        let folder = transport::fetch_json::<Folder>(transport, &info_url)
            .map_err(|err| err.to_string());

        if let Ok(folder) = &folder {
            for short_name in &folder.subfolders {
                let child_rel = if rel_path.is_empty() {
                    short_name.clone()
                } else {
                    format!("{rel_path}/{short_name}")
                };
                queue.push_back((child_rel, directory_url(&url, short_name)));
            }
        }

        discovered.push(Discovered {
            rel_path,
            url,
            folder,
        });
    }

    discovered
}

/// Child folder URL with the trailing slash folder pages carry.
fn directory_url(base: &Url, name: &str) -> Url {
    let mut url = join(base, name);
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.push("");
    }
    url
}

/// Render every page of one folder.
fn render_folder(
    ctx: PageContext<'_>,
    entry: &Discovered,
    out_dir: &Path,
) -> Result<RenderedFolder, RenderError> {
    let dir = if entry.rel_path.is_empty() {
        out_dir.to_path_buf()
    } else {
        out_dir.join(&entry.rel_path)
    };
    fs::create_dir_all(&dir)?;

    let folder = match &entry.folder {
        Ok(folder) => folder,
        Err(message) => {
            tracing::error!("folder {} failed: {message}", entry.url);
            let message = format!("Error getting folder information: {message}");
            let page = error_page(ctx, &message);
            fs::write(dir.join("index.html"), page.into_string())?;
            return Ok(RenderedFolder {
                rel_path: entry.rel_path.clone(),
                title: entry.rel_path.clone(),
                is_album: false,
                photo_count: 0,
                pages_written: 1,
                error: Some(message),
                content_complete: false,
            });
        }
    };

    let mut pages_written = 0;
    let mut content_complete = true;

    // Subfolder cards appear on the folder's first page only.
    let folder_viewer = if folder.subfolders.is_empty() {
        None
    } else {
        let viewer = FolderViewer::new(ctx, entry.url.clone(), folder.clone())?;
        if !viewer.is_empty() {
            content_complete &= viewer.base.events.content_loaded();
        }
        Some(viewer)
    };

    if folder.is_album() {
        match AlbumViewer::new(ctx, entry.url.clone(), folder.clone()) {
            Ok(mut album) => {
                // Page 0 carries the folder section; later pages stand alone.
                let folder_section = folder_viewer.as_ref().map(|v| v.section());
                let header = album.base.header();
                let album_section = album.section()?;
                let body = html! {
                    (header)
                    @if let Some(section) = &folder_section { (section) }
                    (album_section)
                };
                let page = base_document(ctx.site, &album.title(), body);
                fs::write(dir.join("index.html"), page.into_string())?;
                pages_written += 1;
                if album.photo_count() > 0 {
                    content_complete &= album.base.events.content_loaded();
                }

                for page_index in 1..album.page_count() {
                    let page_url =
                        resolve::with_query_param(&entry.url, "page", page_index);
                    let mut paged = AlbumViewer::new(ctx, page_url.clone(), folder.clone())?;
                    let header = paged.base.header();
                    let section = paged.section()?;
                    let body = html! {
                        (header)
                        (section)
                    };
                    let page = base_document(ctx.site, &paged.title(), body);
                    fs::write(dir.join(resolve::static_href(&page_url)), page.into_string())?;
                    pages_written += 1;
                    content_complete &= paged.base.events.content_loaded();
                }

                for photo_page_url in album.photo_page_urls() {
                    let mut photo = PhotoViewer::new(ctx, photo_page_url.clone(), folder.clone())?;
                    let header = photo.base.header();
                    let section = photo.section()?;
                    let body = html! {
                        (header)
                        (section)
                    };
                    let page = base_document(ctx.site, &photo.title(), body);
                    fs::write(
                        dir.join(resolve::static_href(&photo_page_url)),
                        page.into_string(),
                    )?;
                    pages_written += 1;
                }
            }
            Err(err) => {
                // The album aborts but the folder cards still show.
                tracing::error!("album at {} failed: {err}", entry.url);
                let message = format!("Could not load album properly. {err}");
                let body = html! {
                    @if let Some(viewer) = &folder_viewer { (viewer.section()) }
                    (ctx.theme.error_box(&message))
                };
                let page = base_document(
                    ctx.site,
                    &resolve::page_title(&[&folder.name], &ctx.site.title),
                    body,
                );
                fs::write(dir.join("index.html"), page.into_string())?;
                return Ok(RenderedFolder {
                    rel_path: entry.rel_path.clone(),
                    title: folder.name.clone(),
                    is_album: true,
                    photo_count: 0,
                    pages_written: 1,
                    error: Some(message),
                    content_complete: false,
                });
            }
        }
    } else {
        let body = match &folder_viewer {
            Some(viewer) => html! {
                (viewer.base.header())
                @if !folder.desc.is_empty() {
                    div.fd-desc { (crate::theme::markdown(&folder.desc)) }
                }
                (viewer.section())
            },
            None => html! {
                header.fd-viewerHeader { h1.fd-folderName { (folder.name) } }
            },
        };
        let page = base_document(
            ctx.site,
            &resolve::page_title(&[&folder.name], &ctx.site.title),
            body,
        );
        fs::write(dir.join("index.html"), page.into_string())?;
        pages_written += 1;
    }

    let photo_count = folder.item_amount.unwrap_or(0);
    Ok(RenderedFolder {
        rel_path: entry.rel_path.clone(),
        title: folder.name.clone(),
        is_album: folder.is_album(),
        photo_count,
        pages_written,
        error: None,
        content_complete,
    })
}

/// The shared document shell.
fn base_document(site: &Site, title: &str, content: Markup) -> Markup {
    let stylesheet = site
        .theme
        .then(|| join(&site.base_url, "theme/theme.css").to_string());
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                @if let Some(href) = &stylesheet {
                    link rel="stylesheet" href=(href);
                }
            }
            body {
                (content)
            }
        }
    }
}

/// A bare page carrying only the themed error box.
fn error_page(ctx: PageContext<'_>, message: &str) -> Markup {
    base_document(
        ctx.site,
        &resolve::page_title(&["Error"], &ctx.site.title),
        ctx.theme.error_box(message),
    )
}
