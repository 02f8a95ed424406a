//! Page viewers.
//!
//! A viewer owns one rendered page state: it resolves the descriptors the
//! page needs, tracks the load protocol, and builds the page's markup
//! through the theme. [`Viewer`] is the shared base — folder identity,
//! parent-folder link, title building — and the three concrete viewers
//! layer the page-specific work on top:
//!
//! - [`album::AlbumViewer`] — paginated thumbnail grid
//! - [`photo::PhotoViewer`] — single photo with downloads
//! - [`folder::FolderViewer`] — subfolder cards
//!
//! Construction is fallible: the first failed fetch aborts the viewer and
//! the caller shows the themed error box instead of a page.

pub mod album;
pub mod folder;
pub mod photo;

use thiserror::Error;
use url::Url;

use crate::config::{self, ImageSize, Site};
use crate::descriptor::{FOLDER_INFO, Folder};
use crate::events::{EventBus, LoadEvent};
use crate::resolve;
use crate::theme::Theme;
use crate::transport::{self, Transport, TransportError};

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    #[error("page URL {0} is outside the site")]
    OutsideSite(Url),
    #[error("size {0:?} is not declared in the site config")]
    MissingSize(String),
    #[error("album at {0} has no items")]
    NoItems(Url),
}

/// Everything a viewer needs from its surroundings.
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub site: &'a Site,
    pub theme: &'a dyn Theme,
    pub transport: &'a dyn Transport,
}

impl<'a> PageContext<'a> {
    /// Size table lookup that surfaces a proper error for undeclared names.
    pub fn size(&self, name: &str) -> Result<&'a ImageSize, ViewerError> {
        self.site
            .size(name)
            .ok_or_else(|| ViewerError::MissingSize(name.to_string()))
    }
}

/// The folder one level up, when the page is not already at the site root.
#[derive(Debug, Clone)]
pub struct SuperFolder {
    pub name: String,
    pub url: Url,
}

/// Shared state of every page viewer.
pub struct Viewer<'a> {
    pub ctx: PageContext<'a>,
    /// URL of the page state being rendered, query included.
    pub page_url: Url,
    /// URL of the folder containing the page.
    pub folder_url: Url,
    pub info: Folder,
    pub super_folder: Option<SuperFolder>,
    pub events: EventBus,
}

impl std::fmt::Debug for Viewer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("page_url", &self.page_url)
            .field("folder_url", &self.folder_url)
            .field("info", &self.info)
            .field("super_folder", &self.super_folder)
            .finish_non_exhaustive()
    }
}

impl<'a> Viewer<'a> {
    /// Build the base viewer: resolve the containing folder, look up the
    /// parent folder's name, and announce `ViewerLoad`.
    pub fn new(ctx: PageContext<'a>, page_url: Url, info: Folder) -> Result<Self, ViewerError> {
        let folder_url = resolve::album_url(ctx.site, &page_url)
            .ok_or_else(|| ViewerError::OutsideSite(page_url.clone()))?;

        let super_folder = resolve::folder_url(ctx.site, &page_url, 1).and_then(|parent_url| {
            let info_url = config::join(&parent_url, FOLDER_INFO);
            match transport::fetch_json::<Folder>(ctx.transport, &info_url) {
                Ok(parent) => Some(SuperFolder {
                    name: parent.name,
                    url: parent_url,
                }),
                Err(err) => {
                    // No parent descriptor: the subtitle simply stays hidden.
                    tracing::debug!("no parent folder info at {info_url}: {err}");
                    None
                }
            }
        });

        let mut events = EventBus::new();
        events.emit(LoadEvent::ViewerLoad);

        Ok(Self {
            ctx,
            page_url,
            folder_url,
            info,
            super_folder,
            events,
        })
    }

    /// Document title for this page: the given parts, then the site title.
    pub fn title(&self, parts: &[&str]) -> String {
        resolve::page_title(parts, &self.ctx.site.title)
    }

    /// The folder heading shared by all page kinds: folder name, optional
    /// parent-folder subtitle.
    pub fn header(&self) -> maud::Markup {
        maud::html! {
            header.fd-viewerHeader {
                h1.fd-folderName { (self.info.name) }
                @if let Some(parent) = &self.super_folder {
                    p.fd-folderSubtitle {
                        "in "
                        a.fd-superFolder href=(parent.url.as_str()) { (parent.name) }
                    }
                }
            }
        }
    }
}
