//! Photo pages: one full-size photo with navigation and downloads.
//!
//! The `index` query parameter selects the photo from the album's item
//! list. Prev/next walk the list with the ends disabled, download buttons
//! cover every configured download size, and the display image counts as
//! the page's single piece of content for the load protocol.

use maud::{Markup, html};

use crate::config::join;
use crate::descriptor::{Folder, ITEMS_INFO, ImageMeta, Items};
use crate::events::{LoadCounter, LoadEvent};
use crate::resolve;
use crate::theme;
use crate::transport;
use crate::viewer::{PageContext, Viewer, ViewerError};

pub struct PhotoViewer<'a> {
    pub base: Viewer<'a>,
    items: Items,
    index: usize,
    /// Photo file name from the item list.
    file: String,
    /// Display name: metadata title, or the file name.
    name: String,
    desc: String,
}

impl std::fmt::Debug for PhotoViewer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PhotoViewer")
            .field("base", &self.base)
            .field("items", &self.items)
            .field("index", &self.index)
            .field("file", &self.file)
            .field("name", &self.name)
            .field("desc", &self.desc)
            .finish()
    }
}

impl<'a> PhotoViewer<'a> {
    /// Build a photo viewer for one `index` state.
    ///
    /// Fetches the item list; failure aborts construction. A missing or
    /// out-of-range index falls back to the first photo. When the album
    /// records per-photo metadata, the photo's meta document supplies the
    /// display name and description.
    pub fn new(
        ctx: PageContext<'a>,
        page_url: url::Url,
        info: Folder,
    ) -> Result<Self, ViewerError> {
        let base = Viewer::new(ctx, page_url, info)?;

        let items_url = join(&base.folder_url, ITEMS_INFO);
        let items: Items = transport::fetch_json(ctx.transport, &items_url)?;
        if items.items.is_empty() {
            return Err(ViewerError::NoItems(base.folder_url.clone()));
        }

        let requested = resolve::page_info(&base.page_url).index.unwrap_or(0);
        let index = if requested < items.items.len() {
            requested
        } else {
            0
        };
        let file = items.items[index].clone();

        let (name, desc) = if items.metadata {
            let meta_url = join(
                &base.folder_url,
                &format!("{}/meta/{}.json", ctx.site.image_root, file),
            );
            match transport::fetch_json::<ImageMeta>(ctx.transport, &meta_url) {
                Ok(meta) => meta.resolve(&file),
                Err(err) => {
                    tracing::warn!("photo metadata unavailable at {meta_url}: {err}");
                    ImageMeta::default().resolve(&file)
                }
            }
        } else {
            (file.clone(), String::new())
        };

        Ok(Self {
            base,
            items,
            index,
            file,
            name,
            desc,
        })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn photo_name(&self) -> &str {
        &self.name
    }

    /// Document title: photo name, album name, site title.
    pub fn title(&self) -> String {
        self.base.title(&[&self.name, &self.base.info.name])
    }

    /// URL of the display-size image file.
    fn display_src(&self) -> Result<String, ViewerError> {
        let ctx = self.base.ctx;
        let size = ctx.size(&ctx.site.display_size)?;
        resolve::photo_url(
            ctx.site,
            &self.base.page_url,
            size,
            &format!("{}{}", ctx.site.display_prefix, self.file),
        )
        .ok_or_else(|| ViewerError::OutsideSite(self.base.page_url.clone()))
    }

    /// Prev/next buttons over the album's item list.
    pub fn nav(&self) -> Markup {
        let theme = self.base.ctx.theme;
        let href = |index: usize| {
            resolve::static_href(&resolve::with_query_param(
                &self.base.page_url,
                "index",
                index,
            ))
        };

        let prev = (self.index > 0).then(|| href(self.index - 1));
        let next = (self.index + 1 < self.items.items.len()).then(|| href(self.index + 1));

        html! {
            nav.fd-navContents {
                (theme.nav_button("Prev", prev.as_deref()))
                (theme.nav_button("Next", next.as_deref()))
            }
        }
    }

    /// Download buttons, one per configured download size.
    pub fn downloads(&self) -> Result<Markup, ViewerError> {
        let ctx = self.base.ctx;
        let mut buttons: Vec<Markup> = Vec::with_capacity(ctx.site.download_sizes.len());
        for size_name in &ctx.site.download_sizes {
            let size = ctx.size(size_name)?;
            let href = resolve::photo_url(
                ctx.site,
                &self.base.page_url,
                size,
                &format!("{}{}", size.prefix, self.file),
            )
            .ok_or_else(|| ViewerError::OutsideSite(self.base.page_url.clone()))?;
            buttons.push(ctx.theme.download_button(size_name, &href));
        }
        Ok(html! {
            div.fd-infoButtons {
                @for button in &buttons { (button) }
            }
        })
    }

    /// The photo section: image, caption, downloads, navigation.
    ///
    /// The display image is the page's one piece of content; building it
    /// emits `ImageLoad` and immediately completes `ContentLoad`.
    pub fn section(&mut self) -> Result<Markup, ViewerError> {
        let src = self.display_src()?;
        let downloads = self.downloads()?;
        let nav = self.nav();

        let mut counter = LoadCounter::new(1);
        self.base.events.emit(LoadEvent::ImageLoad);
        if counter.record() {
            self.base.events.emit(LoadEvent::ContentLoad);
        }

        Ok(html! {
            section.fd-photoViewer {
                figure.fd-photoFrame {
                    img.fd-photo src=(src) alt=(self.name);
                    figcaption {
                        span.fd-name { (self.name) }
                        @if !self.desc.is_empty() {
                            div.fd-desc { (theme::markdown(&self.desc)) }
                        }
                    }
                }
                (downloads)
                (nav)
            }
        })
    }
}
