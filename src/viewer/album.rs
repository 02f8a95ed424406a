//! Album pages: a paginated thumbnail grid.
//!
//! The `page` query parameter selects which slice of the album's photo list
//! the page shows. Thumbnails link to the matching photo page, prev/next
//! buttons walk the pages, and a bounded window of numbered page links sits
//! between them. Each thumbnail counts toward the page's `ContentLoad`.

use maud::{Markup, html};

use crate::config::{self, join};
use crate::descriptor::{Folder, ITEMS_INFO, Items};
use crate::events::{LoadCounter, LoadEvent};
use crate::paging;
use crate::resolve;
use crate::theme::ThumbnailSpec;
use crate::transport;
use crate::viewer::{PageContext, Viewer, ViewerError};

pub struct AlbumViewer<'a> {
    pub base: Viewer<'a>,
    items: Items,
    current_page: usize,
}

impl std::fmt::Debug for AlbumViewer<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlbumViewer")
            .field("base", &self.base)
            .field("items", &self.items)
            .field("current_page", &self.current_page)
            .finish()
    }
}

impl<'a> AlbumViewer<'a> {
    /// Build an album viewer for one page state.
    ///
    /// Fetches the album's item list; a failed fetch aborts construction and
    /// the caller falls back to the themed error box. A `page` parameter
    /// past the end clamps to the last page.
    pub fn new(
        ctx: PageContext<'a>,
        page_url: url::Url,
        info: Folder,
    ) -> Result<Self, ViewerError> {
        let base = Viewer::new(ctx, page_url, info)?;

        let items_url = join(&base.folder_url, ITEMS_INFO);
        let items: Items = transport::fetch_json(ctx.transport, &items_url)?;

        let per_page = ctx.theme.settings().images_per_page;
        let pages = paging::page_count(items.items.len(), per_page);
        let requested = resolve::page_info(&base.page_url).page.unwrap_or(0);
        let current_page = match pages {
            0 => 0,
            _ => requested.min(pages - 1),
        };

        Ok(Self {
            base,
            items,
            current_page,
        })
    }

    pub fn photo_count(&self) -> usize {
        self.items.items.len()
    }

    pub fn page_count(&self) -> usize {
        paging::page_count(self.photo_count(), self.per_page())
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    fn per_page(&self) -> usize {
        self.base.ctx.theme.settings().images_per_page
    }

    /// Document title: the folder name plus the site title.
    pub fn title(&self) -> String {
        self.base.title(&[&self.base.info.name])
    }

    /// The thumbnail grid for the current page.
    ///
    /// Emits one `ImageLoad` per thumbnail and `ContentLoad` once the whole
    /// slice has been built.
    pub fn thumbnails(&mut self) -> Result<Markup, ViewerError> {
        let ctx = self.base.ctx;
        let thumb_size = ctx.size(&ctx.site.thumbnail_size)?;
        let slice = paging::page_slice(self.photo_count(), self.per_page(), self.current_page);

        let mut counter = LoadCounter::new(slice.len());
        let mut cells: Vec<Markup> = Vec::with_capacity(slice.len());

        for index in slice {
            let name = &self.items.items[index];
            let photo_page =
                resolve::with_query_param(&join(&self.base.folder_url, "photo.html"), "index", index);
            let src = resolve::photo_url(
                ctx.site,
                &self.base.page_url,
                thumb_size,
                &format!("{}{}", thumb_size.prefix, name),
            )
            .ok_or_else(|| ViewerError::OutsideSite(self.base.page_url.clone()))?;

            cells.push(ctx.theme.thumbnail(&ThumbnailSpec {
                index,
                name: name.clone(),
                href: resolve::static_href(&photo_page),
                src,
            }));

            self.base.events.emit(LoadEvent::ImageLoad);
            if counter.record() {
                self.base.events.emit(LoadEvent::ContentLoad);
            }
        }

        Ok(html! {
            div.fd-albumThumbnails {
                @for cell in &cells { (cell) }
            }
        })
    }

    /// Pagination bar: prev button, the page-link window, next button.
    pub fn nav(&self) -> Markup {
        let theme = self.base.ctx.theme;
        let pages = self.page_count();

        let page_href = |page: usize| {
            resolve::static_href(&resolve::with_query_param(&self.base.page_url, "page", page))
        };

        let prev = (self.current_page > 0).then(|| page_href(self.current_page - 1));
        let next =
            (pages > 0 && self.current_page < pages - 1).then(|| page_href(self.current_page + 1));

        let window = paging::nav_window(pages, self.current_page, theme.settings().nav_range);

        html! {
            nav.fd-navContents {
                (theme.nav_button("Prev", prev.as_deref()))
                @for page in window {
                    (theme.nav_page_link(page, self.current_page, &page_href(page)))
                }
                (theme.nav_button("Next", next.as_deref()))
            }
        }
    }

    /// The album section of the page: description, grid, pagination.
    pub fn section(&mut self) -> Result<Markup, ViewerError> {
        let desc = (!self.base.info.desc.is_empty()).then(|| self.base.info.desc.clone());
        let thumbnails = self.thumbnails()?;
        let nav = self.nav();

        Ok(html! {
            section.fd-album {
                @if let Some(desc) = &desc {
                    div.fd-desc { (crate::theme::markdown(desc)) }
                }
                (thumbnails)
                (nav)
            }
        })
    }

    /// URLs of every photo page of this album, for the static walker.
    pub fn photo_page_urls(&self) -> Vec<url::Url> {
        (0..self.photo_count())
            .map(|index| {
                resolve::with_query_param(
                    &config::join(&self.base.folder_url, "photo.html"),
                    "index",
                    index,
                )
            })
            .collect()
    }
}
