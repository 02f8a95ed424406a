//! Folder pages: a grid of subfolder cards.
//!
//! Each card is built from the subfolder's own `folderInfo.json`: display
//! name, photo/folder counts, and a thumbnail (the folder's `thumb.jpg`
//! when it advertises one, the site-wide placeholder otherwise). A folder
//! with no subfolders renders nothing at all.

use maud::{Markup, html};

use crate::config::join;
use crate::descriptor::{FOLDER_INFO, Folder};
use crate::events::{LoadCounter, LoadEvent};
use crate::theme::FolderCard;
use crate::transport;
use crate::viewer::{PageContext, Viewer, ViewerError};

pub struct FolderViewer<'a> {
    pub base: Viewer<'a>,
    cards: Vec<FolderCard>,
}

impl<'a> FolderViewer<'a> {
    /// Build a folder viewer, resolving every subfolder's descriptor.
    ///
    /// A subfolder whose descriptor cannot be fetched is logged and
    /// skipped; the remaining cards still render. Each resolved card emits
    /// `FolderLoad`, and `ContentLoad` fires when the last one lands.
    pub fn new(
        ctx: PageContext<'a>,
        page_url: url::Url,
        info: Folder,
    ) -> Result<Self, ViewerError> {
        let mut base = Viewer::new(ctx, page_url, info)?;

        let placeholder = join(&ctx.site.base_url, "thumb.png");
        let mut counter = LoadCounter::new(base.info.subfolders.len());
        let mut cards = Vec::with_capacity(base.info.subfolders.len());

        for short_name in &base.info.subfolders {
            let info_url = join(&join(&base.folder_url, short_name), FOLDER_INFO);
            let sub: Folder = match transport::fetch_json(ctx.transport, &info_url) {
                Ok(sub) => sub,
                Err(err) => {
                    tracing::warn!("skipping subfolder {short_name}: {err}");
                    continue;
                }
            };

            let thumb_src = if sub.thumbnail {
                format!("{short_name}/thumb.jpg")
            } else {
                placeholder.to_string()
            };

            cards.push(FolderCard {
                name: sub.name,
                href: format!("{short_name}/"),
                thumb_src,
                photo_count: sub.item_amount,
                folder_count: sub.subfolders.len(),
            });

            base.events.emit(LoadEvent::FolderLoad);
            if counter.record() {
                base.events.emit(LoadEvent::ContentLoad);
            }
        }

        Ok(Self { base, cards })
    }

    /// Whether there is anything to show.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Document title for a standalone folder page.
    pub fn title(&self) -> String {
        self.base.title(&[&self.base.info.name])
    }

    /// The subfolder section; empty markup when there are no cards.
    pub fn section(&self) -> Markup {
        if self.is_empty() {
            return html! {};
        }
        let theme = self.base.ctx.theme;
        html! {
            section.fd-folder {
                div.fd-folderLinks {
                    @for card in &self.cards {
                        (theme.folder_link(card))
                    }
                }
            }
        }
    }
}
