//! # Viewfinder
//!
//! A static HTML renderer for JSON-described photo galleries. A gallery is
//! a tree of folders, each publishing small JSON descriptors — a site
//! `config.json`, one `folderInfo.json` per folder, an `itemsInfo.json`
//! per album — and viewfinder turns that tree into the finished pages:
//! folder pages with subfolder cards, paginated album pages with thumbnail
//! grids, and one page per photo with downloads and prev/next navigation.
//!
//! # Architecture: Descriptors → Viewers → Pages
//!
//! ```text
//! config.json      →  Site        (resolved config, size table, base URL)
//! folderInfo.json  →  Viewer      (folder identity, parent link)
//! itemsInfo.json   →  AlbumViewer / PhotoViewer
//!                  →  HTML pages  (through a pluggable Theme)
//! ```
//!
//! Every page state the original site addressed with a query parameter
//! (`?page=N`, `?index=N`) becomes its own file (`page-N.html`,
//! `photo-N.html`), so the output is plain HTML a file server can host.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `config.json` loading, cross-version field normalization, working-directory derivation |
//! | [`descriptor`] | Folder / item-list / photo-metadata documents |
//! | [`transport`] | Document retrieval seam; filesystem implementation |
//! | [`resolve`] | URL arithmetic: ascension, photo URLs, query parameters |
//! | [`paging`] | Page slicing and the navigation-window calculation |
//! | [`events`] | The viewer-load / content-load protocol |
//! | [`theme`] | Pluggable rendering callbacks and settings layering |
//! | [`viewer`] | Base viewer plus the album, photo, and folder viewers |
//! | [`render`] | The static walker writing every page of the tree |
//! | [`check`] | Descriptor validation without rendering |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Maud Over Template Engines
//!
//! HTML is generated with [Maud](https://maud.lambda.xyz/): compile-time
//! checked, type-safe, auto-escaped, and with no template directory to
//! ship. Themes return Maud markup from plain trait methods, so a theme is
//! ordinary Rust rather than a string-template dialect.
//!
//! ## Viewers Own Their Failures
//!
//! A viewer that cannot fetch its descriptors aborts construction; the
//! renderer shows the themed error box for that page and moves on. There
//! are no retries and no partial viewers — the first failure wins, and
//! sibling folders are unaffected.
//!
//! ## Descriptor Tolerance
//!
//! Generators have emitted these documents with two field spellings over
//! the years. Every descriptor field accepts both, optional fields
//! default, and unknown folder types degrade to plain folders — an old
//! site keeps rendering without a migration step.

pub mod check;
pub mod config;
pub mod descriptor;
pub mod events;
pub mod output;
pub mod paging;
pub mod render;
pub mod resolve;
pub mod theme;
pub mod transport;
pub mod viewer;
