//! Load-completion protocol.
//!
//! Viewers announce readiness in two levels: `ViewerLoad` once the base
//! viewer has its folder information, then one `ImageLoad`/`FolderLoad` per
//! resolved child, and finally `ContentLoad` when every child of the page
//! has been counted. Themes and the renderer read the log to decide when a
//! page's content is complete (the original page removed its loading
//! placeholder on exactly this signal).
//!
//! The log is a plain ordered `Vec`; there is no cross-task sharing, only
//! callbacks appending within a single viewer's lifetime.

/// One notification in the viewer load protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadEvent {
    /// Base viewer constructed and its folder info resolved.
    ViewerLoad,
    /// One album thumbnail resolved.
    ImageLoad,
    /// One subfolder card resolved.
    FolderLoad,
    /// Every child of the page resolved.
    ContentLoad,
}

/// Ordered, in-process event log for one viewer.
#[derive(Debug, Default)]
pub struct EventBus {
    events: Vec<LoadEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: LoadEvent) {
        self.events.push(event);
    }

    pub fn events(&self) -> &[LoadEvent] {
        &self.events
    }

    /// Whether the two-level protocol completed for this viewer.
    pub fn content_loaded(&self) -> bool {
        self.events.contains(&LoadEvent::ContentLoad)
    }
}

/// Counts child loads toward an expected total.
///
/// The expected total is the number of children actually rendered on the
/// page, so a short final album page still completes. Completion is
/// reported exactly once; a counter expecting zero children never
/// completes (there is no content to load).
#[derive(Debug)]
pub struct LoadCounter {
    expected: usize,
    seen: usize,
    done: bool,
}

impl LoadCounter {
    pub fn new(expected: usize) -> Self {
        Self {
            expected,
            seen: 0,
            done: false,
        }
    }

    /// Record one child load. Returns `true` on the load that completes the
    /// set, `false` before and after.
    pub fn record(&mut self) -> bool {
        self.seen += 1;
        if !self.done && self.expected > 0 && self.seen >= self.expected {
            self.done = true;
            return true;
        }
        false
    }

    pub fn is_complete(&self) -> bool {
        self.done
    }
}
