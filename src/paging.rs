//! Pagination and navigation-window arithmetic.
//!
//! Album pages are fixed-size slices of the folder's photo list, and the
//! pagination bar shows a bounded window of page links around the current
//! page. Both are pure index math on `usize` ranges; everything here is
//! independent of themes, descriptors, and I/O.

use std::ops::Range;

/// Number of pages needed to show `total` items at `per_page` items each.
///
/// An empty collection has zero pages; callers that always want at least one
/// rendered page handle that themselves.
pub fn page_count(total: usize, per_page: usize) -> usize {
    if per_page == 0 {
        return 0;
    }
    total.div_ceil(per_page)
}

/// Item index range covered by `page` (0-based).
///
/// Every page spans exactly `per_page` items except possibly the last. Pages
/// past the end are empty ranges clamped to `total`.
pub fn page_slice(total: usize, per_page: usize, page: usize) -> Range<usize> {
    if per_page == 0 {
        return total..total;
    }
    let start = per_page.saturating_mul(page).min(total);
    let end = start.saturating_add(per_page).min(total);
    start..end
}

/// The window of page indices shown as navigation links.
///
/// Returns a contiguous range no larger than `range`, containing `current`,
/// clamped to `[0, total)` and centered on `current` where the bounds allow.
/// When `total <= range` the whole `0..total` is returned.
///
/// `current` past the end is treated as the last valid index so a stale page
/// parameter still yields a usable window.
pub fn nav_window(total: usize, current: usize, range: usize) -> Range<usize> {
    if total <= range {
        return 0..total;
    }
    if range == 0 {
        return 0..0;
    }

    let current = current.min(total - 1);
    // For odd ranges this centers exactly; for even ranges the extra slot
    // goes after the current index.
    let before = (range - 1) / 2;

    if current <= before {
        0..range
    } else if current - before + range >= total {
        total - range..total
    } else {
        current - before..current - before + range
    }
}
