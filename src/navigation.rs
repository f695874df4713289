//! Page and lightbox navigation state.
//!
//! ## Page bar
//!
//! [`page_numbers`] renders a bounded set of page buttons. With window
//! `W = 5` and 20 pages:
//!
//! ```text
//! current  1:  1  2  3  4  5  …  20
//! current  9:  1  …  7  8  9  10 11  …  20
//! current 20:  1  …  16 17 18 19 20
//! ```
//!
//! Page 1 and the last page are always shown. When there are at most
//! `W + 2` pages every page is shown and no ellipsis appears. Near either
//! end the window hugs the boundary instead of shrinking.
//!
//! ## Lightbox
//!
//! [`Lightbox`] steps through a borrowed image list one index at a time.
//! Stepping never wraps: `next` on the last image and `previous` on the
//! first are no-ops.

use crate::types::PaginationMeta;

/// One slot in the page bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page(u32),
    Ellipsis,
}

/// Page bar entries for `current` of `total` pages with a `window` of
/// centered pages.
///
/// `current` is clamped into `1..=total`; a zero `window` is treated as 1.
/// Zero pages yields an empty bar.
pub fn page_numbers(current: u32, total: u32, window: u32) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    // Widened so `u32::MAX` page counts and windows cannot overflow.
    let total = u64::from(total);
    let window = u64::from(window.max(1));
    let current = u64::from(current).clamp(1, total);
    let page = |n: u64| PageItem::Page(n as u32);
    if total <= window + 2 {
        return (1..=total).map(page).collect();
    }

    let half = window / 2;
    let mut start = current.saturating_sub(half).max(2);
    let mut end = (current + half).min(total - 1);
    if current <= half + 1 {
        end = window.min(total - 1);
    }
    if current >= total - half {
        start = (total + 1).saturating_sub(window).max(2);
    }

    let mut items = Vec::with_capacity((end + 1).saturating_sub(start) as usize + 4);
    items.push(page(1));
    if current > half + 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(page));
    if current + half + 1 < total {
        items.push(PageItem::Ellipsis);
    }
    items.push(page(total));
    items
}

/// Current page of a paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    current: u32,
    total: u32,
    window: u32,
}

impl Pager {
    /// Start on page 1 of `total`.
    pub fn new(total: u32, window: u32) -> Self {
        Self {
            current: 1,
            total,
            window: window.max(1),
        }
    }

    /// Position taken from a fetched page's metadata.
    pub fn from_meta(meta: &PaginationMeta, window: u32) -> Self {
        let mut pager = Self::new(meta.last_page, window);
        pager.select(meta.current_page);
        pager
    }

    pub fn current(&self) -> u32 {
        self.current
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Move to `page`. Pages outside `1..=total` are ignored.
    ///
    /// Returns `true` when the page changed, i.e. when a new fetch is due.
    pub fn select(&mut self, page: u32) -> bool {
        if page == 0 || page > self.total || page == self.current {
            return false;
        }
        self.current = page;
        true
    }

    pub fn next(&mut self) -> bool {
        self.select(self.current.saturating_add(1))
    }

    pub fn previous(&mut self) -> bool {
        self.select(self.current.saturating_sub(1))
    }

    pub fn has_next(&self) -> bool {
        self.current < self.total
    }

    pub fn has_previous(&self) -> bool {
        self.current > 1
    }

    /// Replace the page count after a refetch, keeping `current` in range.
    pub fn set_total(&mut self, total: u32) {
        self.total = total;
        self.current = self.current.clamp(1, total.max(1));
    }

    pub fn items(&self) -> Vec<PageItem> {
        page_numbers(self.current, self.total, self.window)
    }
}

/// Modal viewer over an ordered list, closed until [`Lightbox::open`].
#[derive(Debug, Clone, Copy)]
pub struct Lightbox<'a, T> {
    items: &'a [T],
    index: Option<usize>,
}

impl<'a, T> Lightbox<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, index: None }
    }

    /// Show the item at `index`. Out-of-range indices leave the lightbox
    /// unchanged and return `None`.
    pub fn open(&mut self, index: usize) -> Option<&'a T> {
        let item = self.items.get(index)?;
        self.index = Some(index);
        Some(item)
    }

    pub fn close(&mut self) {
        self.index = None;
    }

    pub fn is_open(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn current(&self) -> Option<&'a T> {
        self.items.get(self.index?)
    }

    pub fn has_next(&self) -> bool {
        self.index.is_some_and(|i| i + 1 < self.items.len())
    }

    pub fn has_previous(&self) -> bool {
        self.index.is_some_and(|i| i > 0)
    }

    /// Step forward; stays put on the last item.
    pub fn next(&mut self) -> Option<&'a T> {
        if self.has_next() {
            self.index = self.index.map(|i| i + 1);
        }
        self.current()
    }

    /// Step back; stays put on the first item.
    pub fn previous(&mut self) -> Option<&'a T> {
        if self.has_previous() {
            self.index = self.index.map(|i| i - 1);
        }
        self.current()
    }
}
