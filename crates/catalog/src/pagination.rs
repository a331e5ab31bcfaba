//! Page-window math and the windowed pager.

use std::num::NonZeroUsize;

use serde::{Serialize, Serializer};

/// Products shown per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: NonZeroUsize = match NonZeroUsize::new(12) {
    Some(n) => n,
    None => unreachable!(),
};

/// Pagers with at most this many pages show every page button.
const FULL_PAGER_MAX: usize = 5;

/// Current page (1-based) and fixed page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageState {
    page: usize,
    page_size: NonZeroUsize,
}

impl PageState {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self { page: 1, page_size }
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> NonZeroUsize {
        self.page_size
    }

    /// Page numbers below 1 are treated as 1; the upper clamp needs the
    /// candidate count and is done by the view.
    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

/// `ceil(count / page_size)`, but never less than 1 so an empty result still
/// renders a single (empty) page.
pub fn total_pages(count: usize, page_size: NonZeroUsize) -> usize {
    count.div_ceil(page_size.get()).max(1)
}

pub fn clamp_page(page: usize, total_pages: usize) -> usize {
    page.clamp(1, total_pages.max(1))
}

/// Slice `[(page-1)*size, page*size)` of `ordered`, clipped to its length.
pub fn paginate<'a, T>(ordered: &'a [T], state: &PageState) -> (&'a [T], usize) {
    let size = state.page_size.get();
    let start = (state.page - 1).saturating_mul(size).min(ordered.len());
    let end = state.page.saturating_mul(size).min(ordered.len());
    (&ordered[start..end], total_pages(ordered.len(), state.page_size))
}

/// One button of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageButton {
    Page(usize),
    Ellipsis,
}

/// Serialized as the page number, or the string `"ellipsis"`.
impl Serialize for PageButton {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PageButton::Page(n) => serializer.serialize_u64(*n as u64),
            PageButton::Ellipsis => serializer.serialize_str("ellipsis"),
        }
    }
}

/// Windowed pager labels for `current` out of `total_pages`.
pub fn build_page_buttons(current: usize, total_pages: usize) -> Vec<PageButton> {
    use PageButton::{Ellipsis, Page};

    if total_pages <= FULL_PAGER_MAX {
        return (1..=total_pages).map(Page).collect();
    }

    if current <= 3 {
        vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(total_pages)]
    } else if current >= total_pages - 2 {
        let mut buttons = vec![Page(1), Ellipsis];
        buttons.extend((total_pages - 3..=total_pages).map(Page));
        buttons
    } else {
        vec![
            Page(1),
            Ellipsis,
            Page(current - 1),
            Page(current),
            Page(current + 1),
            Ellipsis,
            Page(total_pages),
        ]
    }
}
