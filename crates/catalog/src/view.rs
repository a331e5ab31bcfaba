//! The catalog view engine.
//!
//! [`CatalogView`] owns the one mutable state bundle of the product listing
//! (filter, sort key, page) together with the current snapshot, and keeps a
//! [`ViewResult`] that is recomputed synchronously after every change:
//! filter, then sort, then slice.

use std::num::NonZeroUsize;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::config::CatalogConfig;
use crate::filter::{FilterPatch, FilterState, apply_filters};
use crate::pagination::{PageButton, PageState, build_page_buttons, clamp_page, paginate};
use crate::product::ProductRecord;
use crate::provider::{CatalogProvider, FetchError, ensure_unique_ids};
use crate::sort::{SortKey, sort_products};

/// What the rendering layer draws for the current state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewResult {
    pub items: Vec<ProductRecord>,
    pub total_count: usize,
    pub total_pages: usize,
    pub current_page: usize,
    pub page_buttons: Vec<PageButton>,
    #[serde(skip)]
    page_size: usize,
}

impl ViewResult {
    fn empty(page_size: NonZeroUsize) -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 1,
            current_page: 1,
            page_buttons: build_page_buttons(1, 1),
            page_size: page_size.get(),
        }
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// 1-based positions of the shown items within all matches
    /// ("Showing 13-24 of 48"); `None` when nothing is shown.
    pub fn item_range(&self) -> Option<RangeInclusive<usize>> {
        if self.items.is_empty() {
            return None;
        }
        let first = (self.current_page - 1) * self.page_size + 1;
        Some(first..=first + self.items.len() - 1)
    }
}

/// Whether a snapshot has been installed, and how the last fetch went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    NotLoaded,
    Loaded,
    Failed(FetchError),
}

#[derive(Debug, Clone)]
pub struct CatalogView {
    catalog: Option<Vec<ProductRecord>>,
    load_state: LoadState,
    filter: FilterState,
    sort: SortKey,
    page: PageState,
    result: ViewResult,
}

impl CatalogView {
    pub fn new(page_size: NonZeroUsize) -> Self {
        Self {
            catalog: None,
            load_state: LoadState::NotLoaded,
            filter: FilterState::default(),
            sort: SortKey::default(),
            page: PageState::new(page_size),
            result: ViewResult::empty(page_size),
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(config.page_size)
    }

    pub fn view(&self) -> &ViewResult {
        &self.result
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort
    }

    pub fn page_state(&self) -> PageState {
        self.page
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    /// The installed snapshot; empty until the first successful load.
    pub fn catalog(&self) -> &[ProductRecord] {
        self.catalog.as_deref().unwrap_or_default()
    }

    /// Fetch a fresh snapshot.
    ///
    /// On failure the previous snapshot, filter, sort key, and page are kept
    /// as they were; only the load state records the error.
    pub fn load<P>(&mut self, provider: &P) -> Result<&ViewResult, FetchError>
    where
        P: CatalogProvider + ?Sized,
    {
        let fetched = provider.fetch_catalog();
        self.install(fetched)
    }

    /// Install an already-fetched snapshot. Filter and sort survive; the page
    /// is clamped into the new range. A snapshot with repeated ids is refused
    /// the same way a failed fetch is.
    pub fn replace_catalog(
        &mut self,
        records: Vec<ProductRecord>,
    ) -> Result<&ViewResult, FetchError> {
        self.install(Ok(records))
    }

    fn install(
        &mut self,
        fetched: Result<Vec<ProductRecord>, FetchError>,
    ) -> Result<&ViewResult, FetchError> {
        match fetched.and_then(|records| ensure_unique_ids(&records).map(|()| records)) {
            Ok(records) => {
                tracing::debug!(records = records.len(), "catalog snapshot installed");
                self.catalog = Some(records);
                self.load_state = LoadState::Loaded;
                Ok(self.recompute())
            }
            Err(err) => {
                tracing::warn!(error = %err, "catalog fetch failed");
                self.load_state = LoadState::Failed(err.clone());
                Err(err)
            }
        }
    }

    /// Merge a partial filter update and return to page 1.
    pub fn set_filter(&mut self, patch: FilterPatch) -> &ViewResult {
        self.filter.apply_patch(patch);
        self.reset_page_and_recompute()
    }

    pub fn toggle_category(&mut self, category: &str) -> &ViewResult {
        self.filter.toggle_category(category);
        self.reset_page_and_recompute()
    }

    /// "Clear all": default filter, page 1. The sort key is kept.
    pub fn clear_filters(&mut self) -> &ViewResult {
        self.filter = FilterState::default();
        self.reset_page_and_recompute()
    }

    pub fn set_sort(&mut self, key: SortKey) -> &ViewResult {
        self.sort = key;
        self.reset_page_and_recompute()
    }

    /// Jump to page `n`, clamped into `[1, total_pages]`.
    pub fn set_page(&mut self, n: usize) -> &ViewResult {
        self.page = self.page.with_page(n);
        self.recompute()
    }

    pub fn next_page(&mut self) -> &ViewResult {
        let next = self.page.page().saturating_add(1);
        self.set_page(next)
    }

    pub fn previous_page(&mut self) -> &ViewResult {
        let previous = self.page.page().saturating_sub(1);
        self.set_page(previous)
    }

    fn reset_page_and_recompute(&mut self) -> &ViewResult {
        self.page = self.page.with_page(1);
        self.recompute()
    }

    fn recompute(&mut self) -> &ViewResult {
        let catalog = self.catalog.as_deref().unwrap_or_default();
        let mut candidates = apply_filters(catalog, &self.filter);
        sort_products(&mut candidates, self.sort);

        let total_count = candidates.len();
        let page_size = self.page.page_size();
        let total_pages = crate::pagination::total_pages(total_count, page_size);
        let current_page = clamp_page(self.page.page(), total_pages);
        self.page = self.page.with_page(current_page);

        let (items, _) = paginate(&candidates, &self.page);
        let items: Vec<ProductRecord> = items.iter().map(|r| (*r).clone()).collect();

        tracing::debug!(
            catalog = catalog.len(),
            matches = total_count,
            page = current_page,
            pages = total_pages,
            sort = %self.sort,
            "catalog view recomputed"
        );

        self.result = ViewResult {
            items,
            total_count,
            total_pages,
            current_page,
            page_buttons: build_page_buttons(current_page, total_pages),
            page_size: page_size.get(),
        };
        &self.result
    }
}

impl Default for CatalogView {
    fn default() -> Self {
        Self::new(crate::pagination::DEFAULT_PAGE_SIZE)
    }
}
