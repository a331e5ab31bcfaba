//! Filter state and the record predicate.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use storefront_core::{DomainError, Price, ValueObject};

use crate::product::ProductRecord;

/// Half-open price interval `[min, max)`; `max = None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Price,
    pub max: Option<Price>,
}

impl PriceRange {
    pub const fn between(min: Price, max: Price) -> Self {
        Self { min, max: Some(max) }
    }

    pub const fn at_least(min: Price) -> Self {
        Self { min, max: None }
    }

    pub fn contains(&self, price: Price) -> bool {
        price >= self.min && self.max.is_none_or(|max| price < max)
    }
}

impl ValueObject for PriceRange {}

/// The fixed price buckets offered in the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PriceBucket {
    #[serde(rename = "under-25")]
    Under25,
    #[serde(rename = "25-50")]
    From25To50,
    #[serde(rename = "50-100")]
    From50To100,
    #[serde(rename = "over-100")]
    Over100,
}

impl PriceBucket {
    pub const ALL: [PriceBucket; 4] = [
        PriceBucket::Under25,
        PriceBucket::From25To50,
        PriceBucket::From50To100,
        PriceBucket::Over100,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            PriceBucket::Under25 => "under-25",
            PriceBucket::From25To50 => "25-50",
            PriceBucket::From50To100 => "50-100",
            PriceBucket::Over100 => "over-100",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PriceBucket::Under25 => "Under $25",
            PriceBucket::From25To50 => "$25 - $50",
            PriceBucket::From50To100 => "$50 - $100",
            PriceBucket::Over100 => "Over $100",
        }
    }

    /// The last bucket has no upper bound.
    pub fn range(self) -> PriceRange {
        match self {
            PriceBucket::Under25 => PriceRange::between(Price::ZERO, Price::from_major(25)),
            PriceBucket::From25To50 => {
                PriceRange::between(Price::from_major(25), Price::from_major(50))
            }
            PriceBucket::From50To100 => {
                PriceRange::between(Price::from_major(50), Price::from_major(100))
            }
            PriceBucket::Over100 => PriceRange::at_least(Price::from_major(100)),
        }
    }
}

impl From<PriceBucket> for PriceRange {
    fn from(bucket: PriceBucket) -> Self {
        bucket.range()
    }
}

impl FromStr for PriceBucket {
    type Err = DomainError;

    /// Accepts either the slug (`"25-50"`) or the sidebar label (`"$25 - $50"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        PriceBucket::ALL
            .into_iter()
            .find(|b| b.as_str() == s || b.label().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::validation(format!("unknown price bucket: {s}")))
    }
}

/// User-selected filter criteria. The default restricts nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterState {
    pub search: String,
    pub categories: BTreeSet<String>,
    pub price_range: Option<PriceRange>,
    pub in_stock_only: bool,
}

impl ValueObject for FilterState {}

impl FilterState {
    pub fn is_unrestricted(&self) -> bool {
        self.search.is_empty()
            && self.categories.is_empty()
            && self.price_range.is_none()
            && !self.in_stock_only
    }

    pub fn matches(&self, record: &ProductRecord) -> bool {
        Predicate::new(self).matches(record)
    }

    /// Merge a partial update; fields absent from the patch are kept.
    pub fn apply_patch(&mut self, patch: FilterPatch) {
        if let Some(search) = patch.search {
            self.search = search;
        }
        if let Some(categories) = patch.categories {
            self.categories = categories;
        }
        if let Some(price_range) = patch.price_range {
            self.price_range = price_range;
        }
        if let Some(in_stock_only) = patch.in_stock_only {
            self.in_stock_only = in_stock_only;
        }
    }

    /// Checkbox semantics: select the category if absent, otherwise deselect it.
    pub fn toggle_category(&mut self, category: &str) {
        if !self.categories.remove(category) {
            self.categories.insert(category.to_string());
        }
    }
}

/// Partial filter update. `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPatch {
    pub search: Option<String>,
    pub categories: Option<BTreeSet<String>>,
    pub price_range: Option<Option<PriceRange>>,
    pub in_stock_only: Option<bool>,
}

impl FilterPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn price_range(mut self, range: impl Into<PriceRange>) -> Self {
        self.price_range = Some(Some(range.into()));
        self
    }

    pub fn any_price(mut self) -> Self {
        self.price_range = Some(None);
        self
    }

    pub fn in_stock_only(mut self, in_stock_only: bool) -> Self {
        self.in_stock_only = Some(in_stock_only);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

/// Filter state with the search term lowercased once per pass.
struct Predicate<'f> {
    term: Option<String>,
    filter: &'f FilterState,
}

impl<'f> Predicate<'f> {
    fn new(filter: &'f FilterState) -> Self {
        let term = (!filter.search.is_empty()).then(|| filter.search.to_lowercase());
        Self { term, filter }
    }

    fn matches(&self, record: &ProductRecord) -> bool {
        if let Some(term) = &self.term {
            let hit = record.name.to_lowercase().contains(term.as_str())
                || record.description.to_lowercase().contains(term.as_str());
            if !hit {
                return false;
            }
        }

        if !self.filter.categories.is_empty() && !self.filter.categories.contains(&record.category) {
            return false;
        }

        if let Some(range) = &self.filter.price_range {
            if !range.contains(record.price) {
                return false;
            }
        }

        !self.filter.in_stock_only || record.in_stock()
    }
}

/// Keep the records that satisfy every active criterion, in input order.
pub fn apply_filters<'a>(catalog: &'a [ProductRecord], filter: &FilterState) -> Vec<&'a ProductRecord> {
    let predicate = Predicate::new(filter);
    catalog.iter().filter(|r| predicate.matches(r)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{arb_catalog, record};
    use proptest::prelude::*;

    fn ids(records: &[&ProductRecord]) -> Vec<u64> {
        records.iter().map(|r| r.id.get()).collect()
    }

    #[test]
    fn search_is_case_insensitive_over_name_and_description() {
        let catalog = vec![
            record(1, "Wireless Headphones", "Electronics", 129, 4),
            record(2, "Minimalist Backpack", "Fashion", 79, 2)
                .with_description("Durable and sleek, perfect for WIRELESS-free travel"),
            record(3, "Elegant Wristwatch", "Fashion", 199, 1),
        ];
        let filter = FilterState {
            search: "wireless".to_string(),
            ..FilterState::default()
        };

        assert_eq!(ids(&apply_filters(&catalog, &filter)), vec![1, 2]);
    }

    #[test]
    fn category_set_restricts_and_unknown_names_match_nothing() {
        let catalog = vec![
            record(1, "A", "Books", 10, 1),
            record(2, "B", "Sports", 10, 1),
            record(3, "C", "Books", 10, 1),
        ];

        let mut filter = FilterState::default();
        filter.toggle_category("Books");
        assert_eq!(ids(&apply_filters(&catalog, &filter)), vec![1, 3]);

        let filter = FilterState {
            categories: ["Toys".to_string()].into_iter().collect(),
            ..FilterState::default()
        };
        assert!(apply_filters(&catalog, &filter).is_empty());
    }

    #[test]
    fn price_range_is_half_open_and_last_bucket_unbounded() {
        let catalog = vec![
            record(1, "A", "Books", 24, 1),
            record(2, "B", "Books", 25, 1),
            record(3, "C", "Books", 49, 1),
            record(4, "D", "Books", 50, 1),
            record(5, "E", "Books", 10_000, 1),
        ];

        let mut filter = FilterState::default();
        filter.apply_patch(FilterPatch::new().price_range(PriceBucket::From25To50));
        assert_eq!(ids(&apply_filters(&catalog, &filter)), vec![2, 3]);

        filter.apply_patch(FilterPatch::new().price_range(PriceBucket::Over100));
        assert_eq!(ids(&apply_filters(&catalog, &filter)), vec![5]);

        filter.apply_patch(FilterPatch::new().any_price());
        assert_eq!(apply_filters(&catalog, &filter).len(), 5);
    }

    #[test]
    fn in_stock_only_drops_sold_out_records() {
        let catalog = vec![record(1, "A", "Books", 10, 0), record(2, "B", "Books", 10, 3)];
        let filter = FilterState {
            in_stock_only: true,
            ..FilterState::default()
        };
        assert_eq!(ids(&apply_filters(&catalog, &filter)), vec![2]);
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut filter = FilterState {
            search: "watch".to_string(),
            in_stock_only: true,
            ..FilterState::default()
        };
        filter.apply_patch(FilterPatch::new().categories(["Fashion"]));

        assert_eq!(filter.search, "watch");
        assert!(filter.in_stock_only);
        assert!(filter.categories.contains("Fashion"));
        assert!(FilterPatch::new().is_empty());
    }

    #[test]
    fn toggle_category_twice_restores_state() {
        let mut filter = FilterState::default();
        filter.toggle_category("Beauty");
        filter.toggle_category("Beauty");
        assert!(filter.is_unrestricted());
    }

    #[test]
    fn buckets_parse_from_slug_or_label() {
        assert_eq!("under-25".parse::<PriceBucket>().unwrap(), PriceBucket::Under25);
        assert_eq!("$50 - $100".parse::<PriceBucket>().unwrap(), PriceBucket::From50To100);
        assert!(matches!(
            "cheap".parse::<PriceBucket>(),
            Err(DomainError::Validation(_))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: the default filter keeps the whole catalog in order.
        #[test]
        fn unrestricted_filter_is_identity(catalog in arb_catalog(0..40)) {
            let kept = apply_filters(&catalog, &FilterState::default());
            let expected: Vec<&ProductRecord> = catalog.iter().collect();
            prop_assert_eq!(kept, expected);
        }

        /// Property: every kept record satisfies the predicate and order is preserved.
        #[test]
        fn filtering_keeps_exactly_matching_records(
            catalog in arb_catalog(0..40),
            in_stock_only in any::<bool>(),
            bucket in proptest::option::of(0usize..4),
        ) {
            let filter = FilterState {
                in_stock_only,
                price_range: bucket.map(|i| PriceBucket::ALL[i].range()),
                ..FilterState::default()
            };
            let kept = apply_filters(&catalog, &filter);
            let expected: Vec<&ProductRecord> = catalog.iter().filter(|r| filter.matches(r)).collect();
            prop_assert_eq!(kept, expected);
        }
    }
}
