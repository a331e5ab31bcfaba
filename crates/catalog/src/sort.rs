//! Sort keys and the total order they induce over catalog records.

use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use storefront_core::DomainError;

use crate::product::ProductRecord;

/// Catalog ordering selected in the toolbar dropdown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    Newest,
    #[serde(alias = "price-low")]
    PriceAscending,
    #[serde(alias = "price-high")]
    PriceDescending,
    #[serde(alias = "name")]
    NameAscending,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Newest,
        SortKey::PriceAscending,
        SortKey::PriceDescending,
        SortKey::NameAscending,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Newest => "newest",
            SortKey::PriceAscending => "price-ascending",
            SortKey::PriceDescending => "price-descending",
            SortKey::NameAscending => "name-ascending",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::PriceAscending => "Price: Low to High",
            SortKey::PriceDescending => "Price: High to Low",
            SortKey::NameAscending => "Name: A to Z",
        }
    }

    /// Total order: distinct ids never compare equal.
    pub fn compare(self, a: &ProductRecord, b: &ProductRecord) -> Ordering {
        match self {
            SortKey::Newest => b
                .created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id)),
            SortKey::PriceAscending => a.price.cmp(&b.price).then_with(|| a.id.cmp(&b.id)),
            SortKey::PriceDescending => b.price.cmp(&a.price).then_with(|| a.id.cmp(&b.id)),
            SortKey::NameAscending => fold_case(&a.name)
                .cmp(fold_case(&b.name))
                .then_with(|| a.id.cmp(&b.id)),
        }
    }
}

fn fold_case(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

impl core::fmt::Display for SortKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(SortKey::Newest),
            "price-ascending" | "price-low" => Ok(SortKey::PriceAscending),
            "price-descending" | "price-high" => Ok(SortKey::PriceDescending),
            "name-ascending" | "name" => Ok(SortKey::NameAscending),
            other => Err(DomainError::validation(format!("unknown sort key: {other}"))),
        }
    }
}

/// Sort candidates in place (stable).
pub fn sort_products(candidates: &mut [&ProductRecord], key: SortKey) {
    candidates.sort_by(|a, b| key.compare(a, b));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{arb_catalog, record, record_at};
    use proptest::prelude::*;

    fn sorted_ids(catalog: &[ProductRecord], key: SortKey) -> Vec<u64> {
        let mut refs: Vec<&ProductRecord> = catalog.iter().collect();
        sort_products(&mut refs, key);
        refs.iter().map(|r| r.id.get()).collect()
    }

    #[test]
    fn newest_orders_by_created_at_then_id_descending() {
        let catalog = vec![
            record_at(1, "A", 10, 1),
            record_at(2, "B", 10, 3),
            record_at(3, "C", 10, 3),
            record_at(4, "D", 10, 2),
        ];
        assert_eq!(sorted_ids(&catalog, SortKey::Newest), vec![3, 2, 4, 1]);
    }

    #[test]
    fn price_orders_break_ties_by_ascending_id() {
        let catalog = vec![
            record(3, "A", "Books", 20, 1),
            record(1, "B", "Books", 20, 1),
            record(2, "C", "Books", 10, 1),
            record(4, "D", "Books", 30, 1),
        ];
        assert_eq!(sorted_ids(&catalog, SortKey::PriceAscending), vec![2, 1, 3, 4]);
        assert_eq!(sorted_ids(&catalog, SortKey::PriceDescending), vec![4, 1, 3, 2]);
    }

    #[test]
    fn name_order_ignores_case() {
        let catalog = vec![
            record(1, "banana", "Books", 1, 1),
            record(2, "Apple", "Books", 1, 1),
            record(3, "apple", "Books", 1, 1),
            record(4, "Cherry", "Books", 1, 1),
        ];
        assert_eq!(sorted_ids(&catalog, SortKey::NameAscending), vec![2, 3, 1, 4]);
    }

    #[test]
    fn sort_keys_parse_canonical_names_and_legacy_aliases() {
        assert_eq!("price-low".parse::<SortKey>().unwrap(), SortKey::PriceAscending);
        assert_eq!("name-ascending".parse::<SortKey>().unwrap(), SortKey::NameAscending);
        assert!(matches!(
            "cheapest".parse::<SortKey>(),
            Err(DomainError::Validation(_))
        ));

        let key: SortKey = serde_json::from_str("\"price-high\"").unwrap();
        assert_eq!(key, SortKey::PriceDescending);
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"price-descending\"");
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: sorting is idempotent for every key.
        #[test]
        fn sorting_twice_is_a_no_op(catalog in arb_catalog(0..40), k in 0usize..4) {
            let key = SortKey::ALL[k];
            let mut once: Vec<&ProductRecord> = catalog.iter().collect();
            sort_products(&mut once, key);
            let mut twice = once.clone();
            sort_products(&mut twice, key);
            prop_assert_eq!(once, twice);
        }

        /// Property: the result does not depend on input order (total order).
        #[test]
        fn order_is_independent_of_input_order(catalog in arb_catalog(0..40), k in 0usize..4) {
            let key = SortKey::ALL[k];
            let mut forward: Vec<&ProductRecord> = catalog.iter().collect();
            let mut reversed: Vec<&ProductRecord> = catalog.iter().rev().collect();
            sort_products(&mut forward, key);
            sort_products(&mut reversed, key);
            prop_assert_eq!(forward, reversed);
        }
    }
}
