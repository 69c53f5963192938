//! Threshold filtering of scanned catalog items

use crate::shared::types::CatalogItem;

/// Numeric predicates applied to scanned items
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterThresholds {
    pub min_price: u64,
    pub max_price: u64,
    pub min_rating: f64,
}

impl FilterThresholds {
    pub fn matches(&self, item: &CatalogItem) -> bool {
        self.min_price <= item.price
            && item.price <= self.max_price
            && item.rating >= self.min_rating
    }
}

/// Apply thresholds to scanned items.
///
/// Pure and order-preserving: the output is a subsequence of the input.
/// Returns the matched items together with their count.
pub fn filter_items(
    items: &[CatalogItem],
    thresholds: &FilterThresholds,
) -> (Vec<CatalogItem>, usize) {
    let matched: Vec<CatalogItem> = items
        .iter()
        .filter(|item| thresholds.matches(item))
        .cloned()
        .collect();
    let count = matched.len();
    (matched, count)
}
