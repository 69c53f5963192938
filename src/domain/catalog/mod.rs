//! Catalog domain - scan queries, scanning and filtering

mod filter;
mod parse;
mod scanner;

pub use filter::{filter_items, FilterThresholds};
pub use parse::{parse_price, parse_rating};
pub use scanner::{CatalogScanner, ScannerConfig};

use crate::shared::errors::QueryError;
use crate::shared::types::CatalogItem;

/// Parameters of one catalog scan. Immutable once the scan starts.
#[derive(Debug, Clone)]
pub struct ScanQuery {
    pub query: String,
    pub pages: u32,
    pub min_price: u64,
    pub max_price: u64,
    pub min_rating: f64,
}

impl ScanQuery {
    pub fn new(
        query: impl Into<String>,
        pages: u32,
        min_price: u64,
        max_price: u64,
        min_rating: f64,
    ) -> Result<Self, QueryError> {
        let query = query.into();
        if query.trim().is_empty() {
            return Err(QueryError::EmptyQuery);
        }
        if pages < 1 {
            return Err(QueryError::PageCount);
        }
        if min_price > max_price {
            return Err(QueryError::PriceRange {
                min: min_price,
                max: max_price,
            });
        }
        if !(0.0..=5.0).contains(&min_rating) {
            return Err(QueryError::Rating(min_rating));
        }
        Ok(Self {
            query,
            pages,
            min_price,
            max_price,
            min_rating,
        })
    }

    pub fn thresholds(&self) -> FilterThresholds {
        FilterThresholds {
            min_price: self.min_price,
            max_price: self.max_price,
            min_rating: self.min_rating,
        }
    }
}

/// Everything one scan produced, in encounter order.
///
/// `items` holds every successfully parsed slot regardless of thresholds,
/// so a result can be re-filtered without re-scanning. `examined` counts
/// successfully parsed slots; failed slots only show up as a lower count.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    pub examined: usize,
    pub items: Vec<CatalogItem>,
}
