//! Page fetcher ports - the boundary to whatever renders catalog pages
//!
//! The scanner and the tracker only ever see raw field text through these
//! traits; retrieval and DOM details live behind them in the
//! infrastructure layer.

use async_trait::async_trait;

use crate::shared::errors::{ExtractError, FetchError, NavigationError};

/// A field addressable inside one listing slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    Price,
    Rating,
    Link,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Price => "price",
            FieldKind::Rating => "rating",
            FieldKind::Link => "link",
        }
    }
}

/// One open browsing session over a paginated catalog.
///
/// A session belongs to exactly one scan task and is never shared across
/// tasks.
#[async_trait]
pub trait CatalogPage: Send {
    /// Fetch the raw text of one field at a 1-based slot index on the
    /// current page.
    async fn fetch_field(&mut self, slot: u32, kind: FieldKind) -> Result<String, ExtractError>;

    /// Advance the session to the next result page.
    async fn advance_page(&mut self) -> Result<(), NavigationError>;
}

/// Factory for catalog sessions and single-product lookups
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Open a catalog session positioned on the first result page.
    async fn open_catalog(&self, query: &str) -> Result<Box<dyn CatalogPage>, FetchError>;

    /// Fetch the raw price text of a single product page.
    async fn product_price(&self, url: &str) -> Result<String, FetchError>;
}
