//! Pricewatch - marketplace catalog scanner and price tracking bot

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod report;
pub mod shared;

// Re-export main types for convenience
pub use domain::catalog::{CatalogScanner, ScanQuery, ScanResult};
pub use domain::tracking::{PriceTracker, TrackingRegistry};
pub use infrastructure::fetch::HttpPageFetcher;
