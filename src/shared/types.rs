//! Common types used across the application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One successfully parsed catalog listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Price in whole currency units
    pub price: u64,
    /// Rating in 0..=5
    pub rating: f64,
    /// Absolute product URL
    pub url: String,
}

/// One recorded price observation of a tracked product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    /// Monotonic index within the subscription's series
    pub seq: u64,
    pub price: u64,
    pub observed_at: DateTime<Utc>,
}

/// Where operator-facing messages for a subscription or scan are sent
pub type Destination = String;
