// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::time::Duration;
use std::{fs, path::Path};

/// Catalog scan pacing and bounds.
///
/// Every delay the scanner takes is an explicit field here so tests can
/// inject near-zero values.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogCfg {
    /// Search URL template; `{query}` and `{page}` are substituted
    pub search_url: String,
    /// Upper bound of listing slots examined per page
    pub max_slots: u32,
    /// Delay after a failed slot extraction, milliseconds
    pub slot_backoff_ms: u64,
    /// Delay after a successful slot extraction, milliseconds
    pub slot_throttle_ms: u64,
    /// Settle delay after advancing to the next page, milliseconds
    pub page_settle_ms: u64,
}

impl Default for CatalogCfg {
    fn default() -> Self {
        Self {
            search_url: "https://www.wildberries.ru/catalog/0/search.aspx?page={page}&sort=popular&search={query}".to_string(),
            max_slots: 79,
            slot_backoff_ms: 1000,
            slot_throttle_ms: 200,
            page_settle_ms: 3000,
        }
    }
}

impl CatalogCfg {
    pub fn slot_backoff(&self) -> Duration {
        Duration::from_millis(self.slot_backoff_ms)
    }

    pub fn slot_throttle(&self) -> Duration {
        Duration::from_millis(self.slot_throttle_ms)
    }

    pub fn page_settle(&self) -> Duration {
        Duration::from_millis(self.page_settle_ms)
    }
}

/// CSS selectors for listing and product pages
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SelectorsCfg {
    /// One listing slot on a catalog page
    pub slot: String,
    /// Price text inside a slot
    pub price: String,
    /// Rating text inside a slot
    pub rating: String,
    /// Product link inside a slot (href attribute)
    pub link: String,
    /// Price text on a single product page
    pub product_price: String,
}

impl Default for SelectorsCfg {
    fn default() -> Self {
        Self {
            slot: "article.product-card".to_string(),
            price: ".price ins, .price__lower-price".to_string(),
            rating: ".address-rate-mini, .product-card__rating".to_string(),
            link: "a.product-card__link".to_string(),
            product_price: ".price-block__final-price".to_string(),
        }
    }
}

/// Price tracking pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingCfg {
    /// Poll period in seconds. This is a low-frequency background watch;
    /// the default is 12 hours.
    pub poll_interval_secs: u64,
}

impl Default for TrackingCfg {
    fn default() -> Self {
        Self {
            poll_interval_secs: 12 * 60 * 60,
        }
    }
}

impl TrackingCfg {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

/// Result delivery pacing
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DeliveryCfg {
    /// Items per message when sending filtered results
    pub chunk_size: usize,
    /// Delay between chunk messages, milliseconds
    pub chunk_delay_ms: u64,
}

impl Default for DeliveryCfg {
    fn default() -> Self {
        Self {
            chunk_size: 10,
            chunk_delay_ms: 500,
        }
    }
}

impl DeliveryCfg {
    pub fn chunk_delay(&self) -> Duration {
        Duration::from_millis(self.chunk_delay_ms)
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpCfg {
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: format!("pricewatch/{}", env!("CARGO_PKG_VERSION")),
            timeout_ms: 30_000,
        }
    }
}

impl HttpCfg {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub catalog: CatalogCfg,
    pub selectors: SelectorsCfg,
    pub tracking: TrackingCfg,
    pub delivery: DeliveryCfg,
    pub http: HttpCfg,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s).context("parse Config.toml")?;
        Ok(cfg)
    }
}
