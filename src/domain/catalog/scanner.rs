//! Catalog scanner - drives pagination and per-slot field extraction

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{parse_price, parse_rating, ScanQuery, ScanResult};
use crate::config::CatalogCfg;
use crate::domain::fetch::{CatalogPage, FieldKind};
use crate::shared::errors::{ExtractError, NavigationError};
use crate::shared::types::CatalogItem;

/// Scan pacing and bounds, resolved from [`CatalogCfg`]
#[derive(Debug, Clone)]
pub struct ScannerConfig {
    pub max_slots: u32,
    pub slot_backoff: Duration,
    pub slot_throttle: Duration,
    pub page_settle: Duration,
}

impl From<&CatalogCfg> for ScannerConfig {
    fn from(cfg: &CatalogCfg) -> Self {
        Self {
            max_slots: cfg.max_slots,
            slot_backoff: cfg.slot_backoff(),
            slot_throttle: cfg.slot_throttle(),
            page_settle: cfg.page_settle(),
        }
    }
}

/// Sequentially walks catalog pages, extracting and parsing every slot.
pub struct CatalogScanner {
    config: ScannerConfig,
}

impl CatalogScanner {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Scan up to `query.pages` result pages through one open session.
    ///
    /// Extraction and parse failures skip the slot after a short backoff;
    /// a failed page advance ends the scan with whatever was accumulated.
    /// Item order is encounter order, page-major then slot-minor.
    pub async fn scan(&self, query: &ScanQuery, page: &mut dyn CatalogPage) -> ScanResult {
        info!(
            "🔍 Scanning catalog: query={:?}, pages={}",
            query.query, query.pages
        );

        let mut items: Vec<CatalogItem> = Vec::new();

        for page_no in 1..=query.pages {
            let before = items.len();

            for slot in 1..=self.config.max_slots {
                match self.scan_slot(page, slot).await {
                    Ok(item) => {
                        items.push(item);
                        sleep(self.config.slot_throttle).await;
                    }
                    Err(e) => {
                        debug!("Slot {} on page {} skipped: {}", slot, page_no, e);
                        sleep(self.config.slot_backoff).await;
                    }
                }
            }

            debug!(
                "Page {}: {} of {} slots parsed",
                page_no,
                items.len() - before,
                self.config.max_slots
            );

            if page_no < query.pages {
                match page.advance_page().await {
                    Ok(()) => sleep(self.config.page_settle).await,
                    Err(NavigationError::NoMoreResults) => {
                        info!("Catalog exhausted after page {}", page_no);
                        break;
                    }
                    Err(e) => {
                        warn!("⚠️  Pagination failed after page {}: {}", page_no, e);
                        break;
                    }
                }
            }
        }

        info!("✅ Scan finished: {} items parsed", items.len());

        ScanResult {
            examined: items.len(),
            items,
        }
    }

    async fn scan_slot(
        &self,
        page: &mut dyn CatalogPage,
        slot: u32,
    ) -> Result<CatalogItem, ExtractError> {
        let price_raw = page.fetch_field(slot, FieldKind::Price).await?;
        let rating_raw = page.fetch_field(slot, FieldKind::Rating).await?;
        let url = page.fetch_field(slot, FieldKind::Link).await?;

        Ok(CatalogItem {
            price: parse_price(&price_raw)?,
            rating: parse_rating(&rating_raw)?,
            url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    fn test_config(max_slots: u32) -> ScannerConfig {
        ScannerConfig {
            max_slots,
            slot_backoff: Duration::ZERO,
            slot_throttle: Duration::ZERO,
            page_settle: Duration::ZERO,
        }
    }

    fn query(pages: u32) -> ScanQuery {
        ScanQuery::new("чайник", pages, 0, u64::MAX, 0.0).unwrap()
    }

    /// Scripted catalog: `None` in a slot simulates an extraction failure.
    struct FakePage {
        pages: Vec<Vec<Option<(u64, f64)>>>,
        current: usize,
        broken_pagination: bool,
    }

    impl FakePage {
        fn new(pages: Vec<Vec<Option<(u64, f64)>>>) -> Self {
            Self {
                pages,
                current: 0,
                broken_pagination: false,
            }
        }
    }

    #[async_trait]
    impl CatalogPage for FakePage {
        async fn fetch_field(&mut self, slot: u32, kind: FieldKind) -> Result<String, ExtractError> {
            let slots = &self.pages[self.current];
            match slots.get((slot - 1) as usize) {
                Some(Some((price, rating))) => Ok(match kind {
                    FieldKind::Price => format!("{} \u{20bd}", price),
                    FieldKind::Rating => format!("{}", rating).replace('.', ","),
                    FieldKind::Link => {
                        format!("https://shop.test/item/{}-{}", self.current + 1, slot)
                    }
                }),
                _ => Err(ExtractError::NotFound {
                    field: kind.as_str(),
                    slot,
                }),
            }
        }

        async fn advance_page(&mut self) -> Result<(), NavigationError> {
            if self.broken_pagination {
                return Err(NavigationError::Failed("pagination control missing".into()));
            }
            if self.current + 1 >= self.pages.len() {
                return Err(NavigationError::NoMoreResults);
            }
            self.current += 1;
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_items_in_encounter_order() {
        let mut page = FakePage::new(vec![
            vec![Some((100, 4.5)), Some((200, 4.0))],
            vec![Some((300, 3.5))],
        ]);
        let scanner = CatalogScanner::new(test_config(2));

        let result = scanner.scan(&query(2), &mut page).await;

        let urls: Vec<&str> = result.items.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "https://shop.test/item/1-1",
                "https://shop.test/item/1-2",
                "https://shop.test/item/2-1",
            ]
        );
        assert_eq!(result.items[0].price, 100);
        assert_eq!(result.items[0].rating, 4.5);
    }

    #[tokio::test]
    async fn test_failed_slots_are_skipped() {
        let mut page = FakePage::new(vec![vec![
            Some((100, 4.5)),
            None,
            Some((300, 4.0)),
            None,
        ]]);
        let scanner = CatalogScanner::new(test_config(4));

        let result = scanner.scan(&query(1), &mut page).await;

        assert_eq!(result.examined, 2);
        assert_eq!(result.items.len(), 2);
        assert_eq!(result.items[1].price, 300);
    }

    #[tokio::test]
    async fn test_fully_failing_page_still_advances() {
        let mut page = FakePage::new(vec![
            vec![None, None, None],
            vec![Some((250, 4.9))],
        ]);
        let scanner = CatalogScanner::new(test_config(3));

        let result = scanner.scan(&query(2), &mut page).await;

        assert_eq!(result.examined, 1);
        assert_eq!(result.items[0].price, 250);
    }

    #[tokio::test]
    async fn test_navigation_failure_returns_partial_result() {
        let mut page = FakePage::new(vec![
            vec![Some((100, 4.5))],
            vec![Some((200, 4.0))],
        ]);
        page.broken_pagination = true;
        let scanner = CatalogScanner::new(test_config(1));

        let result = scanner.scan(&query(2), &mut page).await;

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.items[0].price, 100);
    }

    #[tokio::test]
    async fn test_catalog_shorter_than_requested_pages() {
        let mut page = FakePage::new(vec![vec![Some((100, 4.5))]]);
        let scanner = CatalogScanner::new(test_config(1));

        let result = scanner.scan(&query(5), &mut page).await;

        assert_eq!(result.items.len(), 1);
        assert_eq!(result.examined, 1);
    }

    #[tokio::test]
    async fn test_malformed_field_text_skips_slot() {
        struct GarbagePricePage;

        #[async_trait]
        impl CatalogPage for GarbagePricePage {
            async fn fetch_field(
                &mut self,
                _slot: u32,
                kind: FieldKind,
            ) -> Result<String, ExtractError> {
                Ok(match kind {
                    FieldKind::Price => "нет в наличии".to_string(),
                    FieldKind::Rating => "4,5".to_string(),
                    FieldKind::Link => "https://shop.test/item/1".to_string(),
                })
            }

            async fn advance_page(&mut self) -> Result<(), NavigationError> {
                Err(NavigationError::NoMoreResults)
            }
        }

        let scanner = CatalogScanner::new(test_config(3));
        let result = scanner.scan(&query(1), &mut GarbagePricePage).await;

        assert_eq!(result.examined, 0);
        assert!(result.items.is_empty());
    }
}
