//! Application services and use cases

use std::fmt::Write as _;
use std::sync::Arc;

use tokio::time::sleep;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::catalog::{filter_items, CatalogScanner, ScanQuery, ScanResult, ScannerConfig};
use crate::domain::fetch::PageFetcher;
use crate::domain::tracking::TrackingRegistry;
use crate::infrastructure::chart::{render_series, ChartOutcome, ChartRenderer, SvgLineChart};
use crate::infrastructure::delivery::Transport;
use crate::shared::errors::AppError;
use crate::shared::types::{CatalogItem, Destination};
use crate::shared::utils::format_price;

/// Wires the scanner, the tracking registry and the delivery transport
/// into the operations the operator surface exposes.
pub struct WatchService {
    config: Config,
    scanner: CatalogScanner,
    fetcher: Arc<dyn PageFetcher>,
    transport: Arc<dyn Transport>,
    registry: TrackingRegistry,
    renderer: Box<dyn ChartRenderer>,
}

impl WatchService {
    pub fn new(
        config: Config,
        fetcher: Arc<dyn PageFetcher>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let scanner = CatalogScanner::new(ScannerConfig::from(&config.catalog));
        let registry = TrackingRegistry::new(
            fetcher.clone(),
            transport.clone(),
            config.tracking.poll_interval(),
        );
        Self {
            config,
            scanner,
            fetcher,
            transport,
            registry,
            renderer: Box::new(SvgLineChart::default()),
        }
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Scan the catalog, deliver the filtered results, return the raw
    /// scan so it can be re-filtered or reported without re-scanning.
    pub async fn run_search(
        &self,
        query: &ScanQuery,
        destination: &Destination,
    ) -> Result<ScanResult, AppError> {
        self.transport
            .send_text(destination, "Пожалуйста, подождите, пока я найду товары...")
            .await;

        let mut page = self.fetcher.open_catalog(&query.query).await?;
        let result = self.scanner.scan(query, page.as_mut()).await;

        let (matched, matched_count) = filter_items(&result.items, &query.thresholds());

        self.transport
            .send_text(
                destination,
                &format!(
                    "Найдено {} товаров по запросу \"{}\" в диапазоне цен от {} до {} и с рейтингом не ниже {} на {} страницах.",
                    matched_count,
                    query.query,
                    query.min_price,
                    query.max_price,
                    query.min_rating,
                    query.pages,
                ),
            )
            .await;

        self.deliver_items(&matched, destination).await;

        Ok(result)
    }

    /// Send matched items in fixed-size chunks. Chunking exists purely to
    /// keep individual messages small; it does not reorder anything.
    async fn deliver_items(&self, items: &[CatalogItem], destination: &Destination) {
        let chunk_size = self.config.delivery.chunk_size.max(1);
        for chunk in items.chunks(chunk_size) {
            let mut text = String::from("Отфильтрованные результаты:\n");
            for item in chunk {
                let _ = write!(
                    text,
                    "Цена: {}\nРейтинг: {}\nURL: {}\n\n",
                    format_price(item.price),
                    item.rating,
                    item.url
                );
            }
            self.transport.send_text(destination, &text).await;
            sleep(self.config.delivery.chunk_delay()).await;
        }
    }

    pub async fn start_tracking(&self, url: &str, destination: &Destination) -> Uuid {
        let id = self.registry.start(url, destination).await;
        self.transport
            .send_text(
                destination,
                &format!("Цена товара будет отслеживаться. Подписка: {}", id),
            )
            .await;
        id
    }

    pub async fn stop_tracking(&self, id: Uuid, destination: &Destination) -> bool {
        let stopped = self.registry.stop(id).await;
        let reply = if stopped {
            "Отслеживание цены остановлено.".to_string()
        } else {
            format!("Подписка {} не найдена.", id)
        };
        self.transport.send_text(destination, &reply).await;
        stopped
    }

    /// Render and deliver the price chart of one subscription.
    pub async fn send_chart(&self, id: Uuid, destination: &Destination) {
        let samples = match self.registry.samples(id).await {
            Some(samples) => samples,
            None => {
                self.transport
                    .send_text(destination, &format!("Подписка {} не найдена.", id))
                    .await;
                return;
            }
        };

        match render_series(self.renderer.as_ref(), &samples) {
            ChartOutcome::Image(bytes) => {
                self.transport
                    .send_image(destination, &bytes, "График цены")
                    .await;
            }
            ChartOutcome::InsufficientData => {
                self.transport
                    .send_text(destination, "Недостаточно данных для построения графика.")
                    .await;
            }
        }
    }

    pub fn registry(&self) -> &TrackingRegistry {
        &self.registry
    }

    pub async fn shutdown(&self) {
        info!("Shutting down watch service");
        self.registry.shutdown().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fetch::{CatalogPage, FieldKind};
    use crate::shared::errors::{ExtractError, FetchError, NavigationError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// One-page catalog with three fixed items plus a constant product price
    struct FixedFetcher;

    struct FixedPage {
        items: Vec<(u64, f64)>,
    }

    #[async_trait]
    impl CatalogPage for FixedPage {
        async fn fetch_field(&mut self, slot: u32, kind: FieldKind) -> Result<String, ExtractError> {
            match self.items.get((slot - 1) as usize) {
                Some((price, rating)) => Ok(match kind {
                    FieldKind::Price => format!("{}", price),
                    FieldKind::Rating => format!("{}", rating),
                    FieldKind::Link => format!("https://shop.test/item/{}", slot),
                }),
                None => Err(ExtractError::NotFound {
                    field: kind.as_str(),
                    slot,
                }),
            }
        }

        async fn advance_page(&mut self) -> Result<(), NavigationError> {
            Err(NavigationError::NoMoreResults)
        }
    }

    #[async_trait]
    impl PageFetcher for FixedFetcher {
        async fn open_catalog(&self, _query: &str) -> Result<Box<dyn CatalogPage>, FetchError> {
            Ok(Box::new(FixedPage {
                items: vec![(1_000, 4.8), (50_000, 5.0), (2_000, 3.0)],
            }))
        }

        async fn product_price(&self, _url: &str) -> Result<String, FetchError> {
            Ok("1500".to_string())
        }
    }

    struct RecordingTransport {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send_text(&self, _destination: &str, text: &str) {
            self.sent.lock().unwrap().push(text.to_string());
        }

        async fn send_image(&self, _destination: &str, _image: &[u8], caption: &str) {
            self.sent.lock().unwrap().push(format!("image:{}", caption));
        }
    }

    fn zero_delay_config() -> Config {
        let mut config = Config::default();
        config.catalog.max_slots = 5;
        config.catalog.slot_backoff_ms = 0;
        config.catalog.slot_throttle_ms = 0;
        config.catalog.page_settle_ms = 0;
        config.delivery.chunk_delay_ms = 0;
        config
    }

    fn service() -> (WatchService, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport {
            sent: Mutex::new(Vec::new()),
        });
        let service = WatchService::new(
            zero_delay_config(),
            Arc::new(FixedFetcher),
            transport.clone(),
        );
        (service, transport)
    }

    #[tokio::test]
    async fn test_search_delivers_summary_and_matches() {
        let (service, transport) = service();
        let query = ScanQuery::new("чайник", 1, 500, 3_000, 4.0).unwrap();

        let result = service
            .run_search(&query, &"operator".to_string())
            .await
            .unwrap();

        // raw result keeps everything, matched subset goes out
        assert_eq!(result.examined, 3);
        let sent = transport.sent.lock().unwrap();
        assert!(sent.iter().any(|m| m.contains("Найдено 1 товаров")));
        assert!(sent.iter().any(|m| m.contains("https://shop.test/item/1")));
        assert!(!sent.iter().any(|m| m.contains("https://shop.test/item/2")));
    }

    #[tokio::test]
    async fn test_chart_lifecycle_messages() {
        let (service, transport) = service();
        let destination = "operator".to_string();

        let id = service.start_tracking("https://shop.test/item/9", &destination).await;
        tokio::task::yield_now().await;

        // exactly one sample so far -> insufficient data
        service.send_chart(id, &destination).await;
        {
            let sent = transport.sent.lock().unwrap();
            assert!(sent.iter().any(|m| m.contains("Недостаточно данных")));
        }

        // unknown subscription
        service.send_chart(Uuid::new_v4(), &destination).await;
        let sent = transport.sent.lock().unwrap();
        assert!(sent.iter().any(|m| m.contains("не найдена")));

        service.shutdown().await;
    }
}
