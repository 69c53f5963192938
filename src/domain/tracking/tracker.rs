//! Price tracker - the per-subscription polling state machine

use std::sync::Arc;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use super::{PriceChangeEvent, SubscriptionHandle};
use crate::domain::catalog::parse_price;
use crate::domain::fetch::PageFetcher;
use crate::infrastructure::delivery::Transport;
use crate::shared::errors::FetchError;
use crate::shared::utils::format_price;

/// Watches one product's price on a fixed interval.
///
/// The loop is strictly sequential - fetch, wait, fetch - so a
/// subscription never has two polls in flight. A failed fetch skips the
/// cycle without touching any state.
pub struct PriceTracker {
    handle: Arc<SubscriptionHandle>,
    fetcher: Arc<dyn PageFetcher>,
    transport: Arc<dyn Transport>,
}

impl PriceTracker {
    pub fn new(
        handle: Arc<SubscriptionHandle>,
        fetcher: Arc<dyn PageFetcher>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            handle,
            fetcher,
            transport,
        }
    }

    /// Initialize, then poll until the subscription is stopped.
    pub async fn run(&self) {
        self.initialize().await;

        loop {
            sleep(self.handle.poll_interval).await;
            if self.handle.is_stopped().await {
                break;
            }
            self.poll_once().await;
        }

        debug!("Tracker {} exited", self.handle.id);
    }

    /// One synchronous price fetch to establish the baseline.
    ///
    /// A failed fetch is not an error: the subscription starts with an
    /// unknown price and the first successful poll becomes the baseline
    /// without raising a change alert.
    async fn initialize(&self) {
        match self.fetch_price().await {
            Ok(price) => {
                self.handle.set_initial_price(price).await;
                self.handle.set_last_price(price).await;
                self.handle.series.append(price).await;
                info!(
                    "📌 Tracking {} from {}",
                    self.handle.id,
                    format_price(price)
                );
            }
            Err(e) => {
                warn!(
                    "⚠️  Initial price fetch for {} failed ({}); first successful poll sets the baseline",
                    self.handle.id, e
                );
            }
        }
        self.handle.activate().await;
    }

    async fn poll_once(&self) {
        let price = match self.fetch_price().await {
            Ok(price) => price,
            Err(e) => {
                // transient; skip the cycle, keep state untouched
                debug!("Poll for {} skipped: {}", self.handle.id, e);
                return;
            }
        };

        self.handle.series.append(price).await;

        let last = self.handle.last_price().await;
        if let Some(previous) = last {
            if previous != price {
                self.notify_change(PriceChangeEvent {
                    subscription_id: self.handle.id,
                    old_price: last,
                    new_price: price,
                })
                .await;
            }
        }
        self.handle.set_last_price(price).await;
    }

    async fn notify_change(&self, event: PriceChangeEvent) {
        info!(
            "💰 Price change for {}: {:?} -> {}",
            event.subscription_id, event.old_price, event.new_price
        );
        self.transport
            .send_text(
                &self.handle.destination,
                &format!(
                    "Цена товара была изменена на: {}",
                    format_price(event.new_price)
                ),
            )
            .await;
    }

    async fn fetch_price(&self) -> Result<u64, FetchError> {
        let raw = self.fetcher.product_price(&self.handle.product_url).await?;
        Ok(parse_price(&raw)?)
    }
}
