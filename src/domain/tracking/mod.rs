//! Tracking domain - long-lived per-subscription price watching

mod registry;
mod series;
mod tracker;

pub use registry::TrackingRegistry;
pub use series::SeriesStore;
pub use tracker::PriceTracker;

use std::time::Duration;

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::shared::types::Destination;

/// Lifecycle of one tracking subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    Initializing,
    Active,
    Stopped,
}

/// Emitted when a poll observes a price different from the last known one
#[derive(Debug, Clone)]
pub struct PriceChangeEvent {
    pub subscription_id: Uuid,
    pub old_price: Option<u64>,
    pub new_price: u64,
}

/// Read-only view of a subscription for lookups and status output
#[derive(Debug, Clone)]
pub struct SubscriptionSnapshot {
    pub id: Uuid,
    pub product_url: String,
    pub destination: Destination,
    pub initial_price: Option<u64>,
    pub last_price: Option<u64>,
    pub state: TrackerState,
    pub sample_count: usize,
}

/// Shared mutable state of one subscription.
///
/// Each field locks independently, so mutations of one subscription never
/// serialize against another, and a registry lookup never waits on a
/// tracker mid-poll.
pub struct SubscriptionHandle {
    pub id: Uuid,
    pub product_url: String,
    pub destination: Destination,
    pub poll_interval: Duration,
    pub series: SeriesStore,
    state: RwLock<TrackerState>,
    initial_price: RwLock<Option<u64>>,
    last_price: RwLock<Option<u64>>,
}

impl SubscriptionHandle {
    pub fn new(
        id: Uuid,
        product_url: impl Into<String>,
        destination: impl Into<Destination>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            id,
            product_url: product_url.into(),
            destination: destination.into(),
            poll_interval,
            series: SeriesStore::new(),
            state: RwLock::new(TrackerState::Initializing),
            initial_price: RwLock::new(None),
            last_price: RwLock::new(None),
        }
    }

    pub async fn state(&self) -> TrackerState {
        *self.state.read().await
    }

    pub async fn is_stopped(&self) -> bool {
        *self.state.read().await == TrackerState::Stopped
    }

    /// Transition Initializing -> Active; a stop that raced ahead wins.
    pub async fn activate(&self) {
        let mut state = self.state.write().await;
        if *state == TrackerState::Initializing {
            *state = TrackerState::Active;
        }
    }

    /// Terminal transition; the poll loop observes it at its next wakeup.
    pub async fn stop(&self) {
        *self.state.write().await = TrackerState::Stopped;
    }

    pub async fn initial_price(&self) -> Option<u64> {
        *self.initial_price.read().await
    }

    pub async fn set_initial_price(&self, price: u64) {
        *self.initial_price.write().await = Some(price);
    }

    pub async fn last_price(&self) -> Option<u64> {
        *self.last_price.read().await
    }

    pub async fn set_last_price(&self, price: u64) {
        *self.last_price.write().await = Some(price);
    }

    pub async fn snapshot(&self) -> SubscriptionSnapshot {
        SubscriptionSnapshot {
            id: self.id,
            product_url: self.product_url.clone(),
            destination: self.destination.clone(),
            initial_price: self.initial_price().await,
            last_price: self.last_price().await,
            state: self.state().await,
            sample_count: self.series.len().await,
        }
    }
}
