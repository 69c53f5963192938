//! Registry of active tracking subscriptions

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};
use uuid::Uuid;

use super::{PriceTracker, SubscriptionHandle, SubscriptionSnapshot};
use crate::domain::fetch::PageFetcher;
use crate::infrastructure::delivery::Transport;
use crate::shared::types::{Destination, PriceSample};
use crate::shared::utils::generate_id;

/// Process-wide table of active subscriptions.
///
/// The table itself is the only shared structure; each subscription's
/// state locks independently inside its [`SubscriptionHandle`], so
/// unrelated trackers never serialize.
pub struct TrackingRegistry {
    fetcher: Arc<dyn PageFetcher>,
    transport: Arc<dyn Transport>,
    poll_interval: Duration,
    subscriptions: RwLock<HashMap<Uuid, Arc<SubscriptionHandle>>>,
    tasks: RwLock<HashMap<Uuid, JoinHandle<()>>>,
}

impl TrackingRegistry {
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        transport: Arc<dyn Transport>,
        poll_interval: Duration,
    ) -> Self {
        Self {
            fetcher,
            transport,
            poll_interval,
            subscriptions: RwLock::new(HashMap::new()),
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Create a subscription and spawn its tracker task.
    ///
    /// Duplicate url/destination pairs are permitted; each subscription
    /// polls and notifies independently.
    pub async fn start(&self, product_url: &str, destination: &Destination) -> Uuid {
        let id = generate_id();
        let handle = Arc::new(SubscriptionHandle::new(
            id,
            product_url,
            destination.clone(),
            self.poll_interval,
        ));

        self.subscriptions.write().await.insert(id, handle.clone());

        let tracker = PriceTracker::new(handle, self.fetcher.clone(), self.transport.clone());
        let task = tokio::spawn(async move { tracker.run().await });
        self.tasks.write().await.insert(id, task);

        info!("🛰  Subscription {} tracks {}", id, product_url);
        id
    }

    /// Stop a subscription. Removal from the table is immediate; the
    /// tracker task observes the stop at its next wakeup, bounded by one
    /// poll interval.
    pub async fn stop(&self, id: Uuid) -> bool {
        let handle = self.subscriptions.write().await.remove(&id);
        match handle {
            Some(handle) => {
                handle.stop().await;
                // the task drains on its own; only the bookkeeping entry goes
                let _ = self.tasks.write().await.remove(&id);
                info!("🛑 Subscription {} stopped", id);
                true
            }
            None => {
                debug!("Stop requested for unknown subscription {}", id);
                false
            }
        }
    }

    pub async fn get(&self, id: Uuid) -> Option<SubscriptionSnapshot> {
        let subscriptions = self.subscriptions.read().await;
        match subscriptions.get(&id) {
            Some(handle) => Some(handle.snapshot().await),
            None => None,
        }
    }

    /// Ordered sample series of one subscription.
    pub async fn samples(&self, id: Uuid) -> Option<Vec<PriceSample>> {
        let handle = self.subscriptions.read().await.get(&id).cloned();
        match handle {
            Some(handle) => Some(handle.series.snapshot().await),
            None => None,
        }
    }

    pub async fn active_count(&self) -> usize {
        self.subscriptions.read().await.len()
    }

    /// Stop every subscription and wait for the tracker tasks to finish.
    pub async fn shutdown(&self) {
        let handles: Vec<Arc<SubscriptionHandle>> =
            self.subscriptions.write().await.drain().map(|(_, h)| h).collect();
        for handle in &handles {
            handle.stop().await;
        }

        let tasks: Vec<JoinHandle<()>> =
            self.tasks.write().await.drain().map(|(_, t)| t).collect();
        for task in &tasks {
            task.abort();
        }
        let _ = futures::future::join_all(tasks).await;

        info!("✅ Tracking registry shut down ({} subscriptions)", handles.len());
    }
}
