//! Append-only in-memory price series

use chrono::Utc;
use tokio::sync::RwLock;

use crate::shared::types::PriceSample;

/// One subscription's ordered price observations.
///
/// Samples are only ever appended; the sequence index is monotonic and
/// assigned under the write lock.
pub struct SeriesStore {
    samples: RwLock<Vec<PriceSample>>,
}

impl SeriesStore {
    pub fn new() -> Self {
        Self {
            samples: RwLock::new(Vec::new()),
        }
    }

    pub async fn append(&self, price: u64) -> PriceSample {
        let mut samples = self.samples.write().await;
        let sample = PriceSample {
            seq: samples.len() as u64,
            price,
            observed_at: Utc::now(),
        };
        samples.push(sample.clone());
        sample
    }

    /// Ordered read-only copy of the series.
    pub async fn snapshot(&self) -> Vec<PriceSample> {
        self.samples.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.samples.read().await.len()
    }
}

impl Default for SeriesStore {
    fn default() -> Self {
        Self::new()
    }
}
