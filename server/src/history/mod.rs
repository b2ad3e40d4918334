use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};

/// One derived BTC/ETH price observation.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// epoch seconds, UTC
    #[serde(rename = "time")]
    pub timestamp: i64,
    #[serde(rename = "price")]
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Samples strictly newer than `window_start`, in their original order.
pub fn trim(samples: &[Sample], window_start: i64) -> Vec<Sample> {
    samples
        .iter()
        .filter(|sample| sample.timestamp > window_start)
        .copied()
        .collect()
}

/// Sliding-window history shared between the sampler and HTTP handlers.
///
/// Every mutation builds a fresh vector and publishes it with a single pointer
/// swap, so a reader holds either the previous or the next history, never a
/// half-trimmed one. Clones share the same underlying history.
#[derive(Clone, Default)]
pub struct HistoryStore {
    samples: Arc<ArcSwap<Vec<Sample>>>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append_and_trim(&self, sample: Sample, window_start: i64) {
        self.samples.rcu(|current| {
            let mut next = trim(current, window_start);
            next.push(sample);
            next
        });
    }

    pub fn snapshot(&self) -> Arc<Vec<Sample>> {
        self.samples.load_full()
    }
}
