//! Request duration accumulator guarded by a single mutex.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;

#[derive(Default)]
struct Totals {
    requests: u64,
    total_duration: Duration,
    total_latency: Duration,
    endpoint_durations: HashMap<String, Duration>,
    endpoint_latencies: HashMap<String, Duration>,
}

/// Aggregated request timings since the accumulator was created.
///
/// Cloning shares the underlying state, so every clone records into and
/// reads from the same totals.
///
/// Per-path entries are keyed by the raw request path and are never evicted:
/// every distinct `/deals/{id}` seen adds one entry to each map for the life of
/// the process, so memory grows with the number of distinct ids requested.
#[derive(Clone, Default)]
pub struct Metrics {
    inner: Arc<Mutex<Totals>>,
}

/// Point-in-time view served by `GET /metrics`.
///
/// Means are human-readable durations; per-path values are cumulative nanoseconds.
#[derive(Debug, Serialize, PartialEq)]
pub struct MetricsSnapshot {
    pub total_requests: u64,
    pub mean_request_duration: String,
    pub mean_request_latency: String,
    pub endpoint_metrics: BTreeMap<String, u64>,
    pub endpoint_latencies: BTreeMap<String, u64>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    // The guarded data is plain counters, so a panic elsewhere cannot leave it inconsistent.
    fn lock(&self) -> MutexGuard<'_, Totals> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds one request to the totals and to the entry for `path`.
    pub fn record_request(&self, path: &str, duration: Duration, latency: Duration) {
        let mut totals = self.lock();
        totals.requests += 1;
        totals.total_duration += duration;
        totals.total_latency += latency;
        *totals.endpoint_durations.entry(path.to_string()).or_default() += duration;
        *totals.endpoint_latencies.entry(path.to_string()).or_default() += latency;
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let totals = self.lock();
        MetricsSnapshot {
            total_requests: totals.requests,
            mean_request_duration: format!("{:?}", mean(totals.total_duration, totals.requests)),
            mean_request_latency: format!("{:?}", mean(totals.total_latency, totals.requests)),
            endpoint_metrics: as_nanos(&totals.endpoint_durations),
            endpoint_latencies: as_nanos(&totals.endpoint_latencies),
        }
    }
}

/// `total / count`, or zero when nothing was recorded.
pub fn mean(total: Duration, count: u64) -> Duration {
    if count == 0 {
        return Duration::ZERO;
    }
    let nanos = total.as_nanos() / u128::from(count);
    Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
}

fn as_nanos(map: &HashMap<String, Duration>) -> BTreeMap<String, u64> {
    map.iter()
        .map(|(path, d)| (path.clone(), u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)))
        .collect()
}
