use serde::Serialize;
use std::sync::Mutex;

/// Counters surfaced on the bridge status endpoint.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Metrics {
    pub fetches: usize,
    pub failures: usize,
    pub markers: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_fetch(&self, markers: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.fetches += 1;
            metrics.markers = markers;
        }
    }

    pub fn record_failure(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.fetches += 1;
            metrics.failures += 1;
        }
    }

    pub fn snapshot(&self) -> Metrics {
        if let Ok(metrics) = self.inner.lock() {
            *metrics
        } else {
            Metrics::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failures_count_as_fetches() {
        let recorder = MetricsRecorder::new();
        recorder.record_fetch(12);
        recorder.record_failure();
        let snapshot = recorder.snapshot();
        assert_eq!(snapshot.fetches, 2);
        assert_eq!(snapshot.failures, 1);
        assert_eq!(snapshot.markers, 12);
    }
}
