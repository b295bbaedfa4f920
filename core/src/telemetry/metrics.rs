use std::sync::Mutex;

pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

struct Metrics {
    recomputations: usize,
    blocked_locates: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics {
                recomputations: 0,
                blocked_locates: 0,
            }),
        }
    }

    pub fn record_recomputation(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.recomputations += 1;
        }
    }

    pub fn record_blocked_locate(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.blocked_locates += 1;
        }
    }

    pub fn snapshot(&self) -> (usize, usize) {
        if let Ok(metrics) = self.inner.lock() {
            (metrics.recomputations, metrics.blocked_locates)
        } else {
            (0, 0)
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
