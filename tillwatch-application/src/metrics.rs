use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    detect_runs: AtomicU64,
    detect_degraded: AtomicU64,
    anomalies_recorded: AtomicU64,
    resolutions: AtomicU64,
}

impl Metrics {
    pub fn record_detect_run(&self) {
        self.detect_runs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_detect_degraded(&self) {
        self.detect_degraded.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_anomalies(&self, count: usize) {
        self.anomalies_recorded
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_resolution(&self) {
        self.resolutions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let runs = self.detect_runs.load(Ordering::Relaxed);
        let degraded = self.detect_degraded.load(Ordering::Relaxed);
        let anomalies = self.anomalies_recorded.load(Ordering::Relaxed);
        let resolutions = self.resolutions.load(Ordering::Relaxed);

        format!(
            "# TYPE tillwatch_detect_runs_total counter\n\
tillwatch_detect_runs_total {}\n\
# TYPE tillwatch_detect_degraded_total counter\n\
tillwatch_detect_degraded_total {}\n\
# TYPE tillwatch_anomalies_total counter\n\
tillwatch_anomalies_total {}\n\
# TYPE tillwatch_resolutions_total counter\n\
tillwatch_resolutions_total {}\n",
            runs, degraded, anomalies, resolutions
        )
    }
}
