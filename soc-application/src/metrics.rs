use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug, Default)]
pub struct Metrics {
    analysis_runs: AtomicU64,
    analysis_events: AtomicU64,
    analysis_failures: AtomicU64,
    anomalies: AtomicU64,
}

impl Metrics {
    pub fn record_analysis(&self, event_count: usize, anomaly_count: usize) {
        self.analysis_runs.fetch_add(1, Ordering::Relaxed);
        self.analysis_events
            .fetch_add(event_count as u64, Ordering::Relaxed);
        self.anomalies
            .fetch_add(anomaly_count as u64, Ordering::Relaxed);
    }

    pub fn record_analysis_failure(&self) {
        self.analysis_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn render_prometheus(&self) -> String {
        let runs = self.analysis_runs.load(Ordering::Relaxed);
        let events = self.analysis_events.load(Ordering::Relaxed);
        let failures = self.analysis_failures.load(Ordering::Relaxed);
        let anomalies = self.anomalies.load(Ordering::Relaxed);

        format!(
            "# TYPE soc_analysis_runs_total counter\n\
soc_analysis_runs_total {}\n\
# TYPE soc_analysis_events_total counter\n\
soc_analysis_events_total {}\n\
# TYPE soc_analysis_failures_total counter\n\
soc_analysis_failures_total {}\n\
# TYPE soc_anomalies_total counter\n\
soc_anomalies_total {}\n",
            runs, events, failures, anomalies
        )
    }
}
