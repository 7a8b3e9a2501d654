use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the process-wide Prometheus recorder.
///
/// Must be called at most once; the returned handle renders the scrape output
/// and is meant to be handed to whatever serves `/metrics`.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Text served when no recorder was installed.
pub const METRICS_DISABLED: &str = "# Metrics recorder not initialized\n";
