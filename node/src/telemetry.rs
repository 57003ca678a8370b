// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "sentinel_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::error!("failed to install Prometheus recorder: {e}"),
    }

    metrics::describe_counter!("sentinel_filings_persisted_total", "Filings newly written to the ledger");
    metrics::describe_counter!("sentinel_filings_duplicate_total", "Candidates already present in the ledger");
    metrics::describe_counter!("sentinel_filings_filtered_total", "Candidates dropped by the form filter");
    metrics::describe_counter!("sentinel_entity_errors_total", "Companies skipped because of a fetch or storage error");
    metrics::describe_counter!("sentinel_runs_total", "Completed reconciliation runs");
    metrics::describe_histogram!("sentinel_run_duration_seconds", "Wall time of one reconciliation run");

    metrics::gauge!("sentinel_node_up", 1.0);
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
