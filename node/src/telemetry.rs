// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use std::sync::OnceLock;

static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

pub const FRAMES_RECEIVED: &str = "nodepulse_frames_received_total";
pub const FRAMES_DISCARDED: &str = "nodepulse_frames_discarded_total";
pub const SNAPSHOTS_MERGED: &str = "nodepulse_snapshots_merged_total";
pub const RECONNECT_ATTEMPTS: &str = "nodepulse_reconnect_attempts_total";
pub const TRANSPORT_OPEN: &str = "nodepulse_transport_open";

/// Initialize telemetry (logs + metrics)
pub fn init_telemetry() {
    // 1. Initialize Tracing (Logs)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "nodepulse_node=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Initialize Metrics (Prometheus)
    match PrometheusBuilder::new().install_recorder() {
        Ok(handle) => {
            if PROM_HANDLE.set(handle).is_err() {
                tracing::warn!("Prometheus handle already set. Telemetry re-initialized?");
            }
        }
        Err(e) => tracing::warn!("Failed to install Prometheus recorder: {}", e),
    }

    metrics::describe_counter!(FRAMES_RECEIVED, "Text frames received from the dashboard server");
    metrics::describe_counter!(FRAMES_DISCARDED, "Frames dropped because they were not valid JSON");
    metrics::describe_counter!(SNAPSHOTS_MERGED, "Snapshots merged into the canonical state");
    metrics::describe_counter!(RECONNECT_ATTEMPTS, "Reconnects scheduled after a transport close");
    metrics::describe_gauge!(TRANSPORT_OPEN, "1 while the push transport is open");

    metrics::gauge!(TRANSPORT_OPEN, 0.0);
}

/// Get the Prometheus handle to render metrics
pub fn get_metrics() -> String {
    if let Some(handle) = PROM_HANDLE.get() {
        handle.render()
    } else {
        "# metrics not initialized".to_string()
    }
}
