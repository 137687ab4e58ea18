// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::sync::Arc;

use nodepulse_core::health::Severity;
use nodepulse_node::config::NodeConfig;
use nodepulse_node::server::build_router;
use nodepulse_node::store::{SharedStore, SyncStore};
use nodepulse_node::telemetry::init_telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    init_telemetry();

    let cfg = NodeConfig::from_env();
    tracing::info!("Initializing NodePulse with config: {:?}", cfg);

    let store: SharedStore = match SyncStore::new(&cfg) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            tracing::error!("Cannot sync with {}: {}", cfg.dashboard_url, e);
            std::process::exit(1);
        }
    };

    store.initialize().await;

    // Log health transitions as snapshots arrive.
    let watcher = store.clone();
    tokio::spawn(async move {
        let mut versions = watcher.subscribe();
        let mut last: Option<Severity> = None;
        while versions.changed().await.is_ok() {
            let report = watcher.health_report();
            if last == Some(report.severity) {
                continue;
            }
            match report.severity {
                Severity::Healthy => tracing::info!("Node healthy ({} outbound peers)", report.outbound_count),
                Severity::Degraded => tracing::warn!(
                    "Low outbound peers: {} < {}",
                    report.outbound_count,
                    report.min_outbound_peers
                ),
                Severity::Critical => tracing::warn!(
                    "Node out of sync: {}",
                    report.sync_warning.as_deref().unwrap_or("unknown")
                ),
            }
            last = Some(report.severity);
        }
    });

    let app = build_router(store.clone());

    let addr = cfg.bind_addr;
    let listener = match TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            store.disconnect();
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
        })
        .await;

    store.disconnect();
    if let Err(e) = served {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
    tracing::info!("Shut down");
}
