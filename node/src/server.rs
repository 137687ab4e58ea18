// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use nodepulse_core::health::HealthReport;

use crate::connection::ConnectionStatus;
use crate::errors::SyncError;
use crate::network::DashboardConfig;
use crate::store::SharedStore;

pub fn build_router(store: SharedStore) -> Router {
    Router::new()
        .route("/v1/state", get(get_state))
        .route("/v1/state/:section", get(get_state_section))
        .route("/v1/status", get(get_status))
        .route("/v1/health", get(get_health))
        .route("/v1/config", get(get_config))
        .route("/v1/connect", post(connect))
        .route("/v1/disconnect", post(disconnect))
        // Observability
        .route("/metrics", get(metrics_handler))
        .layer(CorsLayer::permissive())
        .with_state(store)
}

async fn get_state(State(store): State<SharedStore>) -> Json<Value> {
    Json(json!({
        "version": store.version(),
        "state": store.document(),
    }))
}

async fn get_state_section(
    State(store): State<SharedStore>,
    Path(section): Path<String>,
) -> Result<Json<Value>, SyncError> {
    store
        .read(|state| state.document().get(&section).cloned())
        .map(Json)
        .ok_or(SyncError::UnknownSection(section))
}

async fn get_status(State(store): State<SharedStore>) -> Json<ConnectionStatus> {
    Json(store.status())
}

async fn get_health(State(store): State<SharedStore>) -> Json<HealthReport> {
    Json(store.health_report())
}

async fn get_config(State(store): State<SharedStore>) -> Json<Value> {
    let DashboardConfig { min_outbound_peers, disable_mempool_display } = store.dashboard_config();
    Json(json!({
        "attempted": store.config_attempted(),
        "minOutboundPeers": store.health().thresholds().min_outbound_peers,
        "configuredMinOutboundPeers": min_outbound_peers,
        "disableMempoolInfo": disable_mempool_display,
    }))
}

async fn connect(State(store): State<SharedStore>) -> StatusCode {
    tracing::info!("Connect requested via API");
    store.connect();
    StatusCode::ACCEPTED
}

async fn disconnect(State(store): State<SharedStore>) -> StatusCode {
    tracing::info!("Disconnect requested via API");
    store.disconnect();
    StatusCode::NO_CONTENT
}

async fn metrics_handler() -> String {
    crate::telemetry::get_metrics()
}
