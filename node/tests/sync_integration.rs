use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tokio::sync::Notify;

use nodepulse_core::backoff::Backoff;
use nodepulse_core::health::Severity;
use nodepulse_node::config::NodeConfig;
use nodepulse_node::store::SyncStore;

/// Fake dashboard backend. Connection `n` gets `script[n]` (the last entry
/// repeats), then stays open until `kick` fires.
#[derive(Clone)]
struct Backend {
    script: Arc<Vec<Vec<String>>>,
    connections: Arc<AtomicUsize>,
    kick: Arc<Notify>,
    config: serde_json::Value,
}

async fn ws_handler(ws: WebSocketUpgrade, State(backend): State<Backend>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| serve_socket(socket, backend))
}

async fn serve_socket(mut socket: WebSocket, backend: Backend) {
    let n = backend.connections.fetch_add(1, Ordering::SeqCst);
    let frames = backend
        .script
        .get(n)
        .or_else(|| backend.script.last())
        .cloned()
        .unwrap_or_default();
    for frame in frames {
        if socket.send(Message::Text(frame)).await.is_err() {
            return;
        }
    }
    backend.kick.notified().await;
    let _ = socket.close().await;
}

async fn config_handler(State(backend): State<Backend>) -> Json<serde_json::Value> {
    Json(backend.config.clone())
}

async fn spawn_backend(script: Vec<Vec<String>>, config: serde_json::Value) -> (SocketAddr, Backend) {
    let backend = Backend {
        script: Arc::new(script),
        connections: Arc::new(AtomicUsize::new(0)),
        kick: Arc::new(Notify::new()),
        config,
    };
    let app = Router::new()
        .route("/ws/dashboard", get(ws_handler))
        .route("/api/config", get(config_handler))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, backend)
}

fn store_for(addr: SocketAddr) -> SyncStore {
    let cfg = NodeConfig {
        dashboard_url: format!("http://{}", addr),
        backoff: Backoff::new(Duration::from_millis(20), 2, Duration::from_millis(200)),
        config_timeout: Duration::from_secs(2),
        ..Default::default()
    };
    SyncStore::new(&cfg).unwrap()
}

async fn wait_for_version(store: &SyncStore, at_least: u64) {
    let mut versions = store.subscribe();
    tokio::time::timeout(Duration::from_secs(5), versions.wait_for(|v| *v >= at_least))
        .await
        .expect("timed out waiting for snapshot")
        .expect("store dropped");
}

fn now() -> i64 {
    nodepulse_core::health::unix_now()
}

fn full_snapshot() -> String {
    json!({
        "generalStats": { "inboundCount": 10, "outboundCount": 10, "totalPeers": 20 },
        "inboundPeer": [{ "id": 1 }, { "id": 2 }],
        "blockchainInfoResponse": {
            "chain": "main", "blocks": 800000, "headers": 800000, "verificationprogress": 0.99999
        },
        "block": { "time": now() - 60, "nTx": 3000 },
        "upTime": "0d, 01:00:00"
    })
    .to_string()
}

#[tokio::test]
async fn test_snapshots_merge_end_to_end() {
    let partial = json!({
        "generalStats": { "outboundCount": 4 },
        "inboundPeer": [{ "id": 9 }]
    })
    .to_string();
    let (addr, _backend) = spawn_backend(
        vec![vec![full_snapshot(), "{not json".to_string(), partial]],
        json!({ "minOutboundPeers": 0 }),
    )
    .await;

    let store = store_for(addr);
    store.initialize().await;
    wait_for_version(&store, 2).await;

    let doc = store.document();
    assert_eq!(doc["generalStats"]["inboundCount"], 10);
    assert_eq!(doc["generalStats"]["outboundCount"], 4);
    assert_eq!(doc["inboundPeer"], json!([{ "id": 9 }]));
    assert_eq!(doc["upTime"], "0d, 01:00:00");
    assert_eq!(store.version(), 2);

    let status = store.status();
    assert!(status.is_transport_open);
    assert!(status.is_application_layer_up);
    assert_eq!(status.last_error, None);

    // 4 < 8 outbound, chain otherwise synced.
    assert_eq!(store.health_report().severity, Severity::Degraded);

    store.disconnect();
}

#[tokio::test]
async fn test_remote_config_applies_threshold() {
    let (addr, _backend) = spawn_backend(
        vec![vec![full_snapshot()]],
        json!({ "minOutboundPeers": 12, "disableMempoolInfo": true }),
    )
    .await;

    let store = store_for(addr);
    store.initialize().await;
    assert!(store.config_attempted());
    assert_eq!(store.health().thresholds().min_outbound_peers, 12);
    assert!(store.dashboard_config().disable_mempool_display);

    wait_for_version(&store, 1).await;
    let report = store.health_report();
    assert!(report.low_outbound_peers);
    assert_eq!(report.min_outbound_peers, 12);

    store.disconnect();
}

#[tokio::test]
async fn test_status_frame_reports_rpc_down() {
    let status_frame = json!({ "rpcConnected": false, "errorMessage": "bitcoind unreachable" }).to_string();
    let (addr, _backend) = spawn_backend(vec![vec![status_frame]], json!({})).await;

    let store = store_for(addr);
    store.initialize().await;

    let mut rx = store.subscribe_status();
    let status = tokio::time::timeout(
        Duration::from_secs(5),
        rx.wait_for(|s| s.is_transport_open && s.last_error.is_some()),
    )
    .await
    .unwrap()
    .unwrap()
    .clone();

    assert!(!status.is_application_layer_up);
    assert_eq!(status.last_error.as_deref(), Some("bitcoind unreachable"));
    assert_eq!(store.version(), 0);

    store.disconnect();
}

#[tokio::test]
async fn test_reconnects_after_server_drop() {
    let second = json!({ "generalStats": { "outboundCount": 11 } }).to_string();
    let (addr, backend) = spawn_backend(vec![vec![full_snapshot()], vec![second]], json!({})).await;

    let store = store_for(addr);
    store.initialize().await;
    wait_for_version(&store, 1).await;

    backend.kick.notify_one();
    wait_for_version(&store, 2).await;

    assert!(backend.connections.load(Ordering::SeqCst) >= 2);
    let doc = store.document();
    assert_eq!(doc["generalStats"]["outboundCount"], 11);
    assert_eq!(doc["generalStats"]["inboundCount"], 10);

    let status = store.status();
    assert!(status.is_transport_open);
    assert_eq!(status.attempt, 0);

    store.disconnect();
}

#[tokio::test]
async fn test_disconnect_stops_reconnecting() {
    let (addr, backend) = spawn_backend(vec![vec![full_snapshot()]], json!({})).await;

    let store = store_for(addr);
    store.initialize().await;
    wait_for_version(&store, 1).await;

    store.disconnect();
    backend.kick.notify_one();
    let seen = backend.connections.load(Ordering::SeqCst);

    tokio::time::sleep(Duration::from_millis(400)).await;

    assert_eq!(backend.connections.load(Ordering::SeqCst), seen);
    assert!(!store.is_active());
    assert!(!store.status().is_transport_open);
}
