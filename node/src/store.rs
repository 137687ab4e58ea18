// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Synchronization Store
//!
//! Composition root: owns the canonical state, wires the connection
//! manager's snapshot callback into the merge, and hands read access plus
//! connect/disconnect to the presentation layer.
//!
//! The connection supervisor is the only writer. Every merge bumps a version
//! published on a watch channel so readers can re-render on change.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;

use nodepulse_core::health::{HealthEngine, HealthReport};
use nodepulse_core::state::CanonicalState;
use nodepulse_core::types::NodeView;
use serde_json::Value;
use tokio::sync::watch;

use crate::config::NodeConfig;
use crate::connection::{Connector, ConnectionManager, ConnectionStatus, SnapshotCallback, WsConnector};
use crate::errors::SyncError;
use crate::network::{ConfigClient, DashboardConfig};
use crate::telemetry::SNAPSHOTS_MERGED;

pub type SharedState = Arc<RwLock<CanonicalState>>;
pub type SharedStore = Arc<SyncStore>;

pub struct SyncStore {
    state: SharedState,
    version_tx: Arc<watch::Sender<u64>>,
    health: RwLock<HealthEngine>,
    dashboard_config: RwLock<DashboardConfig>,
    config_attempted: AtomicBool,
    config_client: ConfigClient,
    config_timeout: Duration,
    connection: ConnectionManager,
}

impl SyncStore {
    /// Store talking WebSocket to the configured dashboard origin.
    pub fn new(cfg: &NodeConfig) -> Result<Self, SyncError> {
        Self::with_connector(cfg, Arc::new(WsConnector))
    }

    pub fn with_connector(cfg: &NodeConfig, connector: Arc<dyn Connector>) -> Result<Self, SyncError> {
        let ws_url = cfg.ws_url()?;
        let config_url = cfg.config_url()?;

        let state: SharedState = Arc::new(RwLock::new(CanonicalState::new()));
        let (version_tx, _) = watch::channel(0u64);
        let version_tx = Arc::new(version_tx);

        let on_snapshot: SnapshotCallback = {
            let state = state.clone();
            let version_tx = version_tx.clone();
            Arc::new(move |partial| {
                let version = write_lock(&state).apply(&partial);
                metrics::counter!(SNAPSHOTS_MERGED, 1);
                tracing::debug!("Merged snapshot, state version {}", version);
                version_tx.send_replace(version);
            })
        };

        let connection = ConnectionManager::new(ws_url, connector, cfg.backoff, cfg.idle_timeout, on_snapshot);

        Ok(Self {
            state,
            version_tx,
            health: RwLock::new(HealthEngine::default()),
            dashboard_config: RwLock::new(DashboardConfig::default()),
            config_attempted: AtomicBool::new(false),
            config_client: ConfigClient::new(config_url),
            config_timeout: cfg.config_timeout,
            connection,
        })
    }

    /// Fetch configuration, then connect. A failed or slow fetch keeps the
    /// defaults and never blocks the connect. The fetch runs at most once per
    /// store; later calls only connect.
    pub async fn initialize(&self) {
        if self.config_attempted() {
            tracing::debug!("Config already fetched, skipping");
            self.connect();
            return;
        }
        match tokio::time::timeout(self.config_timeout, self.config_client.fetch()).await {
            Ok(Ok(cfg)) => {
                tracing::info!("Loaded dashboard config from {}: {:?}", self.config_client.url(), cfg);
                self.apply_config(cfg);
            }
            Ok(Err(e)) => {
                tracing::warn!("{}. Using default thresholds.", e);
            }
            Err(_) => {
                tracing::warn!(
                    "Config fetch from {} timed out after {:?}. Using default thresholds.",
                    self.config_client.url(),
                    self.config_timeout
                );
            }
        }
        self.config_attempted.store(true, Ordering::SeqCst);
        self.connect();
    }

    /// A zero threshold means the backend has none configured.
    pub fn apply_config(&self, cfg: DashboardConfig) {
        if cfg.min_outbound_peers > 0 {
            write_lock(&self.health).set_min_outbound_peers(cfg.min_outbound_peers);
        }
        *write_lock(&self.dashboard_config) = cfg;
    }

    pub fn connect(&self) {
        self.connection.connect();
    }

    pub fn disconnect(&self) {
        self.connection.disconnect();
    }

    /// Read the canonical state without copying it.
    pub fn read<R>(&self, f: impl FnOnce(&CanonicalState) -> R) -> R {
        f(&read_lock(&self.state))
    }

    pub fn document(&self) -> Value {
        self.read(CanonicalState::to_value)
    }

    pub fn view(&self) -> NodeView {
        self.read(CanonicalState::view)
    }

    pub fn version(&self) -> u64 {
        *self.version_tx.borrow()
    }

    /// Fires after every merge.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.version_tx.subscribe()
    }

    pub fn status(&self) -> ConnectionStatus {
        self.connection.status()
    }

    pub fn subscribe_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.connection.subscribe()
    }

    pub fn is_active(&self) -> bool {
        self.connection.is_active()
    }

    pub fn endpoint(&self) -> &str {
        self.connection.endpoint()
    }

    pub fn health(&self) -> HealthEngine {
        *read_lock(&self.health)
    }

    /// Verdicts computed now, against the current state.
    pub fn health_report(&self) -> HealthReport {
        let view = self.view();
        self.health().report(&view)
    }

    pub fn dashboard_config(&self) -> DashboardConfig {
        read_lock(&self.dashboard_config).clone()
    }

    pub fn config_attempted(&self) -> bool {
        self.config_attempted.load(Ordering::SeqCst)
    }
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
