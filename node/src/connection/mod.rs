// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Connection Manager
//!
//! Owns the push transport. Exactly one supervisor task runs per logical
//! connection; it opens the transport, classifies every inbound frame,
//! publishes [`ConnectionStatus`] and reconnects with bounded exponential
//! backoff until [`ConnectionManager::disconnect`] is called.
//!
//! # Guarantees
//! - At most one live transport: the old stream is dropped before a new one
//!   is opened.
//! - `disconnect()` cancels before returning; no transport is opened and no
//!   status is published by the supervisor afterwards.
//! - Frames are handled one at a time in delivery order.

pub mod ws;

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::BoxStream;
use futures::StreamExt;
use nodepulse_core::backoff::Backoff;
use nodepulse_core::message::{classify, ServerMessage};
use serde::Serialize;
use serde_json::{Map, Value};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::errors::SyncError;
use crate::telemetry::{FRAMES_DISCARDED, FRAMES_RECEIVED, RECONNECT_ATTEMPTS, TRANSPORT_OPEN};

pub use ws::WsConnector;

pub const ERR_TRANSPORT: &str = "Connection error";
pub const ERR_DISCONNECTED: &str = "Disconnected from server, retrying...";
pub const ERR_RPC_UNAVAILABLE: &str = "Node RPC unavailable";

/// What the UI needs to never show an ambiguous "maybe connected" state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub is_transport_open: bool,
    /// The server reached its upstream node (status or snapshot received).
    pub is_application_layer_up: bool,
    pub last_error: Option<String>,
    pub is_retrying: bool,
    /// Retries scheduled since the last successful open.
    pub attempt: u32,
}

/// One event from an open transport. The stream ending means "closed".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Frame(String),
    Error(String),
}

pub type TransportStream = BoxStream<'static, TransportEvent>;

/// Opens transports. Swapped out in tests for an in-memory implementation.
pub trait Connector: Send + Sync + 'static {
    fn open(&self, endpoint: &str) -> BoxFuture<'static, Result<TransportStream, SyncError>>;
}

/// Receives every snapshot payload, verbatim.
pub type SnapshotCallback = Arc<dyn Fn(Map<String, Value>) + Send + Sync>;

struct Inner {
    endpoint: String,
    connector: Arc<dyn Connector>,
    backoff: Backoff,
    idle_timeout: Option<Duration>,
    on_snapshot: SnapshotCallback,
    status_tx: watch::Sender<ConnectionStatus>,
}

struct Session {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

#[derive(Default)]
struct Slot {
    active: Option<Session>,
    /// Supervisor of the last disconnected session. The next one waits for
    /// it to exit, so its transport is gone before a new one opens.
    retired: Option<JoinHandle<()>>,
}

pub struct ConnectionManager {
    inner: Arc<Inner>,
    slot: Mutex<Slot>,
}

#[derive(Debug, PartialEq, Eq)]
enum PumpOutcome {
    Closed,
    Cancelled,
}

impl ConnectionManager {
    pub fn new(
        endpoint: String,
        connector: Arc<dyn Connector>,
        backoff: Backoff,
        idle_timeout: Option<Duration>,
        on_snapshot: SnapshotCallback,
    ) -> Self {
        let (status_tx, _) = watch::channel(ConnectionStatus::default());
        Self {
            inner: Arc::new(Inner {
                endpoint,
                connector,
                backoff,
                idle_timeout,
                on_snapshot,
                status_tx,
            }),
            slot: Mutex::new(Slot::default()),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.inner.endpoint
    }

    /// Start the supervisor. No-op while one is already open, connecting or
    /// backing off. Must be called from within a tokio runtime.
    pub fn connect(&self) {
        let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(active) = slot.active.as_ref() {
            if !active.handle.is_finished() {
                tracing::debug!("connect() ignored: connection to {} already active", self.inner.endpoint);
                return;
            }
        }

        let previous = match slot.active.take() {
            Some(finished) => Some(finished.handle),
            None => slot.retired.take(),
        };

        self.inner.status_tx.send_modify(|s| s.last_error = None);

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(supervise(self.inner.clone(), cancel.clone(), previous));
        slot.active = Some(Session { cancel, handle });
    }

    /// Stop the supervisor, closing any transport and cancelling any pending
    /// reconnect. Idempotent.
    pub fn disconnect(&self) {
        {
            let mut slot = self.slot.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(session) = slot.active.take() {
                session.cancel.cancel();
                slot.retired = Some(session.handle);
                tracing::info!("Disconnected from {}", self.inner.endpoint);
            }
        }
        self.inner.status_tx.send_modify(|s| {
            s.is_transport_open = false;
            s.is_application_layer_up = false;
            s.is_retrying = false;
        });
        metrics::gauge!(TRANSPORT_OPEN, 0.0);
    }

    /// True while a supervisor task is running.
    pub fn is_active(&self) -> bool {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .as_ref()
            .map(|s| !s.handle.is_finished())
            .unwrap_or(false)
    }

    pub fn status(&self) -> ConnectionStatus {
        self.inner.status_tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ConnectionStatus> {
        self.inner.status_tx.subscribe()
    }
}

impl Drop for ConnectionManager {
    fn drop(&mut self) {
        if let Some(session) = self.slot.get_mut().unwrap_or_else(PoisonError::into_inner).active.take() {
            session.cancel.cancel();
        }
    }
}

async fn supervise(inner: Arc<Inner>, cancel: CancellationToken, previous: Option<JoinHandle<()>>) {
    // Already cancelled; it exits at its next poll and drops its transport.
    // Not raced against `cancel`, so a chain of sessions drains in order.
    if let Some(previous) = previous {
        if let Err(e) = previous.await {
            tracing::warn!("Previous supervisor for {} ended abnormally: {}", inner.endpoint, e);
        }
    }

    let mut attempt: u32 = 0;

    loop {
        if cancel.is_cancelled() {
            break;
        }

        tracing::info!("Connecting to {} (attempt {})", inner.endpoint, attempt);
        let opened = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            res = inner.connector.open(&inner.endpoint) => res,
        };

        match opened {
            Ok(stream) => {
                attempt = 0;
                inner.on_open(&cancel);
                if inner.pump(stream, &cancel).await == PumpOutcome::Cancelled {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to open transport to {}: {}", inner.endpoint, e);
                inner.on_error(&cancel);
            }
        }

        let delay = inner.backoff.delay(attempt);
        attempt = attempt.saturating_add(1);
        inner.on_close(&cancel, attempt);
        metrics::counter!(RECONNECT_ATTEMPTS, 1);
        tracing::info!("Reconnecting to {} in {:?}", inner.endpoint, delay);

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    tracing::debug!("Connection supervisor for {} stopped", inner.endpoint);
}

impl Inner {
    /// Apply `f` unless the session was cancelled. The check runs under the
    /// channel's write lock, so it cannot interleave with `disconnect()`.
    fn publish<F>(&self, cancel: &CancellationToken, f: F)
    where
        F: FnOnce(&mut ConnectionStatus),
    {
        self.status_tx.send_if_modified(|status| {
            if cancel.is_cancelled() {
                return false;
            }
            let before = status.clone();
            f(status);
            *status != before
        });
    }

    fn on_open(&self, cancel: &CancellationToken) {
        tracing::info!("Transport to {} open", self.endpoint);
        self.publish(cancel, |s| {
            metrics::gauge!(TRANSPORT_OPEN, 1.0);
            s.is_transport_open = true;
            s.last_error = None;
            s.is_retrying = false;
            s.attempt = 0;
        });
    }

    /// Marks both layers down. Scheduling the reconnect is left to the close
    /// path so it happens exactly once.
    fn on_error(&self, cancel: &CancellationToken) {
        metrics::gauge!(TRANSPORT_OPEN, 0.0);
        self.publish(cancel, |s| {
            s.is_transport_open = false;
            s.is_application_layer_up = false;
            s.last_error = Some(ERR_TRANSPORT.to_string());
        });
    }

    fn on_close(&self, cancel: &CancellationToken, attempt: u32) {
        metrics::gauge!(TRANSPORT_OPEN, 0.0);
        self.publish(cancel, |s| {
            s.is_transport_open = false;
            s.is_application_layer_up = false;
            s.last_error = Some(ERR_DISCONNECTED.to_string());
            s.is_retrying = true;
            s.attempt = attempt;
        });
    }

    async fn pump(&self, mut stream: TransportStream, cancel: &CancellationToken) -> PumpOutcome {
        loop {
            let event = tokio::select! {
                biased;
                _ = cancel.cancelled() => return PumpOutcome::Cancelled,
                ev = next_event(&mut stream, self.idle_timeout) => ev,
            };

            match event {
                Some(TransportEvent::Frame(text)) => self.handle_frame(&text, cancel),
                Some(TransportEvent::Error(e)) => {
                    tracing::warn!("Transport error on {}: {}", self.endpoint, e);
                    self.on_error(cancel);
                }
                None => {
                    tracing::warn!("Transport to {} closed", self.endpoint);
                    return PumpOutcome::Closed;
                }
            }
        }
    }

    fn handle_frame(&self, text: &str, cancel: &CancellationToken) {
        metrics::counter!(FRAMES_RECEIVED, 1);

        let message = match classify(text) {
            Ok(message) => message,
            Err(e) => {
                metrics::counter!(FRAMES_DISCARDED, 1);
                tracing::warn!("Discarding frame from {}: {}", self.endpoint, e);
                return;
            }
        };

        match message {
            ServerMessage::Status(status) => {
                tracing::debug!("Status frame: rpc_connected={}", status.rpc_connected);
                let error = match (status.rpc_connected, status.error_message) {
                    (_, Some(text)) => Some(text),
                    (false, None) => Some(ERR_RPC_UNAVAILABLE.to_string()),
                    (true, None) => None,
                };
                self.publish(cancel, |s| {
                    s.is_application_layer_up = status.rpc_connected;
                    s.last_error = error;
                });
            }
            ServerMessage::Snapshot(payload) => {
                if cancel.is_cancelled() {
                    return;
                }
                self.publish(cancel, |s| {
                    s.is_application_layer_up = true;
                    s.last_error = None;
                });
                (self.on_snapshot)(payload);
            }
            ServerMessage::Unknown => {
                tracing::debug!("Ignoring frame of unknown shape from {}", self.endpoint);
            }
        }
    }
}

async fn next_event(stream: &mut TransportStream, idle_timeout: Option<Duration>) -> Option<TransportEvent> {
    match idle_timeout {
        Some(limit) => match tokio::time::timeout(limit, stream.next()).await {
            Ok(event) => event,
            Err(_) => {
                tracing::warn!("No frame for {:?}, treating transport as closed", limit);
                None
            }
        },
        None => stream.next().await,
    }
}
