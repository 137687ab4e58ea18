// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use tokio_tungstenite::tungstenite::Message;

use super::{Connector, TransportEvent, TransportStream};
use crate::errors::SyncError;

/// WebSocket transport. Text frames become [`TransportEvent::Frame`]; a read
/// error yields one [`TransportEvent::Error`] and ends the stream, as does a
/// close frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct WsConnector;

impl Connector for WsConnector {
    fn open(&self, endpoint: &str) -> BoxFuture<'static, Result<TransportStream, SyncError>> {
        let endpoint = endpoint.to_string();
        Box::pin(async move {
            let (ws, _response) = tokio_tungstenite::connect_async(endpoint.as_str())
                .await
                .map_err(|e| SyncError::Transport(e.to_string()))?;

            let events = stream::unfold(Some(ws), |state| async move {
                let mut ws = state?;
                loop {
                    match ws.next().await {
                        Some(Ok(Message::Text(text))) => {
                            return Some((TransportEvent::Frame(text.to_string()), Some(ws)));
                        }
                        Some(Ok(Message::Close(frame))) => {
                            tracing::debug!("Server closed the socket: {:?}", frame);
                            return None;
                        }
                        // Binary, Ping (tungstenite answers), Pong
                        Some(Ok(_)) => continue,
                        Some(Err(e)) => return Some((TransportEvent::Error(e.to_string()), None)),
                        None => return None,
                    }
                }
            });

            Ok(events.boxed())
        })
    }
}
