// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Inbound frame classification.
//!
//! The backend pushes two frame shapes told apart by field presence. They are
//! turned into a tagged enum right after parsing so nothing downstream has to
//! check for keys.

use serde_json::{Map, Value};

use crate::error::FrameResult;
use crate::types::KEY_GENERAL_STATS;

pub const KEY_RPC_CONNECTED: &str = "rpcConnected";
pub const KEY_ERROR_MESSAGE: &str = "errorMessage";

#[derive(Clone, Debug, PartialEq)]
pub enum ServerMessage {
    /// Application-layer liveness: the socket is up, but is the node's RPC?
    Status(StatusMessage),
    /// Partial view of node statistics, forwarded verbatim to the merge.
    Snapshot(Map<String, Value>),
    /// Any other shape. Ignored so newer servers can add message types.
    Unknown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub rpc_connected: bool,
    pub error_message: Option<String>,
}

impl ServerMessage {
    pub fn kind(&self) -> &'static str {
        match self {
            ServerMessage::Status(_) => "status",
            ServerMessage::Snapshot(_) => "snapshot",
            ServerMessage::Unknown => "unknown",
        }
    }

    pub fn snapshot(&self) -> Option<&Map<String, Value>> {
        match self {
            ServerMessage::Snapshot(map) => Some(map),
            _ => None,
        }
    }

    /// `generalStats` wins over `rpcConnected` when both are present.
    pub fn from_object(map: Map<String, Value>) -> Self {
        if map.contains_key(KEY_GENERAL_STATS) {
            return ServerMessage::Snapshot(map);
        }
        match map.get(KEY_RPC_CONNECTED) {
            Some(Value::Bool(rpc_connected)) => ServerMessage::Status(StatusMessage {
                rpc_connected: *rpc_connected,
                error_message: map
                    .get(KEY_ERROR_MESSAGE)
                    .and_then(Value::as_str)
                    .map(str::to_owned),
            }),
            _ => ServerMessage::Unknown,
        }
    }
}

/// Parse and classify one text frame.
///
/// Only invalid JSON is an error. Well-formed JSON that is not an object is
/// `Unknown`.
pub fn classify(frame: &str) -> FrameResult<ServerMessage> {
    let value: Value = serde_json::from_str(frame)?;
    Ok(match value {
        Value::Object(map) => ServerMessage::from_object(map),
        _ => ServerMessage::Unknown,
    })
}
