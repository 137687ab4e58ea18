// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

/// Peer counters. `total_peers == inbound_count + outbound_count` is the
/// server's promise; it is not re-checked here.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralStats {
    pub inbound_count: u32,
    pub outbound_count: u32,
    pub total_peers: u32,
}

/// One connected peer, from `getpeerinfo`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Peer {
    pub id: i64,
    pub addr: String,
    pub subver: String,
    /// Protocol version.
    pub version: i64,
    /// Clock offset, seconds.
    pub timeoffset: i64,
    /// Connected since, unix seconds.
    pub conntime: i64,
    pub network: String,
    pub connection_type: String,
    pub inbound: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minping: Option<f64>,
    pub bytesrecv: u64,
    pub bytessent: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubverDistribution {
    pub inbound: Vec<SubverStats>,
    pub outbound: Vec<SubverStats>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubverStats {
    /// User agent label.
    pub server: String,
    /// Share of peers, 0..=100.
    pub percentage: f64,
}
