// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

/// Node identity, from `getnetworkinfo`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeInfo {
    pub version: u64,
    /// User agent, e.g. "/Satoshi:27.0.0/".
    pub subversion: String,
    pub protocolversion: u64,
    pub networks: Vec<Network>,
    pub localaddresses: Vec<LocalAddress>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Network {
    pub name: String,
    pub limited: bool,
    pub reachable: bool,
    pub proxy: String,
    pub proxy_randomize_credentials: bool,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalAddress {
    pub address: String,
    pub port: u16,
    pub score: i64,
}
