// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! The single long-lived document the dashboard reads from.
//!
//! Created once with every field present, then only ever merged into. Reads
//! go through typed sections which fall back to defaults, so a `null` or an
//! oddly shaped value from the server degrades one section, not the view.

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::merge::merge;
use crate::types::{
    BlockInfo, BlockchainInfo, GeneralStats, MempoolInfo, NodeInfo, NodeView, Peer,
    SubverDistribution, KEY_BLOCK, KEY_BLOCKCHAIN, KEY_GENERAL_STATS,
};

#[derive(Clone, Debug, PartialEq)]
pub struct CanonicalState {
    doc: Map<String, Value>,
    /// Number of snapshots merged so far.
    version: u64,
}

impl CanonicalState {
    pub fn new() -> Self {
        let doc = match serde_json::to_value(NodeView::default()) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        Self { doc, version: 0 }
    }

    /// Merge a partial snapshot and return the new version.
    pub fn apply(&mut self, partial: &Map<String, Value>) -> u64 {
        merge(&mut self.doc, partial);
        self.version += 1;
        self.version
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn document(&self) -> &Map<String, Value> {
        &self.doc
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.doc.clone())
    }

    pub fn general_stats(&self) -> GeneralStats {
        self.section(KEY_GENERAL_STATS)
    }

    pub fn blockchain_info(&self) -> BlockchainInfo {
        self.section(KEY_BLOCKCHAIN)
    }

    pub fn latest_block(&self) -> BlockInfo {
        self.section(KEY_BLOCK)
    }

    pub fn view(&self) -> NodeView {
        NodeView {
            general_stats: self.general_stats(),
            subver_distribution: self.section::<SubverDistribution>("subverDistribution"),
            inbound_peer: self.section::<Vec<Peer>>("inboundPeer"),
            outbound_peer: self.section::<Vec<Peer>>("outboundPeer"),
            blockchain_info_response: self.blockchain_info(),
            node_info: self.section::<NodeInfo>("nodeInfo"),
            up_time: self.section::<String>("upTime"),
            block: self.latest_block(),
            mempool_info: self.section::<MempoolInfo>("mempoolInfo"),
        }
    }

    fn section<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.doc
            .get(key)
            .and_then(|raw| serde_json::from_value(without_nulls(raw)).ok())
            .unwrap_or_default()
    }
}

impl Default for CanonicalState {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy of `value` with null object entries and null array elements dropped,
/// so `#[serde(default)]` fills them in.
fn without_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), without_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items.iter().filter(|v| !v.is_null()).map(without_nulls).collect(),
        ),
        other => other.clone(),
    }
}
