// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Typed view of the dashboard document.
//!
//! Field names follow the backend's JSON exactly, so a `NodeView` can be
//! serialized into the canonical document and read back out of it.

use serde::{Deserialize, Serialize};

pub mod chain;
pub mod mempool;
pub mod network;
pub mod peer;

pub use chain::{BlockInfo, BlockchainInfo};
pub use mempool::MempoolInfo;
pub use network::{LocalAddress, Network, NodeInfo};
pub use peer::{GeneralStats, Peer, SubverDistribution, SubverStats};

/// Top-level keys of a snapshot frame.
pub const KEY_GENERAL_STATS: &str = "generalStats";
pub const KEY_BLOCKCHAIN: &str = "blockchainInfoResponse";
pub const KEY_BLOCK: &str = "block";

/// Everything the dashboard believes about the node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NodeView {
    pub general_stats: GeneralStats,
    pub subver_distribution: SubverDistribution,
    pub inbound_peer: Vec<Peer>,
    pub outbound_peer: Vec<Peer>,
    pub blockchain_info_response: BlockchainInfo,
    pub node_info: NodeInfo,
    pub up_time: String,
    pub block: BlockInfo,
    pub mempool_info: MempoolInfo,
}
