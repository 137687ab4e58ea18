// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

/// `getblockchaininfo` subset pushed by the backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockchainInfo {
    /// Chain name ("main", "test", "signet", "regtest").
    pub chain: String,
    /// Height of the fully validated chain.
    pub blocks: u64,
    /// Height of the best known header chain.
    pub headers: u64,
    pub difficulty: f64,
    pub time: i64,
    pub mediantime: i64,
    /// Estimate of validation completeness, 0..=1.
    pub verificationprogress: f64,
    pub initialblockdownload: bool,
    pub chainwork: String,
    pub size_on_disk: u64,
}

/// Latest block as reported by `getblock`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockInfo {
    /// Block timestamp, unix seconds.
    pub time: i64,
    #[serde(rename = "nTx")]
    pub n_tx: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}
