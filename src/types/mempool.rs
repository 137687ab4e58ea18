// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MempoolInfo {
    pub loaded: bool,
    /// Transaction count.
    pub size: u64,
    /// Sum of transaction sizes.
    pub bytes: u64,
    /// Memory usage including indexes.
    pub usage: u64,
    pub maxmempool: u64,
    pub mempoolminfee: f64,
    pub minrelaytxfee: f64,
    pub unbroadcastcount: u64,
    pub total_fee: f64,
}
