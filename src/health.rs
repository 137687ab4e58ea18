// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Health derivation.
//!
//! Stateless predicates over the canonical view, evaluated on every read.
//! Comparisons are strict: a value sitting exactly on a threshold is healthy.
//! Peer list analytics (averages and a size badge) live here too.

use serde::Serialize;

use crate::config::{HealthThresholds, HEALTHY_PEER_COUNT, WARNING_PEER_COUNT};
use crate::format::format_time_since;
use crate::types::{BlockInfo, BlockchainInfo, NodeView, Peer};

/// Wall clock, unix seconds.
pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct HealthEngine {
    thresholds: HealthThresholds,
}

impl HealthEngine {
    pub fn new(thresholds: HealthThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &HealthThresholds {
        &self.thresholds
    }

    pub fn set_min_outbound_peers(&mut self, min_outbound_peers: u32) {
        self.thresholds.min_outbound_peers = min_outbound_peers;
    }

    pub fn with_min_outbound_peers(mut self, min_outbound_peers: u32) -> Self {
        self.set_min_outbound_peers(min_outbound_peers);
        self
    }

    pub fn has_low_outbound_peers(&self, outbound_count: u32) -> bool {
        outbound_count < self.thresholds.min_outbound_peers
    }

    /// `headers - blocks`. Negative only when upstream is inconsistent.
    pub fn header_block_diff(&self, chain: &BlockchainInfo) -> i64 {
        chain.headers as i64 - chain.blocks as i64
    }

    /// Not memoized: reads the clock on every call.
    pub fn is_block_too_old(&self, block_time: i64) -> bool {
        self.is_block_too_old_at(block_time, unix_now())
    }

    pub fn is_block_too_old_at(&self, block_time: i64, now: i64) -> bool {
        now.saturating_sub(block_time) > self.thresholds.max_block_age_secs
    }

    pub fn is_syncing(&self, chain: &BlockchainInfo) -> bool {
        self.header_block_diff(chain) > self.thresholds.max_header_block_diff
    }

    pub fn is_not_fully_synced(&self, chain: &BlockchainInfo) -> bool {
        chain.verificationprogress < self.thresholds.min_verification_progress
    }

    pub fn is_node_out_of_sync(&self, chain: &BlockchainInfo, block: &BlockInfo) -> bool {
        self.is_node_out_of_sync_at(chain, block, unix_now())
    }

    pub fn is_node_out_of_sync_at(&self, chain: &BlockchainInfo, block: &BlockInfo, now: i64) -> bool {
        self.is_block_too_old_at(block.time, now) || self.is_syncing(chain) || self.is_not_fully_synced(chain)
    }

    /// One explanation, even when several conditions hold. Staleness is the
    /// most actionable signal, so it is reported first.
    ///
    /// `time_formatter` renders the block timestamp (unix seconds).
    pub fn describe_sync_warning<F>(&self, chain: &BlockchainInfo, block: &BlockInfo, time_formatter: F) -> String
    where
        F: Fn(i64) -> String,
    {
        self.describe_sync_warning_at(chain, block, time_formatter, unix_now())
    }

    pub fn describe_sync_warning_at<F>(
        &self,
        chain: &BlockchainInfo,
        block: &BlockInfo,
        time_formatter: F,
        now: i64,
    ) -> String
    where
        F: Fn(i64) -> String,
    {
        if self.is_block_too_old_at(block.time, now) {
            return format!(
                "Last block is {} old. Your node may have lost connection to the network or stopped syncing.",
                time_formatter(block.time)
            );
        }
        let progress = chain.verificationprogress * 100.0;
        if self.is_syncing(chain) {
            return format!(
                "Node is syncing: {} blocks behind. Verification progress: {:.2}%",
                self.header_block_diff(chain),
                progress
            );
        }
        if self.is_not_fully_synced(chain) {
            return format!("Node is still syncing. Verification progress: {:.2}%", progress);
        }
        "Node is out of sync with the blockchain.".to_string()
    }

    pub fn report(&self, view: &NodeView) -> HealthReport {
        self.report_at(view, unix_now())
    }

    /// Every verdict at once, for presentation layers that render them all.
    pub fn report_at(&self, view: &NodeView, now: i64) -> HealthReport {
        let chain = &view.blockchain_info_response;
        let block = &view.block;
        let outbound_count = view.general_stats.outbound_count;

        let low_outbound_peers = self.has_low_outbound_peers(outbound_count);
        let out_of_sync = self.is_node_out_of_sync_at(chain, block, now);
        let sync_warning = out_of_sync.then(|| {
            self.describe_sync_warning_at(chain, block, |t| format_time_since(t, now), now)
        });

        let severity = if out_of_sync {
            Severity::Critical
        } else if low_outbound_peers {
            Severity::Degraded
        } else {
            Severity::Healthy
        };

        HealthReport {
            severity,
            outbound_count,
            min_outbound_peers: self.thresholds.min_outbound_peers,
            low_outbound_peers,
            header_block_diff: self.header_block_diff(chain),
            block_age_secs: now.saturating_sub(block.time),
            block_too_old: self.is_block_too_old_at(block.time, now),
            syncing: self.is_syncing(chain),
            not_fully_synced: self.is_not_fully_synced(chain),
            out_of_sync,
            sync_warning,
            inbound_peers: PeerAnalytics::of(&view.inbound_peer),
            outbound_peers: PeerAnalytics::of(&view.outbound_peer),
        }
    }
}

/// Size badge for one peer list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerCountHealth {
    Healthy,
    Warning,
    Critical,
}

pub fn peer_count_health(count: usize) -> PeerCountHealth {
    if count >= HEALTHY_PEER_COUNT {
        PeerCountHealth::Healthy
    } else if count >= WARNING_PEER_COUNT {
        PeerCountHealth::Warning
    } else {
        PeerCountHealth::Critical
    }
}

/// Per-list means. `None` when no peer in the list carries the value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct PeerAverages {
    pub minping: Option<f64>,
    pub bytesrecv: Option<f64>,
    pub bytessent: Option<f64>,
    pub timeoffset: Option<f64>,
    pub conntime: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .filter(|v| v.is_finite())
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Peers without a ping sample are left out of the ping mean only.
pub fn peer_averages(peers: &[Peer]) -> PeerAverages {
    PeerAverages {
        minping: mean(peers.iter().filter_map(|p| p.minping)),
        bytesrecv: mean(peers.iter().map(|p| p.bytesrecv as f64)),
        bytessent: mean(peers.iter().map(|p| p.bytessent as f64)),
        timeoffset: mean(peers.iter().map(|p| p.timeoffset as f64)),
        conntime: mean(peers.iter().map(|p| p.conntime as f64)),
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct PeerAnalytics {
    pub count: usize,
    pub health: PeerCountHealth,
    pub averages: PeerAverages,
}

impl PeerAnalytics {
    pub fn of(peers: &[Peer]) -> Self {
        Self {
            count: peers.len(),
            health: peer_count_health(peers.len()),
            averages: peer_averages(peers),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Healthy,
    /// Synced, but with fewer outbound peers than configured.
    Degraded,
    /// Out of sync.
    Critical,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub severity: Severity,
    pub outbound_count: u32,
    pub min_outbound_peers: u32,
    pub low_outbound_peers: bool,
    pub header_block_diff: i64,
    pub block_age_secs: i64,
    pub block_too_old: bool,
    pub syncing: bool,
    pub not_fully_synced: bool,
    pub out_of_sync: bool,
    pub sync_warning: Option<String>,
    pub inbound_peers: PeerAnalytics,
    pub outbound_peers: PeerAnalytics,
}
