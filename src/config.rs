// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Configuration constants.

/// Outbound peer count below which the node is flagged.
pub const DEFAULT_MIN_OUTBOUND_PEERS: u32 = 8;

/// Seconds without a new block before the tip counts as stale.
pub const DEFAULT_MAX_BLOCK_AGE_SECS: i64 = 3600;

/// Headers may lead blocks by this much before the node counts as syncing.
pub const DEFAULT_MAX_HEADER_BLOCK_DIFF: i64 = 2;

pub const DEFAULT_MIN_VERIFICATION_PROGRESS: f64 = 0.9999;

/// Peer list sizes for the per-list health badge: at or above the first is
/// healthy, at or above the second a warning, anything less critical.
pub const HEALTHY_PEER_COUNT: usize = 10;
pub const WARNING_PEER_COUNT: usize = 5;

/// Reconnect backoff: first delay, growth factor, ceiling.
pub const BACKOFF_BASE_MS: u64 = 1000;
pub const BACKOFF_MULTIPLIER: u32 = 2;
pub const BACKOFF_MAX_MS: u64 = 30_000;

/// Path of the push endpoint on the dashboard origin.
pub const WS_PATH: &str = "/ws/dashboard";

/// Path of the one-shot configuration endpoint.
pub const CONFIG_PATH: &str = "/api/config";

/// Thresholds used by the health engine. Set once at start-up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealthThresholds {
    pub min_outbound_peers: u32,
    pub max_block_age_secs: i64,
    pub max_header_block_diff: i64,
    pub min_verification_progress: f64,
}

impl Default for HealthThresholds {
    fn default() -> Self {
        Self {
            min_outbound_peers: DEFAULT_MIN_OUTBOUND_PEERS,
            max_block_age_secs: DEFAULT_MAX_BLOCK_AGE_SECS,
            max_header_block_diff: DEFAULT_MAX_HEADER_BLOCK_DIFF,
            min_verification_progress: DEFAULT_MIN_VERIFICATION_PROGRESS,
        }
    }
}
