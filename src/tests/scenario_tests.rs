// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! End-to-end scenarios over the pure layer: frame -> merge -> verdict.

use serde_json::json;

use crate::health::HealthEngine;
use crate::message::{classify, ServerMessage};
use crate::state::CanonicalState;
use crate::types::{BlockInfo, BlockchainInfo};

const NOW: i64 = 1_700_000_000;

fn apply_frame(state: &mut CanonicalState, frame: &str) {
    match classify(frame).unwrap() {
        ServerMessage::Snapshot(map) => {
            state.apply(&map);
        }
        other => panic!("expected snapshot, got {}", other.kind()),
    }
}

#[test]
fn test_low_outbound_after_first_snapshot() {
    let mut state = CanonicalState::new();
    apply_frame(
        &mut state,
        r#"{"generalStats":{"inboundCount":5,"outboundCount":3,"totalPeers":8}}"#,
    );
    let engine = HealthEngine::default();
    let stats = state.general_stats();
    assert_eq!(stats.total_peers, 8);
    assert!(engine.has_low_outbound_peers(stats.outbound_count));
}

#[test]
fn test_headers_ahead_means_syncing() {
    let mut state = CanonicalState::new();
    apply_frame(
        &mut state,
        r#"{"generalStats":{},"blockchainInfoResponse":{"blocks":100,"headers":103}}"#,
    );
    let engine = HealthEngine::default();
    let chain = state.blockchain_info();
    assert_eq!(engine.header_block_diff(&chain), 3);
    assert!(engine.is_syncing(&chain));
}

#[test]
fn test_verification_progress_threshold() {
    let engine = HealthEngine::default();
    let almost = BlockchainInfo { verificationprogress: 0.99999, ..Default::default() };
    let behind = BlockchainInfo { verificationprogress: 0.9, ..Default::default() };
    assert!(!engine.is_not_fully_synced(&almost));
    assert!(engine.is_not_fully_synced(&behind));
}

#[test]
fn test_block_staleness() {
    let engine = HealthEngine::default();
    assert!(engine.is_block_too_old_at(NOW - 4000, NOW));
    assert!(!engine.is_block_too_old_at(NOW - 120, NOW));

    // Same verdicts against the real clock.
    let now = crate::health::unix_now();
    assert!(engine.is_block_too_old(now - 4000));
    assert!(!engine.is_block_too_old(now - 120));
}

#[test]
fn test_out_of_sync_is_or_of_constituents() {
    let engine = HealthEngine::default();
    for stale in [false, true] {
        for syncing in [false, true] {
            for unverified in [false, true] {
                let chain = BlockchainInfo {
                    blocks: 100,
                    headers: if syncing { 110 } else { 100 },
                    verificationprogress: if unverified { 0.5 } else { 1.0 },
                    ..Default::default()
                };
                let block = BlockInfo {
                    time: if stale { NOW - 10_000 } else { NOW - 10 },
                    ..Default::default()
                };
                assert_eq!(engine.is_block_too_old_at(block.time, NOW), stale);
                assert_eq!(engine.is_syncing(&chain), syncing);
                assert_eq!(engine.is_not_fully_synced(&chain), unverified);
                assert_eq!(
                    engine.is_node_out_of_sync_at(&chain, &block, NOW),
                    stale || syncing || unverified
                );
            }
        }
    }
}

#[test]
fn test_partial_snapshots_accumulate() {
    let mut state = CanonicalState::new();
    apply_frame(
        &mut state,
        &json!({
            "generalStats": { "inboundCount": 10, "outboundCount": 10, "totalPeers": 20 },
            "block": { "time": NOW, "nTx": 2500 },
            "upTime": "0d, 00:10:00"
        })
        .to_string(),
    );
    apply_frame(
        &mut state,
        &json!({ "generalStats": { "outboundCount": 9, "totalPeers": 19 } }).to_string(),
    );

    let view = state.view();
    assert_eq!(view.general_stats.inbound_count, 10);
    assert_eq!(view.general_stats.outbound_count, 9);
    assert_eq!(view.block.n_tx, 2500);
    assert_eq!(view.up_time, "0d, 00:10:00");
}

/// Frame handling as the connection layer does it: snapshots merge, anything
/// else leaves the state alone. Returns whether the frame was merged.
fn ingest(state: &mut CanonicalState, frame: &str) -> bool {
    match classify(frame) {
        Ok(ServerMessage::Snapshot(map)) => {
            state.apply(&map);
            true
        }
        Ok(_) | Err(_) => false,
    }
}

#[test]
fn test_malformed_frames_are_skipped_between_snapshots() {
    let first = r#"{"generalStats":{"inboundCount":2,"outboundCount":12},"upTime":"0d, 00:00:05"}"#;
    let second = r#"{"generalStats":{"outboundCount":9}}"#;

    let mut state = CanonicalState::new();
    assert!(ingest(&mut state, first));
    let after_first = state.clone();

    for garbage in ["not json", r#"{"generalStats":"#, "", r#"{"generalStats":{"outboundCount":1}"#] {
        assert!(classify(garbage).is_err(), "{garbage:?} should be malformed");
        assert!(!ingest(&mut state, garbage));
        assert_eq!(state, after_first, "{garbage:?} touched the state");
    }
    assert!(ingest(&mut state, second));

    let mut expected = CanonicalState::new();
    expected.apply(classify(first).unwrap().snapshot().unwrap());
    expected.apply(classify(second).unwrap().snapshot().unwrap());

    assert_eq!(state.version(), 2);
    assert_eq!(state, expected);
    assert_eq!(state.general_stats().inbound_count, 2);
    assert_eq!(state.general_stats().outbound_count, 9);
}
