// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};

use nodepulse_core::format::{format_bytes, format_duration_secs, format_ping, format_time_offset};
use nodepulse_core::health::{HealthReport, PeerAnalytics, PeerCountHealth, Severity};
use nodepulse_core::types::NodeView;
use nodepulse_node::connection::ConnectionStatus;

pub fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Healthy => "OK",
        Severity::Degraded => "WARN",
        Severity::Critical => "CRIT",
    }
}

fn flag(bad: bool) -> &'static str {
    if bad {
        "WARN"
    } else {
        "OK"
    }
}

fn peer_badge(health: PeerCountHealth) -> &'static str {
    match health {
        PeerCountHealth::Healthy => "OK",
        PeerCountHealth::Warning => "WARN",
        PeerCountHealth::Critical => "CRIT",
    }
}

fn peer_summary(peers: &PeerAnalytics) -> String {
    let avg = &peers.averages;
    format!(
        "{} peers, ping {}, recv {}, sent {}, offset {}",
        peers.count,
        format_ping(avg.minping),
        avg.bytesrecv.map(format_bytes).unwrap_or_else(|| "N/A".to_string()),
        avg.bytessent.map(format_bytes).unwrap_or_else(|| "N/A".to_string()),
        format_time_offset(avg.timeoffset),
    )
}

fn timestamp(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| secs.to_string())
}

pub fn health_table(view: &NodeView, report: &HealthReport, status: &ConnectionStatus, now: i64) -> Table {
    let chain = &view.blockchain_info_response;
    let block = &view.block;

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Check", "Status", "Details"]);

    let link = match (status.is_transport_open, status.is_application_layer_up) {
        (true, true) => "UP",
        (true, false) => "NO RPC",
        (false, _) if status.is_retrying => "RETRYING",
        (false, _) => "DOWN",
    };
    table.add_row(vec![
        "Connection".to_string(),
        link.to_string(),
        status.last_error.clone().unwrap_or_default(),
    ]);

    table.add_row(vec![
        "Outbound peers".to_string(),
        flag(report.low_outbound_peers).to_string(),
        format!(
            "{} (min {}), {} inbound",
            report.outbound_count, report.min_outbound_peers, view.general_stats.inbound_count
        ),
    ]);
    for (label, peers) in [("Inbound list", &report.inbound_peers), ("Outbound list", &report.outbound_peers)] {
        table.add_row(vec![
            label.to_string(),
            peer_badge(peers.health).to_string(),
            peer_summary(peers),
        ]);
    }
    table.add_row(vec![
        "Last block".to_string(),
        flag(report.block_too_old).to_string(),
        format!(
            "{} ({} ago, {} txs)",
            timestamp(block.time),
            format_duration_secs(now.saturating_sub(block.time)),
            block.n_tx
        ),
    ]);
    table.add_row(vec![
        "Headers".to_string(),
        flag(report.syncing).to_string(),
        format!("{} / {} ({} behind)", chain.blocks, chain.headers, report.header_block_diff),
    ]);
    table.add_row(vec![
        "Verification".to_string(),
        flag(report.not_fully_synced).to_string(),
        format!("{:.4}%", chain.verificationprogress * 100.0),
    ]);
    table.add_row(vec![
        "Node".to_string(),
        String::new(),
        format!("{} on {}, up {}", view.node_info.subversion, chain.chain, view.up_time),
    ]);
    table.add_row(vec![
        "Verdict".to_string(),
        severity_label(report.severity).to_string(),
        report.sync_warning.clone().unwrap_or_default(),
    ]);

    table
}
