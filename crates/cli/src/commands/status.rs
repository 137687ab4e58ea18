// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::time::Duration;

use nodepulse_core::health::{unix_now, Severity};

use crate::render;

/// One-shot check. `Ok(true)` when a snapshot arrived and the node is in
/// sync; low outbound peers alone do not fail the check.
pub async fn run(url: &str, timeout_secs: u64) -> anyhow::Result<bool> {
    let store = super::open_store(url)?;
    store.initialize().await;

    let mut versions = store.subscribe();
    let arrived = matches!(
        tokio::time::timeout(Duration::from_secs(timeout_secs), versions.wait_for(|v| *v > 0)).await,
        Ok(Ok(_))
    );

    let status = store.status();
    store.disconnect();

    if !arrived {
        println!("No snapshot from {} within {}s", store.endpoint(), timeout_secs);
        if let Some(err) = &status.last_error {
            println!("Last error: {}", err);
        }
        return Ok(false);
    }

    let view = store.view();
    let report = store.health_report();
    println!("\nNodePulse Status Report");
    println!("-----------------------");
    println!("{}", render::health_table(&view, &report, &status, unix_now()));

    Ok(report.severity != Severity::Critical)
}
