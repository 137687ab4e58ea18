// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use nodepulse_core::health::unix_now;

use crate::render;

/// Re-print the health table after every merge until Ctrl-C.
pub async fn run(url: &str) -> anyhow::Result<()> {
    let store = super::open_store(url)?;
    store.initialize().await;
    println!("Watching {} (Ctrl-C to stop)", store.endpoint());

    let mut versions = store.subscribe();
    loop {
        tokio::select! {
            changed = versions.changed() => {
                if changed.is_err() {
                    break;
                }
                let version = *versions.borrow_and_update();
                let view = store.view();
                let report = store.health_report();
                println!("\nSnapshot #{}", version);
                println!("{}", render::health_table(&view, &report, &store.status(), unix_now()));
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    store.disconnect();
    Ok(())
}
