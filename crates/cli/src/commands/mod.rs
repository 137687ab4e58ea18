// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod endpoint;
pub mod status;
pub mod watch;

use std::sync::Arc;

use nodepulse_node::config::NodeConfig;
use nodepulse_node::store::{SharedStore, SyncStore};

/// Store pointed at `url` with every other setting at its default.
pub(crate) fn open_store(url: &str) -> anyhow::Result<SharedStore> {
    let cfg = NodeConfig { dashboard_url: url.to_string(), ..Default::default() };
    let store = SyncStore::new(&cfg)?;
    Ok(Arc::new(store))
}
