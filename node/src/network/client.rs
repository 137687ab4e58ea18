// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use crate::errors::SyncError;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Settings the dashboard backend hands to its clients.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardConfig {
    /// 0 means "not configured".
    #[serde(default, alias = "minOutboundPeersThreshold")]
    pub min_outbound_peers: u32,
    #[serde(default, rename = "disableMempoolInfo", alias = "disableMempoolDisplay", alias = "disableMempool")]
    pub disable_mempool_display: bool,
}

#[derive(Debug, Clone)]
pub struct ConfigClient {
    url: String,
    client: Client,
}

impl ConfigClient {
    pub fn new(url: String) -> Self {
        Self {
            url,
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<DashboardConfig, SyncError> {
        let resp = self.client.get(&self.url).send().await
            .map_err(|e| SyncError::Config(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SyncError::Config(format!("Config request failed: {}", resp.status())));
        }

        resp.json().await.map_err(|e| SyncError::Config(e.to_string()))
    }
}
