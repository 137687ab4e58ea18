// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use std::net::SocketAddr;
use std::time::Duration;

use nodepulse_core::backoff::Backoff;
use nodepulse_core::endpoint;
use nodepulse_core::error::EndpointError;

pub const ENV_URL: &str = "NODEPULSE_URL";
pub const ENV_BIND: &str = "NODEPULSE_BIND";
pub const ENV_IDLE_TIMEOUT_SECS: &str = "NODEPULSE_IDLE_TIMEOUT_SECS";
pub const ENV_CONFIG_TIMEOUT_SECS: &str = "NODEPULSE_CONFIG_TIMEOUT_SECS";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Origin of the dashboard backend. The push and config endpoints are
    /// derived from it.
    pub dashboard_url: String,
    /// Where the read-only presentation API listens.
    pub bind_addr: SocketAddr,
    pub backoff: Backoff,
    /// Upper bound on the start-up config fetch.
    pub config_timeout: Duration,
    /// Treat the transport as closed after this long without a frame.
    pub idle_timeout: Option<Duration>,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            dashboard_url: "http://127.0.0.1:8080".to_string(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3030)),
            backoff: Backoff::default(),
            config_timeout: Duration::from_secs(5),
            idle_timeout: None,
        }
    }
}

impl NodeConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` yields. Unparsable values
    /// are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(url) = lookup(ENV_URL) {
            cfg.dashboard_url = url;
        }
        if let Some(raw) = lookup(ENV_BIND) {
            match raw.parse() {
                Ok(addr) => cfg.bind_addr = addr,
                Err(e) => tracing::warn!("Ignoring {}={:?}: {}", ENV_BIND, raw, e),
            }
        }
        if let Some(secs) = parse_secs(&lookup, ENV_IDLE_TIMEOUT_SECS) {
            cfg.idle_timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        if let Some(secs) = parse_secs(&lookup, ENV_CONFIG_TIMEOUT_SECS) {
            cfg.config_timeout = Duration::from_secs(secs);
        }

        cfg
    }

    pub fn ws_url(&self) -> Result<String, EndpointError> {
        endpoint::websocket_url(&self.dashboard_url)
    }

    pub fn config_url(&self) -> Result<String, EndpointError> {
        endpoint::config_url(&self.dashboard_url)
    }
}

fn parse_secs<F>(lookup: &F, key: &str) -> Option<u64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(secs) => Some(secs),
        Err(e) => {
            tracing::warn!("Ignoring {}={:?}: {}", key, raw, e);
            None
        }
    }
}
