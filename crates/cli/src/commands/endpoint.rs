// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use nodepulse_core::endpoint::{config_url, websocket_url};

/// WebSocket and config URLs the store would use for `page_url`.
pub fn derive(page_url: &str) -> anyhow::Result<(String, String)> {
    Ok((websocket_url(page_url)?, config_url(page_url)?))
}

pub fn run(page_url: &str) -> anyhow::Result<()> {
    let (ws, config) = derive(page_url)?;
    println!("websocket: {}", ws);
    println!("config:    {}", config);
    Ok(())
}
