// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Error types.

use thiserror::Error;

/// Reasons an inbound frame is discarded before classification.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The frame is not valid JSON.
    #[error("Malformed frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EndpointError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("Unsupported scheme: {0}")]
    UnsupportedScheme(String),
}

pub type FrameResult<T> = core::result::Result<T, FrameError>;
