// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use nodepulse_core::error::EndpointError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Config fetch failed: {0}")]
    Config(String),
    #[error("Endpoint error: {0}")]
    Endpoint(#[from] EndpointError),
    #[error("Unknown state section: {0}")]
    UnknownSection(String),
}

impl IntoResponse for SyncError {
    fn into_response(self) -> Response {
        let status = match &self {
            SyncError::Transport(_) | SyncError::Config(_) => StatusCode::BAD_GATEWAY,
            SyncError::Endpoint(_) => StatusCode::BAD_REQUEST,
            SyncError::UnknownSection(_) => StatusCode::NOT_FOUND,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}
