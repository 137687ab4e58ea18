// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.

//! nodepulse-core: wire model, deep merge and health derivation for a
//! Bitcoin node dashboard. No I/O lives here.

pub mod backoff;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod format;
pub mod health;
pub mod merge;
pub mod message;
pub mod state;
pub mod types;

#[cfg(test)]
pub mod tests;
