// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
pub mod config;
pub mod errors;
pub mod connection;
pub mod network;
pub mod store;
pub mod server;
pub mod telemetry;
