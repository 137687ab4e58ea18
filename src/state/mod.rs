// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Canonical dashboard state.

pub mod canonical;

pub use canonical::CanonicalState;
