// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Bounded exponential backoff.
//!
//! `delay(n) = min(base * multiplier^n, max)`. The delay is bounded, the
//! number of attempts is not.

use core::time::Duration;

use crate::config::{BACKOFF_BASE_MS, BACKOFF_MAX_MS, BACKOFF_MULTIPLIER};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub multiplier: u32,
    pub max: Duration,
}

impl Backoff {
    pub fn new(base: Duration, multiplier: u32, max: Duration) -> Self {
        Self { base, multiplier, max }
    }

    /// Delay before retry number `attempt` (0-indexed).
    pub fn delay(&self, attempt: u32) -> Duration {
        let base_ms = self.base.as_millis() as u64;
        let max_ms = self.max.as_millis() as u64;
        let factor = (self.multiplier as u64).checked_pow(attempt).unwrap_or(u64::MAX);
        let ms = base_ms.saturating_mul(factor).min(max_ms);
        Duration::from_millis(ms)
    }
}

impl Default for Backoff {
    fn default() -> Self {
        Self {
            base: Duration::from_millis(BACKOFF_BASE_MS),
            multiplier: BACKOFF_MULTIPLIER,
            max: Duration::from_millis(BACKOFF_MAX_MS),
        }
    }
}
