// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Sliding-window submission rate limiter.
//!
//! Per identity, at most `max_submissions` attempts are allowed within
//! the trailing window. Timestamps outside the window are compacted
//! lazily during each check; there is no background cleanup task.
//!
//! State is process-local. Under an "unknown" identity shared by many
//! callers, all of them collapse onto one bucket; this is accepted
//! degraded-mode behavior.

use crate::config::RateLimitConfig;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::debug;

/// Result of a rate limit check.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    /// Whether this attempt may proceed
    pub allowed: bool,
    /// Further submissions currently permitted (0 when not allowed)
    pub remaining: u32,
    /// When the oldest in-window attempt falls out of the window
    pub reset_at: DateTime<Utc>,
}

/// Thread-safe sliding-window limiter keyed by client identity.
pub struct RateLimiter {
    max_submissions: u32,
    window: Duration,
    entries: RwLock<HashMap<String, Vec<DateTime<Utc>>>>,
}

impl RateLimiter {
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            max_submissions: config.max_submissions,
            window: Duration::seconds(config.window_secs),
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Check and record an attempt for `identity` at `now`.
    ///
    /// The compact-count-record sequence runs under one write-lock
    /// acquisition; concurrent calls for the same identity cannot
    /// overshoot the limit.
    pub async fn check(&self, identity: &str, now: DateTime<Utc>) -> RateDecision {
        let mut entries = self.entries.write().await;
        let stamps = entries.entry(identity.to_string()).or_default();

        // Lazy compaction: drop attempts that have left the window
        stamps.retain(|t| now - *t < self.window);

        if stamps.len() as u32 >= self.max_submissions {
            let oldest = stamps.iter().min().copied().unwrap_or(now);
            let reset_at = oldest + self.window;
            debug!(identity, %reset_at, "rate limit exceeded");
            return RateDecision {
                allowed: false,
                remaining: 0,
                reset_at,
            };
        }

        stamps.push(now);
        RateDecision {
            allowed: true,
            remaining: self.max_submissions - stamps.len() as u32,
            reset_at: now + self.window,
        }
    }
}
