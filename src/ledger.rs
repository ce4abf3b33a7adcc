// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Per-identity abuse state: rate-limit counters, blacklisted-attempt
//! counts, and the ban flag.
//!
//! The ledger is the only collaborator the pipeline consults about an
//! identity. Once `banned` is set it is never cleared by normal
//! operation, and records are never deleted; unbounded growth over
//! distinct identities is accepted.

use crate::config::{ModerationConfig, RateLimitConfig};
use crate::error::Result;
use crate::limiter::{RateDecision, RateLimiter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use tracing::info;

/// Outcome of recording a blacklisted attempt.
#[derive(Debug, Clone, Copy)]
pub struct NaughtyVerdict {
    /// Total blacklisted attempts from this identity
    pub naughty_count: u32,
    /// True once the attempt count has reached the ban threshold
    pub banned: bool,
}

/// Abuse bookkeeping contract.
///
/// `record_naughty_attempt` must be atomic per identity: the increment
/// and the threshold comparison are one logical step, so two concurrent
/// borderline attempts cannot both report `banned = false`.
#[async_trait]
pub trait AbuseLedger: Send + Sync {
    async fn is_banned(&self, identity: &str) -> Result<bool>;

    async fn record_naughty_attempt(&self, identity: &str) -> Result<NaughtyVerdict>;

    async fn check_rate_limit(&self, identity: &str, now: DateTime<Utc>) -> Result<RateDecision>;
}

#[derive(Debug, Default)]
struct NaughtyState {
    count: u32,
    banned: bool,
}

/// In-memory ledger backing the file-based deployment and tests.
pub struct MemoryLedger {
    naughty_limit: u32,
    limiter: RateLimiter,
    records: RwLock<HashMap<String, NaughtyState>>,
}

impl MemoryLedger {
    pub fn new(moderation: &ModerationConfig, rate: &RateLimitConfig) -> Self {
        Self {
            naughty_limit: moderation.naughty_limit,
            limiter: RateLimiter::new(rate),
            records: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl AbuseLedger for MemoryLedger {
    async fn is_banned(&self, identity: &str) -> Result<bool> {
        let records = self.records.read().await;
        Ok(records.get(identity).map(|s| s.banned).unwrap_or(false))
    }

    async fn record_naughty_attempt(&self, identity: &str) -> Result<NaughtyVerdict> {
        let mut records = self.records.write().await;
        let state = records.entry(identity.to_string()).or_default();
        state.count += 1;
        if state.count >= self.naughty_limit && !state.banned {
            state.banned = true;
            info!(identity, naughty_count = state.count, "identity banned");
        }
        Ok(NaughtyVerdict {
            naughty_count: state.count,
            banned: state.banned,
        })
    }

    async fn check_rate_limit(&self, identity: &str, now: DateTime<Utc>) -> Result<RateDecision> {
        Ok(self.limiter.check(identity, now).await)
    }
}
