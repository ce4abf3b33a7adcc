// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! The submission-gating pipeline.
//!
//! Every submission passes through a strictly ordered sequence of
//! gates, short-circuiting on the first failure:
//!
//! 1. Ban gate (no counters touched for banned identities)
//! 2. Rate gate (an allowed check records the attempt, so a later
//!    content rejection still consumes a rate slot)
//! 3. Field validation (message required; recipient required)
//! 4. Content moderation (blacklisted attempts bump the naughty
//!    counter and may cross the ban threshold)
//! 5. Accept: trim names, truncate the message, persist
//!
//! Abuse bookkeeping deliberately precedes content checks, and the
//! read-time lock never blocks writes: cards accumulate while the wall
//! is still closed.
//!
//! Policy rejections are ordinary outcome values; only infrastructure
//! faults surface as errors.

use crate::error::Result;
use crate::ledger::AbuseLedger;
use crate::models::{Card, CardSubmission};
use crate::store::CardStore;
use crate::unlock;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Messages longer than this are truncated at acceptance time
/// (character count, not grapheme-aware).
pub const MESSAGE_MAX_CHARS: usize = 1000;

/// Which required field was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    Message,
    Recipient,
}

/// Decision for one submission.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Card persisted; carries the remaining rate budget for headers
    Accepted {
        card: Card,
        remaining: u32,
        reset_at: DateTime<Utc>,
    },
    /// Identity was already banned; nothing was checked or counted
    Banned,
    /// This blacklisted attempt crossed the ban threshold
    BannedJustNow { naughty_count: u32 },
    /// Blacklisted content, identity not (yet) banned
    ContentRejected { naughty_count: u32 },
    /// Too many submissions in the trailing window
    RateLimited { reset_at: DateTime<Utc> },
    /// A required field was absent or empty
    InvalidInput { field: MissingField },
}

/// Decision for one public read.
#[derive(Debug)]
pub enum ReadOutcome {
    /// The wall is still time-locked
    Locked { unlock_at_utc: DateTime<Utc> },
    /// All persisted cards, newest first
    Visible { cards: Vec<Card> },
}

/// Orchestrates the abuse ledger, blacklist, time gate, and card store.
pub struct Pipeline {
    ledger: Arc<dyn AbuseLedger>,
    cards: Arc<dyn CardStore>,
}

impl Pipeline {
    pub fn new(ledger: Arc<dyn AbuseLedger>, cards: Arc<dyn CardStore>) -> Self {
        Self { ledger, cards }
    }

    /// Run one submission through the gates.
    pub async fn submit(
        &self,
        submission: CardSubmission,
        identity: &str,
        now: DateTime<Utc>,
    ) -> Result<SubmitOutcome> {
        if self.ledger.is_banned(identity).await? {
            debug!(identity, "submission from banned identity");
            return Ok(SubmitOutcome::Banned);
        }

        let rate = self.ledger.check_rate_limit(identity, now).await?;
        if !rate.allowed {
            debug!(identity, reset_at = %rate.reset_at, "submission rate limited");
            return Ok(SubmitOutcome::RateLimited {
                reset_at: rate.reset_at,
            });
        }

        if submission.message.is_empty() {
            return Ok(SubmitOutcome::InvalidInput {
                field: MissingField::Message,
            });
        }
        if submission.to_name.trim().is_empty() {
            return Ok(SubmitOutcome::InvalidInput {
                field: MissingField::Recipient,
            });
        }

        if crate::blacklist::is_card_content_blacklisted(
            &submission.message,
            &submission.from_name,
            &submission.to_name,
        ) {
            let verdict = self.ledger.record_naughty_attempt(identity).await?;
            warn!(
                identity,
                naughty_count = verdict.naughty_count,
                banned = verdict.banned,
                "blacklisted submission rejected"
            );
            return Ok(if verdict.banned {
                SubmitOutcome::BannedJustNow {
                    naughty_count: verdict.naughty_count,
                }
            } else {
                SubmitOutcome::ContentRejected {
                    naughty_count: verdict.naughty_count,
                }
            });
        }

        let card = Card {
            id: Uuid::new_v4(),
            from_name: submission.from_name.trim().to_string(),
            to_name: submission.to_name.trim().to_string(),
            message: truncate_chars(&submission.message, MESSAGE_MAX_CHARS),
            anonymous: submission.anonymous,
            created_at: now,
        };
        self.cards.add_card(card.clone()).await?;
        info!(card_id = %card.id, identity, "card accepted");

        Ok(SubmitOutcome::Accepted {
            card,
            remaining: rate.remaining,
            reset_at: rate.reset_at,
        })
    }

    /// Public read path: locked until the unlock instant, all cards
    /// afterwards.
    pub async fn list_visible(&self, now: DateTime<Utc>) -> Result<ReadOutcome> {
        if !unlock::is_unlocked(now) {
            return Ok(ReadOutcome::Locked {
                unlock_at_utc: unlock::unlock_instant(),
            });
        }
        let cards = self.cards.list_cards().await?;
        Ok(ReadOutcome::Visible { cards })
    }

    /// Privileged read path: bypasses the time gate entirely. Token
    /// checking is the transport adapter's job.
    pub async fn preview(&self) -> Result<Vec<Card>> {
        self.cards.list_cards().await
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
