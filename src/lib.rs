// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Card Wall
//!
//! A small service that collects short "cards" from visitors and shows
//! them on a public wall once a fixed unlock date has passed (Amsterdam
//! time). Every submission runs through an abuse-control pipeline:
//!
//! - Ban gate: identities with repeated blacklisted submissions are
//!   blocked outright
//! - Rate gate: 5 submissions per trailing hour per identity
//! - Field validation: message and recipient are required
//! - Content moderation: normalized substring matching against a fixed
//!   blacklist, catching leetspeak and spacing evasions
//!
//! Reads are time-gated independently of writes: cards accumulate while
//! the wall is still locked, and a token-protected preview route lets
//! operators inspect them before launch.

pub mod blacklist;
pub mod config;
pub mod error;
pub mod handlers;
pub mod ledger;
pub mod limiter;
pub mod models;
pub mod pipeline;
pub mod store;
pub mod unlock;

pub use config::Config;
pub use models::Card;
pub use pipeline::{Pipeline, ReadOutcome, SubmitOutcome};
