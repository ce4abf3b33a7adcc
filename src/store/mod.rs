// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Durable card persistence.
//!
//! Two interchangeable backends behind one contract, selected once at
//! startup by configuration: a JSON-file store (the fallback) and a
//! Postgres store (selected when a database URL is configured). Reads
//! always return every card, newest first, and survive restarts.

use crate::error::Result;
use crate::models::Card;
use async_trait::async_trait;

pub mod file;
pub mod postgres;

pub use file::JsonFileStore;
pub use postgres::PgStore;

/// Append-only card persistence contract.
///
/// A card is persisted fully or not at all; no partial record may become
/// visible to later reads.
#[async_trait]
pub trait CardStore: Send + Sync {
    async fn add_card(&self, card: Card) -> Result<()>;

    /// All persisted cards, newest first.
    async fn list_cards(&self) -> Result<Vec<Card>>;
}
