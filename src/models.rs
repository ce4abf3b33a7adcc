// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Domain models for the card wall.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single accepted card. Immutable once persisted; the wall never
/// edits or deletes cards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: Uuid,
    pub from_name: String,
    pub to_name: String,
    pub message: String,
    /// When true the display layer substitutes a placeholder for
    /// `from_name`
    pub anonymous: bool,
    pub created_at: DateTime<Utc>,
}

/// An incoming submission before any gating has run.
///
/// Absent or non-string fields are already coerced to empty strings by
/// the transport adapter, matching the lenient body handling of the
/// public form.
#[derive(Debug, Clone, Default)]
pub struct CardSubmission {
    pub from_name: String,
    pub to_name: String,
    pub message: String,
    pub anonymous: bool,
}
