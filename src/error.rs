// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Error types for the card wall service.
//!
//! Policy rejections (banned, rate limited, blacklisted content, missing
//! fields) are NOT errors: the pipeline returns them as ordinary outcome
//! values. Only infrastructure faults travel this channel, and the
//! handler layer collapses them into a generic 500 body so no internal
//! detail leaks to callers.

use thiserror::Error;

/// Infrastructure failure while persisting or loading state.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("storage error: {0}")]
    Storage(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;
