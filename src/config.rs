// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Configuration for the card wall service.
//!
//! All options are environment-provided. `DATABASE_URL` (or
//! `POSTGRES_URL`) selects the Postgres backend over the JSON-file
//! fallback; `PREVIEW_TOKEN` enables the pre-launch preview route.

use serde::{Deserialize, Serialize};

/// Service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server bind address (default: 0.0.0.0:8080)
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory holding cards.json for the file-backed store
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    /// Postgres connection string; presence selects the durable backend
    #[serde(default)]
    pub database_url: Option<String>,

    /// Shared secret for the preview route; absence disables it
    #[serde(default)]
    pub preview_token: Option<String>,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Content moderation configuration
    #[serde(default)]
    pub moderation: ModerationConfig,
}

/// Sliding-window rate limit per client identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum submissions per window (default: 5)
    #[serde(default = "default_max_submissions")]
    pub max_submissions: u32,

    /// Trailing window length in seconds (default: 3600)
    #[serde(default = "default_window_secs")]
    pub window_secs: i64,
}

/// Repeat-offender banning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModerationConfig {
    /// Blacklisted attempts before an identity is banned (default: 3)
    #[serde(default = "default_naughty_limit")]
    pub naughty_limit: u32,
}

// Default value functions
fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_data_dir() -> String {
    "./data".to_string()
}

fn default_max_submissions() -> u32 {
    5
}

fn default_window_secs() -> i64 {
    3600
}

fn default_naughty_limit() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_dir: default_data_dir(),
            database_url: None,
            preview_token: None,
            rate_limit: RateLimitConfig::default(),
            moderation: ModerationConfig::default(),
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_submissions: default_max_submissions(),
            window_secs: default_window_secs(),
        }
    }
}

impl Default for ModerationConfig {
    fn default() -> Self {
        Self {
            naughty_limit: default_naughty_limit(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| default_bind_addr()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| default_data_dir()),
            database_url: std::env::var("DATABASE_URL")
                .or_else(|_| std::env::var("POSTGRES_URL"))
                .ok()
                .filter(|v| !v.is_empty()),
            preview_token: std::env::var("PREVIEW_TOKEN").ok().filter(|v| !v.is_empty()),
            rate_limit: RateLimitConfig {
                max_submissions: env_parse("MAX_SUBMISSIONS_PER_HOUR", default_max_submissions()),
                window_secs: env_parse("RATE_WINDOW_SECS", default_window_secs()),
            },
            moderation: ModerationConfig {
                naughty_limit: env_parse("NAUGHTY_LIMIT", default_naughty_limit()),
            },
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(fallback)
}
