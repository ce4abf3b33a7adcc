// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Postgres-backed card store and abuse ledger.
//!
//! Selected when a database URL is configured. Cards are read back
//! ordered by `created_at` descending. Naughty-count increments and the
//! ban-threshold comparison happen inside a single atomic
//! upsert-and-return statement, never as read-then-write from the
//! application tier.
//!
//! The sliding-window rate limiter stays process-local even with a
//! database configured; distributed rate limiting is out of scope.

use crate::config::{ModerationConfig, RateLimitConfig};
use crate::error::Result;
use crate::ledger::{AbuseLedger, NaughtyVerdict};
use crate::limiter::{RateDecision, RateLimiter};
use crate::models::Card;
use crate::store::CardStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::info;

pub struct PgStore {
    pool: PgPool,
    naughty_limit: u32,
    limiter: RateLimiter,
}

impl PgStore {
    /// Connect and make sure the schema exists.
    pub async fn connect(
        url: &str,
        moderation: &ModerationConfig,
        rate: &RateLimitConfig,
    ) -> Result<Self> {
        let pool = PgPoolOptions::new().max_connections(5).connect(url).await?;
        let store = Self {
            pool,
            naughty_limit: moderation.naughty_limit,
            limiter: RateLimiter::new(rate),
        };
        store.init_schema().await?;
        info!("connected to postgres card store");
        Ok(store)
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS cards (
                id UUID PRIMARY KEY,
                from_name TEXT NOT NULL,
                to_name TEXT NOT NULL,
                message TEXT NOT NULL,
                anonymous BOOLEAN NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS banned_ips (
                ip TEXT PRIMARY KEY,
                naughty_count INT NOT NULL DEFAULT 0,
                banned BOOLEAN NOT NULL DEFAULT FALSE,
                updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
            )",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CardStore for PgStore {
    async fn add_card(&self, card: Card) -> Result<()> {
        sqlx::query(
            "INSERT INTO cards (id, from_name, to_name, message, anonymous, created_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(card.id)
        .bind(&card.from_name)
        .bind(&card.to_name)
        .bind(&card.message)
        .bind(card.anonymous)
        .bind(card.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_cards(&self) -> Result<Vec<Card>> {
        let rows = sqlx::query(
            "SELECT id, from_name, to_name, message, anonymous, created_at
             FROM cards ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Card {
                id: row.get("id"),
                from_name: row.get("from_name"),
                to_name: row.get("to_name"),
                message: row.get("message"),
                anonymous: row.get("anonymous"),
                created_at: row.get("created_at"),
            })
            .collect())
    }
}

#[async_trait]
impl AbuseLedger for PgStore {
    async fn is_banned(&self, identity: &str) -> Result<bool> {
        let row = sqlx::query("SELECT 1 FROM banned_ips WHERE ip = $1 AND banned = TRUE LIMIT 1")
            .bind(identity)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn record_naughty_attempt(&self, identity: &str) -> Result<NaughtyVerdict> {
        let row = sqlx::query(
            "INSERT INTO banned_ips (ip, naughty_count, banned)
             VALUES ($1, 1, FALSE)
             ON CONFLICT (ip) DO UPDATE SET
                 naughty_count = banned_ips.naughty_count + 1,
                 banned = (banned_ips.naughty_count + 1 >= $2),
                 updated_at = now()
             RETURNING naughty_count, banned",
        )
        .bind(identity)
        .bind(self.naughty_limit as i32)
        .fetch_one(&self.pool)
        .await?;

        Ok(NaughtyVerdict {
            naughty_count: row.get::<i32, _>("naughty_count") as u32,
            banned: row.get("banned"),
        })
    }

    async fn check_rate_limit(&self, identity: &str, now: DateTime<Utc>) -> Result<RateDecision> {
        Ok(self.limiter.check(identity, now).await)
    }
}
