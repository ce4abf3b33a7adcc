// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Card Wall service
//!
//! Collects short cards from visitors and serves them on a time-locked
//! public wall. Submissions pass through ban, rate-limit, validation,
//! and content-moderation gates before anything is persisted.
//!
//! ## Configuration
//!
//! Environment variables:
//!
//! - `BIND_ADDR`: server bind address (default: 0.0.0.0:8080)
//! - `DATABASE_URL` / `POSTGRES_URL`: Postgres connection string;
//!   presence selects the durable backend over the JSON-file fallback
//! - `DATA_DIR`: directory for the file-backed store (default: ./data)
//! - `PREVIEW_TOKEN`: shared secret for the pre-launch preview route;
//!   unset disables the route entirely
//! - `MAX_SUBMISSIONS_PER_HOUR`: rate limit per identity (default: 5)
//! - `NAUGHTY_LIMIT`: blacklisted attempts before a ban (default: 3)

use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use card_wall::{
    config::Config,
    handlers::{health, list_cards, preview_cards, submit_card, AppState},
    ledger::{AbuseLedger, MemoryLedger},
    pipeline::Pipeline,
    store::{CardStore, JsonFileStore, PgStore},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().json())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let config = Config::from_env();
    let backend = if config.database_url.is_some() { "postgres" } else { "file" };
    info!(
        bind_addr = %config.bind_addr,
        backend,
        preview_enabled = config.preview_token.is_some(),
        max_submissions = config.rate_limit.max_submissions,
        naughty_limit = config.moderation.naughty_limit,
        "Starting card wall"
    );

    let (cards, ledger) = select_backend(&config).await?;
    let state = Arc::new(AppState {
        pipeline: Pipeline::new(ledger, cards),
        config: config.clone(),
    });

    let app = Router::new()
        .route("/health", get(health))
        .route("/api/cards", get(list_cards).post(submit_card))
        .route("/api/preview/cards", get(preview_cards))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = config.bind_addr.parse()?;
    let listener = TcpListener::bind(addr).await?;
    info!(addr = %addr, "Server listening");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Pick the persistence backend once at startup. A configured database
/// URL selects Postgres for cards and naughty/ban state; otherwise
/// cards go to a JSON file and abuse state stays in memory.
async fn select_backend(
    config: &Config,
) -> anyhow::Result<(Arc<dyn CardStore>, Arc<dyn AbuseLedger>)> {
    match &config.database_url {
        Some(url) => {
            let store = Arc::new(
                PgStore::connect(url, &config.moderation, &config.rate_limit).await?,
            );
            Ok((store.clone() as Arc<dyn CardStore>, store as Arc<dyn AbuseLedger>))
        }
        None => Ok((
            Arc::new(JsonFileStore::new(&config.data_dir)) as Arc<dyn CardStore>,
            Arc::new(MemoryLedger::new(&config.moderation, &config.rate_limit))
                as Arc<dyn AbuseLedger>,
        )),
    }
}
