// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Abuse-control tests: rate limiting, content moderation, and
//! repeat-offender banning through the full pipeline.

use card_wall::config::{ModerationConfig, RateLimitConfig};
use card_wall::ledger::MemoryLedger;
use card_wall::models::CardSubmission;
use card_wall::pipeline::{Pipeline, SubmitOutcome};
use card_wall::store::JsonFileStore;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;
use tempfile::TempDir;

fn test_pipeline() -> (Pipeline, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = Arc::new(JsonFileStore::new(dir.path()));
    let ledger = Arc::new(MemoryLedger::new(
        &ModerationConfig::default(),
        &RateLimitConfig::default(),
    ));
    (Pipeline::new(ledger, store), dir)
}

fn clean(message: &str) -> CardSubmission {
    CardSubmission {
        from_name: "Alex".to_string(),
        to_name: "Sam".to_string(),
        message: message.to_string(),
        anonymous: false,
    }
}

fn naughty(message: &str) -> CardSubmission {
    CardSubmission {
        from_name: String::new(),
        to_name: "Sam".to_string(),
        message: message.to_string(),
        anonymous: false,
    }
}

fn at(secs: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 2, 1, 12, 0, 0).unwrap() + Duration::seconds(secs)
}

#[tokio::test]
async fn sixth_submission_in_the_window_is_rate_limited() {
    let (pipeline, _dir) = test_pipeline();
    let identity = "198.51.100.1";

    for i in 0..5 {
        let outcome = pipeline
            .submit(clean("hi"), identity, at(i))
            .await
            .unwrap();
        assert!(
            matches!(outcome, SubmitOutcome::Accepted { .. }),
            "submission {} should be accepted",
            i + 1
        );
    }

    match pipeline.submit(clean("hi"), identity, at(5)).await.unwrap() {
        SubmitOutcome::RateLimited { reset_at } => {
            // Oldest attempt + window
            assert_eq!(reset_at, at(0) + Duration::seconds(3600));
        }
        other => panic!("expected rate limit, got {other:?}"),
    }
}

#[tokio::test]
async fn rate_limit_clears_when_the_window_slides() {
    let (pipeline, _dir) = test_pipeline();
    let identity = "198.51.100.2";

    for i in 0..5 {
        pipeline.submit(clean("hi"), identity, at(i)).await.unwrap();
    }
    assert!(matches!(
        pipeline.submit(clean("hi"), identity, at(6)).await.unwrap(),
        SubmitOutcome::RateLimited { .. }
    ));

    let later = pipeline
        .submit(clean("hi"), identity, at(3601))
        .await
        .unwrap();
    assert!(matches!(later, SubmitOutcome::Accepted { .. }));
}

#[tokio::test]
async fn content_rejections_consume_rate_slots() {
    let (pipeline, _dir) = test_pipeline();
    let identity = "198.51.100.3";

    // Two blacklisted attempts burn two of the five slots
    for i in 0..2 {
        let outcome = pipeline
            .submit(naughty("n1gg3r"), identity, at(i))
            .await
            .unwrap();
        assert!(matches!(outcome, SubmitOutcome::ContentRejected { .. }));
    }
    for i in 2..5 {
        let outcome = pipeline.submit(clean("hi"), identity, at(i)).await.unwrap();
        assert!(matches!(outcome, SubmitOutcome::Accepted { .. }));
    }

    assert!(matches!(
        pipeline.submit(clean("hi"), identity, at(5)).await.unwrap(),
        SubmitOutcome::RateLimited { .. }
    ));
}

#[tokio::test]
async fn three_blacklisted_attempts_ban_the_identity() {
    let (pipeline, _dir) = test_pipeline();
    let identity = "198.51.100.4";

    // Each evasion variant lands on the same blacklist entry
    let variants = ["n1gg3r", "n i g g e r", "N\u{200B}I\u{200B}G\u{200B}G\u{200B}E\u{200B}R"];

    let first = pipeline
        .submit(naughty(variants[0]), identity, at(0))
        .await
        .unwrap();
    assert!(matches!(
        first,
        SubmitOutcome::ContentRejected { naughty_count: 1 }
    ));

    let second = pipeline
        .submit(naughty(variants[1]), identity, at(1))
        .await
        .unwrap();
    assert!(matches!(
        second,
        SubmitOutcome::ContentRejected { naughty_count: 2 }
    ));

    let third = pipeline
        .submit(naughty(variants[2]), identity, at(2))
        .await
        .unwrap();
    assert!(matches!(
        third,
        SubmitOutcome::BannedJustNow { naughty_count: 3 }
    ));

    // Clean content no longer helps; the ban gate fires first
    let after = pipeline.submit(clean("hi"), identity, at(3)).await.unwrap();
    assert!(matches!(after, SubmitOutcome::Banned));
}

#[tokio::test]
async fn ban_outlives_the_rate_window() {
    let (pipeline, _dir) = test_pipeline();
    let identity = "198.51.100.5";

    for i in 0..3 {
        pipeline
            .submit(naughty("kys"), identity, at(i))
            .await
            .unwrap();
    }

    // Hours later, with a fresh rate window, still banned
    let much_later = pipeline
        .submit(clean("hi"), identity, at(7200))
        .await
        .unwrap();
    assert!(matches!(much_later, SubmitOutcome::Banned));
}

#[tokio::test]
async fn identities_are_scoped_independently() {
    let (pipeline, _dir) = test_pipeline();

    for i in 0..3 {
        pipeline
            .submit(naughty("f4gg0t"), "198.51.100.6", at(i))
            .await
            .unwrap();
    }
    assert!(matches!(
        pipeline
            .submit(clean("hi"), "198.51.100.6", at(3))
            .await
            .unwrap(),
        SubmitOutcome::Banned
    ));

    // A different identity is untouched by the ban
    let other = pipeline
        .submit(clean("hi"), "198.51.100.7", at(3))
        .await
        .unwrap();
    assert!(matches!(other, SubmitOutcome::Accepted { .. }));
}

#[tokio::test]
async fn blacklisted_recipient_or_sender_also_counts() {
    let (pipeline, _dir) = test_pipeline();

    let outcome = pipeline
        .submit(
            CardSubmission {
                from_name: "f@g".to_string(),
                to_name: "Sam".to_string(),
                message: "happy valentine's day".to_string(),
                anonymous: false,
            },
            "198.51.100.8",
            at(0),
        )
        .await
        .unwrap();
    assert!(matches!(outcome, SubmitOutcome::ContentRejected { .. }));
}
