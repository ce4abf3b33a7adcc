// SPDX-FileCopyrightText: 2026 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Time gate for the public wall.
//!
//! The wall unlocks at local midnight of [`UNLOCK_DATE`] in the
//! Europe/Amsterdam timezone, regardless of the caller's own timezone.
//! Comparison is by Amsterdam calendar date, not absolute instant.
//!
//! The Amsterdam offset is derived from the EU daylight-saving rule
//! (CET/CEST, transitions at 01:00 UTC on the last Sundays of March and
//! October) instead of a bundled tz database. The unlock instant is
//! found by searching candidate UTC offsets in 30-minute steps and
//! falling back to UTC+1, the Amsterdam offset in February.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc, Weekday};

pub const AMSTERDAM_TZ: &str = "Europe/Amsterdam";

/// Unlock calendar date, YYYY-MM-DD in Amsterdam time.
pub const UNLOCK_DATE: &str = "2026-02-14";

const UNLOCK_YMD: (i32, u32, u32) = (2026, 2, 14);

fn unlock_date() -> NaiveDate {
    let (y, m, d) = UNLOCK_YMD;
    NaiveDate::from_ymd_opt(y, m, d).expect("unlock date is a valid calendar date")
}

/// 01:00 UTC on the last Sunday of a 31-day month.
fn last_sunday_utc(year: i32, month: u32) -> Option<DateTime<Utc>> {
    let last = NaiveDate::from_ymd_opt(year, month, 31)?;
    let back = last.weekday().num_days_from_sunday() as i64;
    let sunday = last - Duration::days(back);
    debug_assert_eq!(sunday.weekday(), Weekday::Sun);
    Some(Utc.from_utc_datetime(&sunday.and_hms_opt(1, 0, 0)?))
}

/// UTC offset of Europe/Amsterdam at the given instant, in seconds.
/// CEST (+02:00) between the EU transition instants, CET (+01:00)
/// otherwise.
fn amsterdam_offset_secs(at: DateTime<Utc>) -> i64 {
    match (last_sunday_utc(at.year(), 3), last_sunday_utc(at.year(), 10)) {
        (Some(dst_start), Some(dst_end)) if at >= dst_start && at < dst_end => 7200,
        _ => 3600,
    }
}

/// Wall-clock date and time in Amsterdam for the given instant.
fn amsterdam_local(at: DateTime<Utc>) -> NaiveDateTime {
    at.naive_utc() + Duration::seconds(amsterdam_offset_secs(at))
}

/// True iff the Amsterdam calendar date of `now` is on or after the
/// unlock date. The wall therefore opens at Amsterdam midnight.
pub fn is_unlocked(now: DateTime<Utc>) -> bool {
    amsterdam_local(now).date() >= unlock_date()
}

/// The absolute instant of 00:00:00 Amsterdam time on the unlock date.
///
/// Searches candidate UTC offsets (30-minute steps, -12h to +14h) for
/// one whose Amsterdam wall clock reads exactly midnight. If none
/// matches, falls back to UTC+1.
pub fn unlock_instant() -> DateTime<Utc> {
    let midnight = unlock_date()
        .and_hms_opt(0, 0, 0)
        .expect("midnight is a valid time");
    let utc_base = Utc.from_utc_datetime(&midnight);

    for half_hours in -24i64..=28 {
        let candidate = utc_base - Duration::minutes(half_hours * 30);
        if amsterdam_local(candidate) == midnight {
            return candidate;
        }
    }

    // Mid-February Amsterdam is CET
    utc_base - Duration::hours(1)
}
