// ABOUTME: Date formats agreed with the Vita backend and ISO-week helpers
// ABOUTME: Day keys, zone-less wire timestamps, and component-array parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Date conventions crossing the client/backend boundary.
//!
//! Two formats exist on the wire:
//!
//! - day keys: `yyyy-MM-dd`
//! - full timestamps: `yyyy-MM-dd'T'HH:mm:ss`, no zone suffix, interpreted as
//!   local wall-clock time by convention with the backend
//!
//! Creation times on server records arrive as component arrays
//! `[year, month, day, hour, minute, second]`, possibly truncated.

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, Weekday};

/// Day-key format used in URL path segments (`/aggregates/run/{userId}/{date}`).
const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Zone-less timestamp format used in `HealthDataDTO.timestamp`.
const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Format a date as the backend's `yyyy-MM-dd` day key.
#[must_use]
pub fn day_key(date: NaiveDate) -> String {
    date.format(DAY_KEY_FORMAT).to_string()
}

/// Format a local wall-clock datetime as the backend's zone-less timestamp.
///
/// The server is the sole authority on timezone interpretation; the client
/// never attaches an offset.
#[must_use]
pub fn wire_timestamp(datetime: NaiveDateTime) -> String {
    datetime.format(WIRE_TIMESTAMP_FORMAT).to_string()
}

/// Reconstruct a datetime from a `[y, m, d, h, min, s]` component array.
///
/// The backend serializes creation times this way and sometimes truncates the
/// time-of-day components; missing components default to zero. Returns `None`
/// for arrays with fewer than three components or out-of-range values.
#[must_use]
pub fn datetime_from_components(components: &[i32]) -> Option<NaiveDateTime> {
    if components.len() < 3 {
        return None;
    }
    let date = NaiveDate::from_ymd_opt(
        components[0],
        u32::try_from(components[1]).ok()?,
        u32::try_from(components[2]).ok()?,
    )?;
    let part = |idx: usize| -> Option<u32> {
        components
            .get(idx)
            .copied()
            .map_or(Some(0), |value| u32::try_from(value).ok())
    };
    date.and_hms_opt(part(3)?, part(4)?, part(5)?)
}

/// Whether `today` starts a new ISO week (Monday week start).
///
/// The weekly summary is requested only on this boundary, covering the week
/// that just ended.
#[must_use]
pub fn is_week_boundary(today: NaiveDate) -> bool {
    today.weekday() == Weekday::Mon
}

/// End date (Sunday) of the ISO week preceding `today`'s week.
#[must_use]
pub fn previous_week_end(today: NaiveDate) -> NaiveDate {
    let into_week = u64::from(today.weekday().num_days_from_monday());
    today
        .checked_sub_days(Days::new(into_week + 1))
        .unwrap_or(today)
}
