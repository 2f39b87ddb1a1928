// ABOUTME: Server-computed daily aggregate of uploaded health samples
// ABOUTME: DailySummary wire shape with the backend's component-array date encoding
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One day's aggregate, computed exclusively by the backend.
///
/// The client requests computation (`POST /aggregates/run/{userId}/{date}`)
/// and displays the result; it never derives these figures locally.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Aggregate row id
    #[serde(default)]
    pub agg_id: Option<i64>,
    /// Owning user
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Aggregated day as `[year, month, day]`
    #[serde(default)]
    pub date: Option<[i32; 3]>,
    /// Total steps for the day
    #[serde(default)]
    pub steps_total: Option<u32>,
    /// Total calories (kcal)
    #[serde(default)]
    pub calories_total: Option<f64>,
    /// Mean heart rate (bpm)
    #[serde(default)]
    pub hr_mean: Option<f64>,
    /// Peak heart rate (bpm)
    #[serde(default)]
    pub hr_max: Option<u32>,
    /// Total sleep (hours)
    #[serde(default)]
    pub sleep_hours_total: Option<f64>,
}

impl DailySummary {
    /// The aggregated calendar day, when the date array is well-formed.
    #[must_use]
    pub fn day(&self) -> Option<NaiveDate> {
        let [year, month, day] = self.date?;
        NaiveDate::from_ymd_opt(year, u32::try_from(month).ok()?, u32::try_from(day).ok()?)
    }
}
