// ABOUTME: Point-in-time health snapshot captured from the device source
// ABOUTME: HealthSnapshot domain type, its wire DTO, and the upload origin tag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dates;

/// Origin tag distinguishing live-device uploads from history backfill.
///
/// The backend stores the tag verbatim; it is part of the dedup story on the
/// server side, so the strings must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleOrigin {
    /// Captured from the device for the current day during a foreground sync
    DeviceLive,
    /// Retroactive upload of a historical day
    HistoryBackfill,
}

impl SampleOrigin {
    /// Stable wire representation of the tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeviceLive => "device_live",
            Self::HistoryBackfill => "history_backfill",
        }
    }
}

/// One calendar day's bundle of health metrics from the device source.
///
/// Every metric is optional: the sensor framework may lack permission or data
/// for any of them, and a snapshot with all fields absent is a valid
/// "no data available" result rather than an error. Snapshots are created
/// fresh per sync attempt (today) or per backfill day (history), never
/// mutated, and converted exactly once into a [`HealthDataDTO`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthSnapshot {
    /// Step count for the day
    pub steps: Option<u32>,
    /// Average heart rate over the day's samples (bpm)
    pub average_heart_rate: Option<u32>,
    /// Active energy burned (kcal)
    pub calories: Option<f64>,
    /// Total sleep (hours)
    pub sleep_hours: Option<f64>,
    /// Walking/running distance (meters)
    pub distance: Option<f64>,
    /// User-entered heart rate, used when no sensor samples exist
    pub manual_heart_rate: Option<u32>,
    /// Local wall-clock capture time
    pub timestamp: NaiveDateTime,
    /// Age in years, from the device's demographic store
    pub age: Option<u32>,
    /// Biological sex as reported by the device
    pub gender: Option<String>,
    /// Height (cm)
    pub height: Option<f64>,
    /// Body mass (kg)
    pub weight: Option<f64>,
}

impl HealthSnapshot {
    /// An empty snapshot for the given capture time ("no data available").
    #[must_use]
    pub const fn empty(timestamp: NaiveDateTime) -> Self {
        Self {
            steps: None,
            average_heart_rate: None,
            calories: None,
            sleep_hours: None,
            distance: None,
            manual_heart_rate: None,
            timestamp,
            age: None,
            gender: None,
            height: None,
            weight: None,
        }
    }

    /// Whether the day shows enough activity to be worth uploading.
    ///
    /// Both thresholds are strictly-greater comparisons; all-zero days fail
    /// them and are skipped by the backfill loop.
    #[must_use]
    pub fn meets_activity_threshold(&self, min_steps: u32, min_sleep_hours: f64) -> bool {
        self.steps.unwrap_or(0) > min_steps || self.sleep_hours.unwrap_or(0.0) > min_sleep_hours
    }

    /// Convert into the wire DTO for upload.
    ///
    /// Every non-`None` field maps 1:1; the DTO's heart rate falls back to the
    /// manual override when no sensor average exists.
    #[must_use]
    pub fn to_dto(&self, user_id: i64, origin: SampleOrigin) -> HealthDataDTO {
        HealthDataDTO {
            user_id,
            timestamp: dates::wire_timestamp(self.timestamp),
            heart_rate: self.average_heart_rate.or(self.manual_heart_rate),
            steps: self.steps,
            calories: self.calories,
            sleep_hours: self.sleep_hours,
            distance: self.distance,
            age: self.age,
            gender: self.gender.clone(),
            height: self.height,
            weight: self.weight,
            source: origin,
        }
    }
}

/// Wire representation of a snapshot: one row of the backend's ingest feed.
///
/// Immutable once constructed. The `timestamp` is a zone-less local-time
/// string; the server owns timezone interpretation. Duplicate uploads of the
/// same timestamp/source pair are the server's concern, not the client's.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthDataDTO {
    /// Owning user
    pub user_id: i64,
    /// Local wall-clock capture time, `yyyy-MM-dd'T'HH:mm:ss`, no zone suffix
    pub timestamp: String,
    /// Heart rate (bpm); sensor average or manual override
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heart_rate: Option<u32>,
    /// Step count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    /// Active energy burned (kcal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
    /// Total sleep (hours)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    /// Distance (meters)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    /// Age in years
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Biological sex
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Height (cm)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// Body mass (kg)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// Upload origin tag
    pub source: SampleOrigin,
}
