// ABOUTME: Server-issued health recommendation rows and their display accessors
// ABOUTME: Weekly-summary discrimination, severity weighting, and creation-time parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dates;

/// Source tag marking a weekly report.
///
/// This is a magic-string contract with the backend's ML pipeline, not a
/// client-side enum: any other value (or none) means "daily insight".
pub const WEEKLY_SUMMARY_SOURCE: &str = "weekly_summary";

/// A server-issued advisory for one user.
///
/// Rows are produced by the backend's rules engine and ML models; the client
/// only filters, deduplicates, and ranks them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthRecommendation {
    /// Numeric row id, assumed monotonically increasing with insertion order
    pub rec_id: i64,
    /// Free-text advisory body
    pub recommendation_text: String,
    /// Producing subsystem ("ml_model", "rules", "weekly_summary", ...)
    #[serde(default)]
    pub source: Option<String>,
    /// Severity tag ("critical", "warning", ...)
    #[serde(default)]
    pub severity: Option<String>,
    /// Creation time as `[y, m, d, h, min, s]`, possibly truncated
    #[serde(default)]
    pub created_at: Option<Vec<i32>>,
    /// Owning user
    pub user_id: i64,
}

impl HealthRecommendation {
    /// Whether this row is a weekly report rather than a daily insight.
    #[must_use]
    pub fn is_weekly_summary(&self) -> bool {
        self.source.as_deref() == Some(WEEKLY_SUMMARY_SOURCE)
    }

    /// Creation time with truncated components defaulted to zero.
    ///
    /// `None` when the component array is absent or malformed; callers sort
    /// such rows last rather than inventing a timestamp.
    #[must_use]
    pub fn created_at_local(&self) -> Option<NaiveDateTime> {
        self.created_at
            .as_deref()
            .and_then(dates::datetime_from_components)
    }

    /// Calendar day the row was created on; half of the dedup key.
    #[must_use]
    pub fn created_day(&self) -> Option<NaiveDate> {
        self.created_at_local().map(|dt| dt.date())
    }

    /// Ranking weight for headline selection: critical=3, warning=2, else 1.
    #[must_use]
    pub fn severity_weight(&self) -> u8 {
        match self
            .severity
            .as_deref()
            .map(str::to_lowercase)
            .as_deref()
        {
            Some("critical") => 3,
            Some("warning") => 2,
            _ => 1,
        }
    }
}
