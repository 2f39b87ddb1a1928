// ABOUTME: Sync orchestration types: configuration, phases, reports, display state
// ABOUTME: Shared definitions for the authorize→capture→upload→backfill→display sequence
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Sync orchestration.
//!
//! One foreground session runs the full reconciliation sequence exactly once:
//! authorize, capture today, upload, sync profile, backfill history, trigger
//! server-side aggregation and (on week boundaries) the weekly ML summary,
//! then refresh the display state. Each step degrades gracefully on failure;
//! only a rejected credential aborts the run.

mod orchestrator;

pub use orchestrator::SyncOrchestrator;

use std::time::Duration;

use chrono::NaiveDate;
use tracing::info;
use vita_core::{HealthRecommendation, HealthSnapshot, UserProfile};

/// Default trailing backfill window in days.
///
/// The alternative "since start of previous ISO week" policy was considered
/// and rejected in favor of a fixed window; see DESIGN.md.
pub const DEFAULT_BACKFILL_DAYS: u32 = 14;

/// Default pause between backfill days, in milliseconds. Keeps the upload
/// burst under the backend's rate limits.
pub const DEFAULT_PACING_MS: u64 = 500;

/// Default wait after backfill before requesting aggregation, in seconds.
/// The backend's ingestion pipeline is eventually consistent; aggregation
/// issued too early reads a partial day.
pub const DEFAULT_INGEST_GRACE_SECS: u64 = 30;

/// Default minimum step count for a backfill day to be worth uploading
/// (strictly-greater comparison).
pub const DEFAULT_MIN_BACKFILL_STEPS: u32 = 10;

/// Default minimum sleep hours for a backfill day to be worth uploading
/// (strictly-greater comparison).
pub const DEFAULT_MIN_BACKFILL_SLEEP_HOURS: f64 = 0.5;

/// Tunable knobs for one sync run.
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Trailing window of past days to backfill (today excluded)
    pub backfill_days: u32,
    /// Pause between backfill days
    pub pacing: Duration,
    /// Wait after backfill before aggregation/summary requests
    pub ingest_grace: Duration,
    /// Activity threshold: minimum steps (strictly greater)
    pub min_backfill_steps: u32,
    /// Activity threshold: minimum sleep hours (strictly greater)
    pub min_backfill_sleep_hours: f64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            backfill_days: DEFAULT_BACKFILL_DAYS,
            pacing: Duration::from_millis(DEFAULT_PACING_MS),
            ingest_grace: Duration::from_secs(DEFAULT_INGEST_GRACE_SECS),
            min_backfill_steps: DEFAULT_MIN_BACKFILL_STEPS,
            min_backfill_sleep_hours: DEFAULT_MIN_BACKFILL_SLEEP_HOURS,
        }
    }
}

impl SyncConfig {
    /// A configuration with no pacing or grace delays, for tests.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            pacing: Duration::ZERO,
            ingest_grace: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Named states of the orchestration sequence, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncPhase {
    /// Requesting health-data access from the device source
    Authorizing,
    /// Capturing today's snapshot
    Capturing,
    /// Uploading today's snapshot
    Uploading,
    /// Pushing demographics to the backend
    SyncingProfile,
    /// Sequentially uploading the trailing history window
    Backfilling,
    /// Requesting server-side aggregation and weekly summary
    Aggregating,
    /// Sequence complete (possibly degraded)
    Done,
}

/// What one sync run actually did.
#[derive(Debug, Clone, Default)]
pub struct SyncReport {
    /// Phases entered, in order
    pub phases: Vec<SyncPhase>,
    /// Whether health-data access was granted
    pub authorized: bool,
    /// Whether today's snapshot reached the backend
    pub today_uploaded: bool,
    /// Whether the profile push succeeded (gates backfill)
    pub profile_synced: bool,
    /// Backfill outcome, when the step ran at all
    pub backfill: Option<BackfillReport>,
    /// Whether today's aggregate was recomputed
    pub today_aggregated: bool,
    /// Week-end date a weekly summary was generated for, when due and successful
    pub weekly_summary_for: Option<NaiveDate>,
    /// Whether the display state was refreshed from the server
    pub display_refreshed: bool,
    /// Whether the run tore the session down after a rejected credential
    pub session_expired: bool,
}

impl SyncReport {
    pub(crate) fn enter(&mut self, phase: SyncPhase) {
        info!(?phase, "sync phase");
        self.phases.push(phase);
    }
}

/// Per-day accounting for the backfill loop.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackfillReport {
    /// Days the loop looked at before finishing or aborting
    pub days_considered: u32,
    /// Days uploaded (and per-day aggregation requested)
    pub uploaded: u32,
    /// Days the device source had nothing for
    pub skipped_no_data: u32,
    /// Days below the activity threshold
    pub skipped_inactive: u32,
    /// Whether a rejected credential hard-stopped the loop
    pub aborted: bool,
}

/// Metrics shown immediately from the on-device snapshot, before any network
/// round-trip completes.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalMetrics {
    /// Step count
    pub steps: u32,
    /// Heart rate (sensor average or manual override)
    pub heart_rate: u32,
    /// Calories, rounded
    pub calories: u32,
    /// Sleep hours
    pub sleep_hours: f64,
}

impl From<&HealthSnapshot> for LocalMetrics {
    fn from(snapshot: &HealthSnapshot) -> Self {
        Self {
            steps: snapshot.steps.unwrap_or(0),
            heart_rate: snapshot
                .average_heart_rate
                .or(snapshot.manual_heart_rate)
                .unwrap_or(0),
            calories: snapshot.calories.unwrap_or(0.0).round() as u32,
            sleep_hours: snapshot.sleep_hours.unwrap_or(0.0),
        }
    }
}

/// The view published to presentation surfaces.
///
/// `local_metrics` reflects on-device truth and updates before any network
/// result; the rest is server state merged after the display fetch.
#[derive(Debug, Clone, Default)]
pub struct DisplayState {
    /// Today's metrics from the device, pre-network
    pub local_metrics: Option<LocalMetrics>,
    /// Server profile with the reconciled recommendation list re-injected
    pub profile: Option<UserProfile>,
    /// Weekly reports, newest first
    pub weekly: Vec<HealthRecommendation>,
    /// Daily insights, newest first
    pub daily: Vec<HealthRecommendation>,
    /// The single best row for compact display
    pub headline: Option<HealthRecommendation>,
}
