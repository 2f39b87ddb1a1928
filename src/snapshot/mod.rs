// ABOUTME: Device health-data source abstraction for daily snapshot capture
// ABOUTME: SnapshotProvider trait consumed by the sync orchestrator
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Snapshot capture from the device's health-data source.
//!
//! The real sensor framework is host-platform-bound; this module defines the
//! narrow contract the orchestrator needs and ships a synthetic implementation
//! for development, demos, and tests.

mod synthetic;

pub use synthetic::SyntheticSnapshotProvider;

use async_trait::async_trait;
use chrono::NaiveDate;
use vita_core::HealthSnapshot;

/// Best-effort source of per-day health snapshots.
///
/// Absence is never an error: `None` covers both "permission denied" and
/// "no data recorded", and a returned snapshot may have any subset of its
/// fields populated.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the orchestrator shares the
/// provider across suspension points.
#[async_trait]
pub trait SnapshotProvider: Send + Sync {
    /// Ask the user for read access to health data.
    ///
    /// Returns whether access was granted. Denial is a normal outcome; the
    /// sync sequence degrades to fetch-only mode.
    async fn request_authorization(&self) -> bool;

    /// Capture a snapshot for the current day.
    ///
    /// The manual heart-rate override stands in when no sensor samples exist
    /// (some devices never surface heart rate).
    async fn snapshot_for_today(&self, manual_heart_rate: Option<u32>) -> Option<HealthSnapshot>;

    /// Capture a snapshot for a past calendar day, for history backfill.
    async fn snapshot_for_day(&self, day: NaiveDate) -> Option<HealthSnapshot>;
}
