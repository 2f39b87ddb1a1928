// ABOUTME: Synthetic snapshot provider for development, demos, and testing
// ABOUTME: Deterministic per-day health metrics seeded from a base seed, no device required
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use async_trait::async_trait;
use chrono::{Datelike, Local, NaiveDate};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vita_core::HealthSnapshot;

use super::SnapshotProvider;

/// Synthetic health-data source.
///
/// Produces plausible, deterministic metrics without a real device: the same
/// `(seed, day)` pair always yields the same snapshot, so backfill runs are
/// reproducible across launches. Roughly one day in ten is generated as a
/// rest day with negligible activity, which exercises the backfill loop's
/// activity threshold.
pub struct SyntheticSnapshotProvider {
    seed: u64,
    granted: bool,
}

impl SyntheticSnapshotProvider {
    /// Provider that grants authorization and generates data from `seed`.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            seed,
            granted: true,
        }
    }

    /// Provider that denies authorization, for exercising fetch-only mode.
    #[must_use]
    pub const fn without_permission() -> Self {
        Self {
            seed: 0,
            granted: false,
        }
    }

    fn generate(&self, day: NaiveDate) -> HealthSnapshot {
        let day_seed = self
            .seed
            .wrapping_mul(31)
            .wrapping_add(u64::from(day.num_days_from_ce().unsigned_abs()));
        let mut rng = StdRng::seed_from_u64(day_seed);

        let mut snapshot = HealthSnapshot::empty(
            day.and_hms_opt(0, 0, 0)
                .unwrap_or_else(|| Local::now().naive_local()),
        );

        // Rest day: next to no movement, long sleep
        if rng.gen_range(0..10) == 0 {
            snapshot.steps = Some(rng.gen_range(0..10));
            snapshot.sleep_hours = Some(rng.gen_range(7.0..9.5));
        } else {
            let steps = rng.gen_range(2_000..15_000);
            snapshot.steps = Some(steps);
            snapshot.average_heart_rate = Some(rng.gen_range(58..90));
            snapshot.calories = Some(rng.gen_range(150.0..900.0));
            snapshot.sleep_hours = Some(rng.gen_range(5.5..9.0));
            snapshot.distance = Some(f64::from(steps) * 0.7);
        }

        snapshot.age = Some(34);
        snapshot.gender = Some("female".to_owned());
        snapshot.height = Some(170.0);
        snapshot.weight = Some(64.0);
        snapshot
    }
}

#[async_trait]
impl SnapshotProvider for SyntheticSnapshotProvider {
    async fn request_authorization(&self) -> bool {
        self.granted
    }

    async fn snapshot_for_today(&self, manual_heart_rate: Option<u32>) -> Option<HealthSnapshot> {
        if !self.granted {
            return None;
        }
        let today = Local::now().date_naive();
        let mut snapshot = self.generate(today);
        snapshot.timestamp = Local::now().naive_local();
        snapshot.manual_heart_rate = manual_heart_rate;
        Some(snapshot)
    }

    async fn snapshot_for_day(&self, day: NaiveDate) -> Option<HealthSnapshot> {
        if !self.granted {
            return None;
        }
        Some(self.generate(day))
    }
}
