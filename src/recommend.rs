// ABOUTME: Recommendation feed reconciliation: filter, dedup, partition, rank
// ABOUTME: Pure functions turning raw server rows into a displayable structure
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Reconciliation of the server's recommendation feed.
//!
//! The backend regenerates recommendations idempotently (recomputing weekly
//! summaries, re-running rules), which produces multiple rows representing the
//! same logical advisory for the same calendar day and source. This module
//! collapses those duplicates, splits the feed into weekly reports and daily
//! insights, and picks the single best row for compact display.
//!
//! Everything here is pure: no I/O, no clock reads. Rows with missing or
//! malformed creation times sort last rather than being stamped with "now".

use std::cmp::Reverse;
use std::collections::HashSet;

use chrono::NaiveDate;
use vita_core::HealthRecommendation;

/// Feed split into weekly reports and daily insights, each newest-first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconciledFeed {
    /// Rows whose source is the weekly-summary marker
    pub weekly: Vec<HealthRecommendation>,
    /// Everything else
    pub daily: Vec<HealthRecommendation>,
}

impl ReconciledFeed {
    /// Whether the feed has nothing to show (a valid state, not an error).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weekly.is_empty() && self.daily.is_empty()
    }

    /// The single best row for a compact summary view, across both buckets.
    #[must_use]
    pub fn headline(&self) -> Option<&HealthRecommendation> {
        select_headline(self.weekly.iter().chain(self.daily.iter()))
    }

    /// Merge back into one newest-first list, e.g. for re-injection into a
    /// fetched profile.
    #[must_use]
    pub fn into_list(self) -> Vec<HealthRecommendation> {
        let mut merged: Vec<_> = self.weekly.into_iter().chain(self.daily).collect();
        sort_newest_first(&mut merged);
        merged
    }
}

/// Full pipeline: filter to one user, collapse duplicates, partition.
#[must_use]
pub fn reconcile(list: Vec<HealthRecommendation>, user_id: i64) -> ReconciledFeed {
    partition(deduplicate(filter_by_user(list, user_id)))
}

/// Keep only rows owned by `user_id`.
///
/// The feed endpoint returns all visible users' rows, so this filter is
/// mandatory before anything else.
#[must_use]
pub fn filter_by_user(list: Vec<HealthRecommendation>, user_id: i64) -> Vec<HealthRecommendation> {
    list.into_iter()
        .filter(|rec| rec.user_id == user_id)
        .collect()
}

/// Collapse duplicate rows sharing a (creation day, source tag) key.
///
/// The highest numeric id wins a key collision, on the assumption that ids
/// are assigned monotonically and the newest row is the regenerated one.
/// Idempotent: a second pass removes nothing further.
#[must_use]
pub fn deduplicate(list: Vec<HealthRecommendation>) -> Vec<HealthRecommendation> {
    let mut sorted_by_id = list;
    sorted_by_id.sort_by_key(|rec| Reverse(rec.rec_id));

    let mut seen: HashSet<(Option<NaiveDate>, Option<String>)> = HashSet::new();
    sorted_by_id
        .into_iter()
        .filter(|rec| seen.insert((rec.created_day(), rec.source.clone())))
        .collect()
}

/// Split into weekly reports and daily insights, each sorted newest-first.
#[must_use]
pub fn partition(list: Vec<HealthRecommendation>) -> ReconciledFeed {
    let (mut weekly, mut daily): (Vec<_>, Vec<_>) =
        list.into_iter().partition(HealthRecommendation::is_weekly_summary);
    sort_newest_first(&mut weekly);
    sort_newest_first(&mut daily);
    ReconciledFeed { weekly, daily }
}

/// Pick the row to feature: severity weight descending (critical=3,
/// warning=2, else 1), ties broken by the most recent creation time.
pub fn select_headline<'a, I>(list: I) -> Option<&'a HealthRecommendation>
where
    I: IntoIterator<Item = &'a HealthRecommendation>,
{
    list.into_iter()
        .max_by_key(|rec| (rec.severity_weight(), rec.created_at_local()))
}

fn sort_newest_first(list: &mut [HealthRecommendation]) {
    list.sort_by_key(|rec| Reverse(rec.created_at_local()));
}
