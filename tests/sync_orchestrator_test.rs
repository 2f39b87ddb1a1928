// ABOUTME: Integration tests for the sync orchestrator's ordering and failure semantics
// ABOUTME: Exercises graceful degradation, backfill thresholds, and 401 hard-stop behavior
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health
#![allow(missing_docs)]

mod common;

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use common::{active_snapshot, rec, snapshot, FakeHealthApi, FakeSnapshotProvider};
use vita_core::SampleOrigin;
use vita_sync::events::ClientEvent;
use vita_sync::session::SessionStore;
use vita_sync::sync::{SyncConfig, SyncOrchestrator, SyncPhase};

const USER_ID: i64 = 7;

/// A Thursday, so the weekly-summary branch stays quiet.
fn thursday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 5).unwrap()
}

/// A Monday, the ISO week boundary.
fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
}

fn signed_in_session() -> Arc<SessionStore> {
    let session = Arc::new(SessionStore::in_memory());
    session.save_session("jwt-token", Some(USER_ID)).unwrap();
    session
}

fn orchestrator(
    api: &Arc<FakeHealthApi>,
    provider: FakeSnapshotProvider,
    session: &Arc<SessionStore>,
) -> SyncOrchestrator {
    SyncOrchestrator::new(
        Arc::clone(api) as Arc<dyn vita_sync::transport::HealthApi>,
        Arc::clone(session),
        Arc::new(provider),
        SyncConfig::immediate(),
    )
}

#[tokio::test]
async fn full_run_uploads_today_backfills_and_refreshes_display() {
    let mut api = FakeHealthApi::for_user(USER_ID);
    api.recommendations = vec![
        rec(11, USER_ID, "ml_model", Some("warning"), &[2026, 3, 4, 10, 0]),
        rec(12, 99, "ml_model", Some("critical"), &[2026, 3, 4, 10, 0]),
    ];
    let api = Arc::new(api);
    let provider =
        FakeSnapshotProvider::granted_with(Some(active_snapshot()), Some(active_snapshot()));
    let session = signed_in_session();

    let orchestrator = orchestrator(&api, provider, &session);
    let mut events = orchestrator.subscribe_events();
    let display = orchestrator.subscribe_display();

    let report = orchestrator.run_on(thursday(), None).await;

    assert!(report.authorized);
    assert!(report.today_uploaded);
    assert!(report.profile_synced);
    assert!(report.today_aggregated);
    assert!(report.display_refreshed);
    assert!(!report.session_expired);
    assert_eq!(
        report.phases,
        vec![
            SyncPhase::Authorizing,
            SyncPhase::Capturing,
            SyncPhase::Uploading,
            SyncPhase::SyncingProfile,
            SyncPhase::Backfilling,
            SyncPhase::Aggregating,
            SyncPhase::Done,
        ]
    );

    // Today first (device-live), then 14 history days oldest-first
    let uploads = api.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 15);
    assert_eq!(uploads[0].source, SampleOrigin::DeviceLive);
    assert!(uploads[1..]
        .iter()
        .all(|dto| dto.source == SampleOrigin::HistoryBackfill));
    drop(uploads);

    let backfill = report.backfill.unwrap();
    assert_eq!(backfill.days_considered, 14);
    assert_eq!(backfill.uploaded, 14);
    assert!(!backfill.aborted);

    // Per-day aggregation for each history day, then today's recompute last
    let aggregates = api.aggregate_days.lock().unwrap();
    assert_eq!(aggregates.len(), 15);
    assert_eq!(*aggregates.last().unwrap(), thursday());
    // Oldest-first ordering of the backfill window
    assert_eq!(
        aggregates[0],
        thursday().checked_sub_days(Days::new(14)).unwrap()
    );
    drop(aggregates);

    // Demographics pushed once
    let updates = api.profile_updates.lock().unwrap();
    assert_eq!(updates.len(), 1);
    assert_eq!(updates[0].age, Some(34));
    drop(updates);

    // Not a Monday: no weekly summary
    assert!(api.weekly_requests.lock().unwrap().is_empty());
    assert!(report.weekly_summary_for.is_none());

    assert_eq!(events.recv().await.unwrap(), ClientEvent::HistorySynced);

    let state = display.borrow();
    let metrics = state.local_metrics.as_ref().unwrap();
    assert_eq!(metrics.steps, 8_000);
    let profile = state.profile.as_ref().unwrap();
    // Reconciled feed is re-injected into the profile, filtered to this user
    let recommendations = profile.recommendations.as_ref().unwrap();
    assert_eq!(recommendations.len(), 1);
    assert_eq!(recommendations[0].rec_id, 11);
    assert_eq!(state.headline.as_ref().unwrap().rec_id, 11);
}

#[tokio::test]
async fn permission_denial_goes_straight_to_fetch_only() {
    let api = Arc::new(FakeHealthApi::for_user(USER_ID));
    let session = signed_in_session();

    let orchestrator = orchestrator(&api, FakeSnapshotProvider::denied(), &session);
    let report = orchestrator.run_on(thursday(), None).await;

    assert!(!report.authorized);
    assert!(report.display_refreshed);
    assert_eq!(api.upload_count(), 0);
    assert!(api.profile_updates.lock().unwrap().is_empty());
    assert!(report.backfill.is_none());
    assert!(!report.phases.contains(&SyncPhase::Uploading));
    assert!(!report.phases.contains(&SyncPhase::Backfilling));
    assert!(report.phases.contains(&SyncPhase::Done));
}

#[tokio::test]
async fn profile_sync_failure_skips_backfill_but_still_refreshes_display() {
    let mut api = FakeHealthApi::for_user(USER_ID);
    api.fail_profile_sync = true;
    let api = Arc::new(api);
    let provider =
        FakeSnapshotProvider::granted_with(Some(active_snapshot()), Some(active_snapshot()));
    let session = signed_in_session();

    let orchestrator = orchestrator(&api, provider, &session);
    let report = orchestrator.run_on(thursday(), None).await;

    assert!(report.today_uploaded);
    assert!(!report.profile_synced);
    // Hard gate: backfill never ran
    assert!(report.backfill.is_none());
    assert_eq!(api.upload_count(), 1);
    assert!(!report.phases.contains(&SyncPhase::Backfilling));
    // The rest of the sequence still happened
    assert!(report.today_aggregated);
    assert!(report.display_refreshed);
}

#[tokio::test]
async fn unauthorized_mid_backfill_halts_and_signals_once() {
    let mut api = FakeHealthApi::for_user(USER_ID);
    // Today's snapshot is absent, so upload call N is backfill day N
    api.fail_upload_at = Some(5);
    let api = Arc::new(api);
    let provider = FakeSnapshotProvider::granted_with(None, Some(active_snapshot()));
    let session = signed_in_session();

    let orchestrator = orchestrator(&api, provider, &session);
    let mut events = orchestrator.subscribe_events();
    let report = orchestrator.run_on(thursday(), None).await;

    // Loop halted before day 6: four uploads landed, day 5's was rejected
    assert_eq!(api.upload_count(), 4);
    let backfill = report.backfill.unwrap();
    assert!(backfill.aborted);
    assert_eq!(backfill.days_considered, 5);
    assert_eq!(backfill.uploaded, 4);

    // Session torn down, signal emitted exactly once
    assert!(report.session_expired);
    assert!(!session.is_authenticated());
    assert_eq!(events.try_recv().unwrap(), ClientEvent::SessionExpired);
    assert!(events.try_recv().is_err());

    // The run aborted: no aggregation pass, no display refresh
    assert!(!report.today_aggregated);
    assert!(!report.display_refreshed);
    assert!(!report.phases.contains(&SyncPhase::Done));
}

#[tokio::test]
async fn backfill_threshold_skips_inactive_days_and_advances() {
    let api = Arc::new(FakeHealthApi::for_user(USER_ID));
    let today = thursday();
    let mut provider = FakeSnapshotProvider::granted_with(None, None);
    // Two-day window: the older day barely active, the newer one all-zero
    provider.overrides.insert(
        today.checked_sub_days(Days::new(2)).unwrap(),
        Some(snapshot(15, 0.1)),
    );
    provider.overrides.insert(
        today.checked_sub_days(Days::new(1)).unwrap(),
        Some(snapshot(0, 0.0)),
    );
    let session = signed_in_session();

    let orchestrator = SyncOrchestrator::new(
        Arc::clone(&api) as Arc<dyn vita_sync::transport::HealthApi>,
        Arc::clone(&session),
        Arc::new(provider),
        SyncConfig {
            backfill_days: 2,
            ..SyncConfig::immediate()
        },
    );
    let report = orchestrator.run_on(today, None).await;

    let backfill = report.backfill.unwrap();
    assert_eq!(backfill.days_considered, 2);
    assert_eq!(backfill.uploaded, 1);
    assert_eq!(backfill.skipped_inactive, 1);
    assert!(!backfill.aborted);

    let uploads = api.uploads.lock().unwrap();
    assert_eq!(uploads.len(), 1);
    assert_eq!(uploads[0].steps, Some(15));
}

#[tokio::test]
async fn weekly_summary_requested_only_on_week_boundary() {
    let api = Arc::new(FakeHealthApi::for_user(USER_ID));
    let provider = FakeSnapshotProvider::granted_with(Some(active_snapshot()), None);
    let session = signed_in_session();

    let orchestrator = orchestrator(&api, provider, &session);
    let report = orchestrator.run_on(monday(), None).await;

    // Prior ISO week ended yesterday (Sunday)
    let expected_week_end = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
    assert_eq!(report.weekly_summary_for, Some(expected_week_end));
    assert_eq!(
        *api.weekly_requests.lock().unwrap(),
        vec![expected_week_end]
    );
}

#[tokio::test]
async fn missing_user_id_means_fetch_only_without_display() {
    let api = Arc::new(FakeHealthApi::for_user(USER_ID));
    let provider =
        FakeSnapshotProvider::granted_with(Some(active_snapshot()), Some(active_snapshot()));
    let session = Arc::new(SessionStore::in_memory());
    session.save_session("jwt-token", None).unwrap();

    let orchestrator = orchestrator(&api, provider, &session);
    let display = orchestrator.subscribe_display();
    let report = orchestrator.run_on(thursday(), None).await;

    assert_eq!(api.upload_count(), 0);
    assert!(!report.display_refreshed);
    // Local metrics were still published from the on-device snapshot
    assert!(display.borrow().local_metrics.is_some());
}

#[tokio::test]
async fn total_display_failure_keeps_previous_state() {
    let mut api = FakeHealthApi::for_user(USER_ID);
    api.fail_profile_fetch = true;
    api.fail_recommendations_fetch = true;
    let api = Arc::new(api);
    let provider = FakeSnapshotProvider::granted_with(Some(active_snapshot()), None);
    let session = signed_in_session();

    let orchestrator = orchestrator(&api, provider, &session);
    let display = orchestrator.subscribe_display();
    let report = orchestrator.run_on(thursday(), None).await;

    assert!(!report.display_refreshed);
    let state = display.borrow();
    assert!(state.profile.is_none());
    assert!(state.headline.is_none());
    // On-device metrics were published before the network was consulted
    assert!(state.local_metrics.is_some());
}

#[tokio::test]
async fn manual_heart_rate_flows_into_the_uploaded_dto() {
    let api = Arc::new(FakeHealthApi::for_user(USER_ID));
    let mut today_snapshot = snapshot(5_000, 6.0);
    today_snapshot.average_heart_rate = None;
    let provider = FakeSnapshotProvider::granted_with(Some(today_snapshot), None);
    let session = signed_in_session();

    let orchestrator = orchestrator(&api, provider, &session);
    orchestrator.run_on(thursday(), Some(58)).await;

    let uploads = api.uploads.lock().unwrap();
    assert_eq!(uploads[0].heart_rate, Some(58));
}
