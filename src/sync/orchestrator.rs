// ABOUTME: The sync orchestrator driving one foreground session's reconciliation run
// ABOUTME: Strict step ordering, graceful per-step degradation, hard stop on rejected credential
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use std::sync::Arc;

use chrono::{Days, Local, NaiveDate};
use tokio::sync::{broadcast, watch};
use tracing::{debug, info, warn};
use vita_core::{dates, ApiError, HealthSnapshot, ProfileUpdate, SampleOrigin};

use super::{BackfillReport, DisplayState, LocalMetrics, SyncConfig, SyncPhase, SyncReport};
use crate::events::{ClientEvent, EventHub};
use crate::recommend::{self, ReconciledFeed};
use crate::session::SessionStore;
use crate::snapshot::SnapshotProvider;
use crate::transport::HealthApi;

/// Drives the full reconciliation sequence for one app-foreground session.
///
/// All collaborators are injected: the backend API behind [`HealthApi`], the
/// credential store, and the device snapshot source. The orchestrator reads
/// the session at the start of each step and never writes the credential
/// itself — teardown goes through [`SessionStore::expire`], which also guards
/// the session-expired signal to fire at most once.
///
/// Steps run strictly in order with no overlap; the only intentional
/// parallelism is the final profile + recommendations fetch pair.
pub struct SyncOrchestrator {
    api: Arc<dyn HealthApi>,
    session: Arc<SessionStore>,
    provider: Arc<dyn SnapshotProvider>,
    config: SyncConfig,
    events: EventHub,
    display: watch::Sender<DisplayState>,
}

impl SyncOrchestrator {
    /// Assemble an orchestrator from its collaborators.
    #[must_use]
    pub fn new(
        api: Arc<dyn HealthApi>,
        session: Arc<SessionStore>,
        provider: Arc<dyn SnapshotProvider>,
        config: SyncConfig,
    ) -> Self {
        let (display, _) = watch::channel(DisplayState::default());
        Self {
            api,
            session,
            provider,
            config,
            events: EventHub::new(),
            display,
        }
    }

    /// Subscribe to session/sync events. Subscribe before calling
    /// [`SyncOrchestrator::run`] to observe everything the run emits.
    #[must_use]
    pub fn subscribe_events(&self) -> broadcast::Receiver<ClientEvent> {
        self.events.subscribe()
    }

    /// Watch the display state published for presentation surfaces.
    #[must_use]
    pub fn subscribe_display(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }

    /// Execute one full sync run for the current day.
    ///
    /// Every network step catches its own failure and degrades to "skip,
    /// continue", so the run always reaches the display fetch — except when
    /// the backend rejects the credential, which tears the session down,
    /// emits [`ClientEvent::SessionExpired`] once, and aborts the remainder.
    pub async fn run(&self, manual_heart_rate: Option<u32>) -> SyncReport {
        self.run_on(Local::now().date_naive(), manual_heart_rate).await
    }

    /// Execute one full sync run treating `today` as the current day.
    ///
    /// The backfill window and the week-boundary decision derive from
    /// `today`; pinning it makes runs reproducible in tests and replays.
    pub async fn run_on(&self, today: NaiveDate, manual_heart_rate: Option<u32>) -> SyncReport {
        let mut report = SyncReport::default();

        report.enter(SyncPhase::Authorizing);
        report.authorized = self.provider.request_authorization().await;

        if !report.authorized {
            info!("health data access denied, continuing fetch-only");
            self.fetch_display_state(&mut report).await;
            report.enter(SyncPhase::Done);
            return report;
        }

        report.enter(SyncPhase::Capturing);
        let snapshot = self.provider.snapshot_for_today(manual_heart_rate).await;
        if let Some(snapshot) = &snapshot {
            // On-device truth reaches the display before any network result.
            self.publish_local_metrics(snapshot);
        } else {
            debug!("no snapshot available for today");
        }

        let session_ready = self.session.is_authenticated() && self.session.user_id().is_some();
        let Some(user_id) = self.session.user_id() else {
            info!("no cached user id, continuing fetch-only");
            self.fetch_display_state(&mut report).await;
            report.enter(SyncPhase::Done);
            return report;
        };

        if session_ready {
            if let Some(snapshot) = &snapshot {
                report.enter(SyncPhase::Uploading);
                if self.upload_today(snapshot, user_id, &mut report).await {
                    return report;
                }
            }

            report.enter(SyncPhase::SyncingProfile);
            let fatal = self
                .sync_profile(snapshot.as_ref(), user_id, &mut report)
                .await;
            if fatal {
                return report;
            }

            if report.profile_synced {
                report.enter(SyncPhase::Backfilling);
                let backfill = self.backfill_history(user_id, today, &mut report).await;
                let aborted = backfill.aborted;
                report.backfill = Some(backfill);
                if aborted {
                    return report;
                }
                self.events.emit(ClientEvent::HistorySynced);
            } else {
                info!("profile sync failed, skipping history backfill");
            }

            report.enter(SyncPhase::Aggregating);
            if self.aggregate_and_summarize(user_id, today, &mut report).await {
                return report;
            }
        } else {
            info!("no valid session, continuing fetch-only");
        }

        self.fetch_display_state(&mut report).await;
        report.enter(SyncPhase::Done);
        report
    }

    /// Upload today's snapshot. Returns `true` when the run must abort.
    async fn upload_today(
        &self,
        snapshot: &HealthSnapshot,
        user_id: i64,
        report: &mut SyncReport,
    ) -> bool {
        let dto = snapshot.to_dto(user_id, SampleOrigin::DeviceLive);
        match self.api.post_health_data(&dto).await {
            Ok(()) => {
                info!("today's snapshot uploaded");
                report.today_uploaded = true;
                false
            }
            Err(err) => self.handle_step_error("today upload", &err, report),
        }
    }

    /// Push snapshot demographics. Returns `true` when the run must abort.
    ///
    /// An empty update (no demographic fields captured) is trivially
    /// successful and still allows backfill to proceed.
    async fn sync_profile(
        &self,
        snapshot: Option<&HealthSnapshot>,
        user_id: i64,
        report: &mut SyncReport,
    ) -> bool {
        let update = snapshot.map(ProfileUpdate::from_snapshot).unwrap_or_default();
        if update.is_empty() {
            debug!("no demographics to push");
            report.profile_synced = true;
            return false;
        }
        match self.api.sync_user_profile(user_id, &update).await {
            Ok(()) => {
                info!("user profile synced");
                report.profile_synced = true;
                false
            }
            Err(err) => self.handle_step_error("profile sync", &err, report),
        }
    }

    /// Sequential oldest-first upload of the trailing history window.
    ///
    /// One day's upload (and its pacing delay) completes before the next
    /// day's fetch begins, keeping ordering deterministic and the request
    /// rate bounded. Credential validity is checked at the top of every
    /// iteration; a 401 from any request hard-stops the loop.
    async fn backfill_history(
        &self,
        user_id: i64,
        today: NaiveDate,
        report: &mut SyncReport,
    ) -> BackfillReport {
        let mut backfill = BackfillReport::default();
        info!(days = self.config.backfill_days, "starting history backfill");

        for offset in (1..=u64::from(self.config.backfill_days)).rev() {
            if !self.session.is_authenticated() {
                warn!("credential gone mid-backfill, aborting");
                backfill.aborted = true;
                break;
            }
            let Some(day) = today.checked_sub_days(Days::new(offset)) else {
                continue;
            };
            backfill.days_considered += 1;

            let Some(snapshot) = self.provider.snapshot_for_day(day).await else {
                debug!(%day, "no data for day");
                backfill.skipped_no_data += 1;
                self.pace().await;
                continue;
            };

            if !snapshot.meets_activity_threshold(
                self.config.min_backfill_steps,
                self.config.min_backfill_sleep_hours,
            ) {
                debug!(%day, "below activity threshold, skipping");
                backfill.skipped_inactive += 1;
                self.pace().await;
                continue;
            }

            let dto = snapshot.to_dto(user_id, SampleOrigin::HistoryBackfill);
            match self.api.post_health_data(&dto).await {
                Ok(()) => {
                    debug!(%day, "history day uploaded");
                    backfill.uploaded += 1;
                    // Per-day aggregation trigger; only a rejected credential matters
                    match self.api.run_aggregate(user_id, day).await {
                        Ok(_) => {}
                        Err(err) if err.is_session_fatal() => {
                            backfill.aborted = true;
                            self.expire_session(report);
                            break;
                        }
                        Err(err) => debug!(%day, error = %err, "day aggregation failed"),
                    }
                }
                Err(err) if err.is_session_fatal() => {
                    backfill.aborted = true;
                    self.expire_session(report);
                    break;
                }
                Err(err) => warn!(%day, error = %err, "history upload failed"),
            }

            self.pace().await;
        }

        if !backfill.aborted {
            info!(
                uploaded = backfill.uploaded,
                skipped_inactive = backfill.skipped_inactive,
                skipped_no_data = backfill.skipped_no_data,
                "history backfill complete"
            );
        }
        backfill
    }

    /// Grace-wait, recompute today's aggregate, and generate the weekly
    /// summary when today starts a new ISO week. Returns `true` when the run
    /// must abort.
    async fn aggregate_and_summarize(
        &self,
        user_id: i64,
        today: NaiveDate,
        report: &mut SyncReport,
    ) -> bool {
        if !self.config.ingest_grace.is_zero() {
            debug!(
                secs = self.config.ingest_grace.as_secs(),
                "waiting for backend ingestion to settle"
            );
            tokio::time::sleep(self.config.ingest_grace).await;
        }

        match self.api.run_aggregate(user_id, today).await {
            Ok(_) => report.today_aggregated = true,
            Err(err) => {
                if self.handle_step_error("today aggregation", &err, report) {
                    return true;
                }
            }
        }

        if dates::is_week_boundary(today) {
            let week_end = dates::previous_week_end(today);
            info!(%week_end, "week boundary, requesting weekly summary");
            match self.api.trigger_weekly_summary(user_id, week_end).await {
                Ok(()) => report.weekly_summary_for = Some(week_end),
                Err(err) => {
                    if self.handle_step_error("weekly summary", &err, report) {
                        return true;
                    }
                }
            }
        }
        false
    }

    /// Fetch profile and recommendations in parallel, reconcile, publish.
    ///
    /// Waits for both regardless of individual failure and proceeds with
    /// whatever succeeded; total failure of both leaves the previous display
    /// state intact.
    async fn fetch_display_state(&self, report: &mut SyncReport) {
        let Some(user_id) = self.session.user_id() else {
            debug!("no cached user id, skipping display fetch");
            return;
        };

        let (profile, recommendations) = tokio::join!(
            self.api.fetch_user_profile(user_id),
            self.api.fetch_recommendations()
        );

        let profile = match profile {
            Ok(profile) => Some(profile),
            Err(err) => {
                self.handle_step_error("profile fetch", &err, report);
                None
            }
        };
        let recommendations = match recommendations {
            Ok(list) => Some(list),
            Err(err) => {
                self.handle_step_error("recommendations fetch", &err, report);
                None
            }
        };

        if profile.is_none() && recommendations.is_none() {
            warn!("display fetch failed entirely, keeping previous state");
            return;
        }

        let feed = recommendations
            .map(|list| recommend::reconcile(list, user_id))
            .unwrap_or_default();
        let headline = feed.headline().cloned();
        let merged = feed.clone().into_list();
        let ReconciledFeed { weekly, daily } = feed;

        self.display.send_modify(|state| {
            if let Some(profile) = profile {
                state.profile = Some(profile.with_recommendations(merged));
            }
            state.weekly = weekly;
            state.daily = daily;
            state.headline = headline;
        });
        report.display_refreshed = true;
        info!("display state refreshed");
    }

    fn publish_local_metrics(&self, snapshot: &HealthSnapshot) {
        let metrics = LocalMetrics::from(snapshot);
        self.display.send_modify(|state| {
            state.local_metrics = Some(metrics);
        });
        debug!("local metrics published ahead of upload");
    }

    /// Log a step failure, tearing the session down when the credential was
    /// rejected. Returns `true` when the run must abort.
    fn handle_step_error(&self, step: &str, err: &ApiError, report: &mut SyncReport) -> bool {
        if err.is_session_fatal() {
            warn!(step, "credential rejected, tearing session down");
            self.expire_session(report);
            return true;
        }
        warn!(step, error = %err, "step failed, continuing");
        false
    }

    fn expire_session(&self, report: &mut SyncReport) {
        // expire() reports credential presence, so repeated 401s within one
        // run (or a run started without any credential) signal nothing.
        if self.session.expire() {
            report.session_expired = true;
            self.events.emit(ClientEvent::SessionExpired);
        }
    }

    async fn pace(&self) {
        if !self.config.pacing.is_zero() {
            tokio::time::sleep(self.config.pacing).await;
        }
    }
}
