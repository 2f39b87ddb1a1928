// ABOUTME: Shared test fakes for sync orchestrator integration tests
// ABOUTME: Scripted HealthApi and SnapshotProvider implementations plus fixture builders
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health
#![allow(dead_code, missing_docs)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use vita_core::{
    ApiError, ApiResult, DailySummary, HealthDataDTO, HealthRecommendation, HealthSnapshot,
    LoginResponse, ProfileUpdate, RegisterRequest, UserProfile,
};
use vita_sync::snapshot::SnapshotProvider;
use vita_sync::transport::HealthApi;

/// Fixed capture time for fixture snapshots.
pub fn capture_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 5)
        .unwrap()
        .and_hms_opt(8, 30, 0)
        .unwrap()
}

/// Snapshot with the given activity figures and no demographics.
pub fn snapshot(steps: u32, sleep_hours: f64) -> HealthSnapshot {
    let mut snap = HealthSnapshot::empty(capture_time());
    snap.steps = Some(steps);
    snap.sleep_hours = Some(sleep_hours);
    snap
}

/// Active snapshot carrying demographics, so profile sync has work to do.
pub fn active_snapshot() -> HealthSnapshot {
    let mut snap = snapshot(8_000, 7.5);
    snap.average_heart_rate = Some(66);
    snap.calories = Some(420.0);
    snap.age = Some(34);
    snap.gender = Some("female".to_owned());
    snap.height = Some(170.0);
    snap.weight = Some(64.0);
    snap
}

/// Recommendation row builder.
pub fn rec(
    id: i64,
    user: i64,
    source: &str,
    severity: Option<&str>,
    created: &[i32],
) -> HealthRecommendation {
    HealthRecommendation {
        rec_id: id,
        recommendation_text: format!("rec {id}"),
        source: Some(source.to_owned()),
        severity: severity.map(str::to_owned),
        created_at: Some(created.to_vec()),
        user_id: user,
    }
}

/// Profile fixture for the test user.
pub fn profile(user_id: i64) -> UserProfile {
    UserProfile {
        user_id,
        name: Some("Ada".to_owned()),
        surname: Some("Lovelace".to_owned()),
        email: Some("ada@example.com".to_owned()),
        age: Some(34),
        gender: Some("female".to_owned()),
        height: Some(170.0),
        weight: Some(64.0),
        recommendations: None,
    }
}

/// Scripted device source: explicit snapshots for today and per-day history.
pub struct FakeSnapshotProvider {
    pub granted: bool,
    pub today: Option<HealthSnapshot>,
    /// Snapshot returned for any history day without an explicit override
    pub default_day: Option<HealthSnapshot>,
    /// Per-day overrides; an explicit `None` means "no data for this day"
    pub overrides: HashMap<NaiveDate, Option<HealthSnapshot>>,
}

impl FakeSnapshotProvider {
    pub fn granted_with(
        today: Option<HealthSnapshot>,
        default_day: Option<HealthSnapshot>,
    ) -> Self {
        Self {
            granted: true,
            today,
            default_day,
            overrides: HashMap::new(),
        }
    }

    pub fn denied() -> Self {
        Self {
            granted: false,
            today: None,
            default_day: None,
            overrides: HashMap::new(),
        }
    }
}

#[async_trait]
impl SnapshotProvider for FakeSnapshotProvider {
    async fn request_authorization(&self) -> bool {
        self.granted
    }

    async fn snapshot_for_today(&self, manual_heart_rate: Option<u32>) -> Option<HealthSnapshot> {
        if !self.granted {
            return None;
        }
        self.today.clone().map(|mut snap| {
            snap.manual_heart_rate = manual_heart_rate;
            snap
        })
    }

    async fn snapshot_for_day(&self, day: NaiveDate) -> Option<HealthSnapshot> {
        if !self.granted {
            return None;
        }
        self.overrides
            .get(&day)
            .cloned()
            .unwrap_or_else(|| self.default_day.clone())
    }
}

/// Scripted backend: records every call, fails where the test says so.
pub struct FakeHealthApi {
    /// Every uploaded DTO, in call order
    pub uploads: Mutex<Vec<HealthDataDTO>>,
    /// Every profile update pushed
    pub profile_updates: Mutex<Vec<ProfileUpdate>>,
    /// Every day an aggregate run was requested for
    pub aggregate_days: Mutex<Vec<NaiveDate>>,
    /// Every week-end date a weekly summary was requested for
    pub weekly_requests: Mutex<Vec<NaiveDate>>,
    /// 1-based `post_health_data` call index that returns 401
    pub fail_upload_at: Option<usize>,
    /// Make `sync_user_profile` fail (non-fatally)
    pub fail_profile_sync: bool,
    /// Make `fetch_user_profile` fail (non-fatally)
    pub fail_profile_fetch: bool,
    /// Make `fetch_recommendations` fail (non-fatally)
    pub fail_recommendations_fetch: bool,
    /// Profile returned by `fetch_user_profile`
    pub profile: UserProfile,
    /// Feed returned by `fetch_recommendations`
    pub recommendations: Vec<HealthRecommendation>,
}

impl FakeHealthApi {
    pub fn for_user(user_id: i64) -> Self {
        Self {
            uploads: Mutex::new(Vec::new()),
            profile_updates: Mutex::new(Vec::new()),
            aggregate_days: Mutex::new(Vec::new()),
            weekly_requests: Mutex::new(Vec::new()),
            fail_upload_at: None,
            fail_profile_sync: false,
            fail_profile_fetch: false,
            fail_recommendations_fetch: false,
            profile: profile(user_id),
            recommendations: Vec::new(),
        }
    }

    pub fn upload_count(&self) -> usize {
        self.uploads.lock().unwrap().len()
    }
}

#[async_trait]
impl HealthApi for FakeHealthApi {
    async fn login(&self, _email: &str, _password: &str) -> ApiResult<LoginResponse> {
        Err(ApiError::Unknown("login not scripted".to_owned()))
    }

    async fn register(&self, _request: &RegisterRequest) -> ApiResult<()> {
        Err(ApiError::Unknown("register not scripted".to_owned()))
    }

    async fn request_password_reset(&self, _email: &str) -> ApiResult<()> {
        Err(ApiError::Unknown("reset not scripted".to_owned()))
    }

    async fn reset_password(&self, _token: &str, _new_password: &str) -> ApiResult<()> {
        Err(ApiError::Unknown("reset not scripted".to_owned()))
    }

    async fn sync_user_profile(&self, _user_id: i64, update: &ProfileUpdate) -> ApiResult<()> {
        if self.fail_profile_sync {
            return Err(ApiError::ServerError("profile sync down".to_owned()));
        }
        self.profile_updates.lock().unwrap().push(update.clone());
        Ok(())
    }

    async fn post_health_data(&self, dto: &HealthDataDTO) -> ApiResult<()> {
        let mut uploads = self.uploads.lock().unwrap();
        let call_index = uploads.len() + 1;
        if self.fail_upload_at == Some(call_index) {
            return Err(ApiError::Unauthorized);
        }
        uploads.push(dto.clone());
        Ok(())
    }

    async fn fetch_user_profile(&self, _user_id: i64) -> ApiResult<UserProfile> {
        if self.fail_profile_fetch {
            return Err(ApiError::ServerError("profile fetch down".to_owned()));
        }
        Ok(self.profile.clone())
    }

    async fn run_aggregate(&self, _user_id: i64, date: NaiveDate) -> ApiResult<DailySummary> {
        self.aggregate_days.lock().unwrap().push(date);
        Ok(DailySummary::default())
    }

    async fn fetch_recommendations(&self) -> ApiResult<Vec<HealthRecommendation>> {
        if self.fail_recommendations_fetch {
            return Err(ApiError::ServerError("feed down".to_owned()));
        }
        Ok(self.recommendations.clone())
    }

    async fn fetch_trends(&self, _user_id: i64, _days: u32) -> ApiResult<Vec<DailySummary>> {
        Ok(Vec::new())
    }

    async fn trigger_weekly_summary(&self, _user_id: i64, week_end: NaiveDate) -> ApiResult<()> {
        self.weekly_requests.lock().unwrap().push(week_end);
        Ok(())
    }
}
