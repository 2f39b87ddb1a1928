// ABOUTME: Authenticated HTTP transport for the Vita backend API
// ABOUTME: HealthApi trait seam plus the reqwest-backed ApiClient implementation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Backend API transport.
//!
//! The orchestrator and CLI talk to the backend exclusively through the
//! [`HealthApi`] trait; [`ApiClient`] is the production implementation and
//! tests substitute scripted fakes. Every method maps non-2xx statuses to the
//! [`vita_core::ApiError`] taxonomy and nothing else — session teardown on
//! `Unauthorized` is the caller's decision, so a failed login cannot nuke an
//! unrelated stored credential.

mod client;

pub use client::{ApiClient, RetryConfig};

use async_trait::async_trait;
use chrono::NaiveDate;
use vita_core::{
    ApiResult, DailySummary, HealthDataDTO, HealthRecommendation, LoginResponse, ProfileUpdate,
    RegisterRequest, UserProfile,
};

/// The backend API surface consumed by the sync engine and CLI.
///
/// # Thread Safety
///
/// Implementations must be `Send + Sync`; the orchestrator holds the client
/// across suspension points and the display fetch issues two calls
/// concurrently.
#[async_trait]
pub trait HealthApi: Send + Sync {
    /// Exchange credentials for a bearer token. Fails with
    /// [`vita_core::ApiError::Unauthorized`] on bad credentials.
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse>;

    /// Create a new account.
    async fn register(&self, request: &RegisterRequest) -> ApiResult<()>;

    /// Start the password-reset flow for an email address.
    async fn request_password_reset(&self, email: &str) -> ApiResult<()>;

    /// Complete a password reset with the emailed token.
    async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<()>;

    /// Push demographic fields with partial-update semantics: fields absent
    /// from `update` keep their server-side values.
    async fn sync_user_profile(&self, user_id: i64, update: &ProfileUpdate) -> ApiResult<()>;

    /// Upload one day's health sample. Idempotency of duplicate
    /// timestamp/source pairs is the server's concern.
    async fn post_health_data(&self, dto: &HealthDataDTO) -> ApiResult<()>;

    /// Fetch the server-authoritative profile.
    async fn fetch_user_profile(&self, user_id: i64) -> ApiResult<UserProfile>;

    /// Request server-side recomputation of one day's aggregate.
    async fn run_aggregate(&self, user_id: i64, date: NaiveDate) -> ApiResult<DailySummary>;

    /// Fetch the recommendation feed. Returns rows for *all* visible users;
    /// client-side filtering by user id is mandatory.
    async fn fetch_recommendations(&self) -> ApiResult<Vec<HealthRecommendation>>;

    /// Fetch recent daily aggregates for the trends view.
    async fn fetch_trends(&self, user_id: i64, days: u32) -> ApiResult<Vec<DailySummary>>;

    /// Force weekly-summary generation for the week ending on `week_end`.
    async fn trigger_weekly_summary(&self, user_id: i64, week_end: NaiveDate) -> ApiResult<()>;
}
