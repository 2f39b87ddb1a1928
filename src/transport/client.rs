// ABOUTME: Reqwest-backed implementation of the HealthApi backend contract
// ABOUTME: Bearer-token attachment, status-to-error mapping, and bounded 429 retry
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use vita_core::{
    dates, ApiError, ApiResult, DailySummary, HealthDataDTO, HealthRecommendation, LoginRequest,
    LoginResponse, PasswordReset, PasswordResetRequest, ProfileUpdate, RegisterRequest,
    UserProfile,
};

use super::HealthApi;
use crate::config::ClientConfig;
use crate::session::SessionStore;

/// Retry behavior for rate-limited requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts after a 429
    pub max_retries: u32,
    /// Initial backoff delay, doubled per attempt
    pub initial_backoff: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(1000),
        }
    }
}

/// Authenticated HTTP client for the Vita backend.
///
/// Constructed explicitly with its configuration and an injected
/// [`SessionStore`] for bearer-token attachment — no ambient globals.
/// Authenticated endpoints short-circuit to `Unauthorized` without a network
/// round-trip when no credential is stored.
pub struct ApiClient {
    base_url: Url,
    http: Client,
    session: Arc<SessionStore>,
    retry: RetryConfig,
}

impl ApiClient {
    /// Build a client from runtime configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> ApiResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        Ok(Self {
            base_url: config.base_url.clone(),
            http,
            session,
            retry: RetryConfig::default(),
        })
    }

    /// Override the retry policy.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn bearer_token(&self) -> ApiResult<String> {
        self.session.credential().ok_or(ApiError::Unauthorized)
    }

    /// Send a request, retrying on 429 with exponential backoff.
    async fn execute(&self, request: RequestBuilder) -> ApiResult<Response> {
        let mut attempt = 0;
        loop {
            let cloned = request
                .try_clone()
                .ok_or_else(|| ApiError::Unknown("request body is not replayable".to_owned()))?;
            let response = cloned.send().await?;
            let status = response.status();
            debug!(status = %status, "response received");

            if status != StatusCode::TOO_MANY_REQUESTS {
                return Ok(response);
            }

            attempt += 1;
            if attempt > self.retry.max_retries {
                warn!(
                    attempts = attempt,
                    "rate limit retries exhausted, giving up"
                );
                return Ok(response);
            }
            let backoff = self.retry.initial_backoff * 2_u32.pow(attempt - 1);
            warn!(
                attempt,
                backoff_ms = backoff.as_millis() as u64,
                "rate limited, backing off before retry"
            );
            tokio::time::sleep(backoff).await;
        }
    }

    /// Map a non-success response to the error taxonomy.
    async fn check_status(response: Response) -> ApiResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.ok().filter(|text| !text.is_empty());
        Err(ApiError::from_status(status.as_u16(), body))
    }

    /// Decode a JSON payload, distinguishing "no data" from shape mismatch.
    async fn decode_json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        let body = response.text().await?;
        if body.is_empty() {
            return Err(ApiError::NoData);
        }
        serde_json::from_str(&body).map_err(|source| ApiError::Decode { source })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let token = self.bearer_token()?;
        debug!(path, "GET");
        let response = self
            .execute(self.http.get(self.endpoint(path)).bearer_auth(token))
            .await?;
        Self::decode_json(Self::check_status(response).await?).await
    }

    async fn post_empty(&self, path: &str) -> ApiResult<Response> {
        let token = self.bearer_token()?;
        debug!(path, "POST");
        let response = self
            .execute(self.http.post(self.endpoint(path)).bearer_auth(token))
            .await?;
        Self::check_status(response).await
    }
}

#[async_trait]
impl HealthApi for ApiClient {
    async fn login(&self, email: &str, password: &str) -> ApiResult<LoginResponse> {
        let body = LoginRequest {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let response = self
            .execute(self.http.post(self.endpoint("auth/login")).json(&body))
            .await?;
        Self::decode_json(Self::check_status(response).await?).await
    }

    async fn register(&self, request: &RegisterRequest) -> ApiResult<()> {
        let response = self
            .execute(self.http.post(self.endpoint("auth/register")).json(request))
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> ApiResult<()> {
        let body = PasswordResetRequest {
            email: email.to_owned(),
        };
        let response = self
            .execute(
                self.http
                    .post(self.endpoint("password/request-reset"))
                    .json(&body),
            )
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn reset_password(&self, token: &str, new_password: &str) -> ApiResult<()> {
        let body = PasswordReset {
            token: token.to_owned(),
            new_password: new_password.to_owned(),
        };
        let response = self
            .execute(self.http.post(self.endpoint("password/reset")).json(&body))
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn sync_user_profile(&self, user_id: i64, update: &ProfileUpdate) -> ApiResult<()> {
        let token = self.bearer_token()?;
        let path = format!("users/{user_id}");
        debug!(path, "PUT");
        let response = self
            .execute(
                self.http
                    .put(self.endpoint(&path))
                    .bearer_auth(token)
                    .json(update),
            )
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn post_health_data(&self, dto: &HealthDataDTO) -> ApiResult<()> {
        let token = self.bearer_token()?;
        debug!(timestamp = %dto.timestamp, source = dto.source.as_str(), "POST healthdata");
        let response = self
            .execute(
                self.http
                    .post(self.endpoint("healthdata"))
                    .bearer_auth(token)
                    .json(dto),
            )
            .await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn fetch_user_profile(&self, user_id: i64) -> ApiResult<UserProfile> {
        self.get_json(&format!("users/{user_id}")).await
    }

    async fn run_aggregate(&self, user_id: i64, date: NaiveDate) -> ApiResult<DailySummary> {
        let path = format!("aggregates/run/{user_id}/{}", dates::day_key(date));
        let response = self.post_empty(&path).await?;
        Self::decode_json(response).await
    }

    async fn fetch_recommendations(&self) -> ApiResult<Vec<HealthRecommendation>> {
        self.get_json("recommendations").await
    }

    async fn fetch_trends(&self, user_id: i64, days: u32) -> ApiResult<Vec<DailySummary>> {
        self.get_json(&format!("health-trends?userId={user_id}&days={days}"))
            .await
    }

    async fn trigger_weekly_summary(&self, user_id: i64, week_end: NaiveDate) -> ApiResult<()> {
        let path = format!("ml-test/weekly-fatigue/{user_id}/{}", dates::day_key(week_end));
        self.post_empty(&path).await?;
        Ok(())
    }
}
