// ABOUTME: Environment-based runtime configuration for the Vita Sync client
// ABOUTME: Parses base URL, HTTP timeouts, session file path, and sync pacing knobs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Environment-based configuration.
//!
//! Everything the client needs at runtime comes from environment variables,
//! validated up front with precise messages so a misconfigured deployment
//! fails at startup rather than mid-sync.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use url::Url;

/// Default HTTP request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default connection timeout in seconds
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Runtime configuration for the transport client and sync orchestrator.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the backend API (`VITA_API_BASE_URL`, required)
    pub base_url: Url,
    /// Per-request timeout (`VITA_HTTP_TIMEOUT_SECS`)
    pub timeout: Duration,
    /// Connection-establishment timeout (`VITA_HTTP_CONNECT_TIMEOUT_SECS`)
    pub connect_timeout: Duration,
    /// Session state file (`VITA_SESSION_FILE`); platform config dir when unset
    pub session_file: Option<PathBuf>,
    /// Trailing backfill window in days (`VITA_BACKFILL_DAYS`)
    pub backfill_days: u32,
    /// Inter-request pacing during backfill (`VITA_PACING_MS`)
    pub pacing: Duration,
    /// Grace period after backfill before requesting aggregation
    /// (`VITA_INGEST_GRACE_SECS`)
    pub ingest_grace: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `VITA_API_BASE_URL` is missing or not a valid URL,
    /// or if any numeric override fails to parse.
    pub fn from_env() -> Result<Self> {
        let base_url = env::var("VITA_API_BASE_URL")
            .context("VITA_API_BASE_URL must be set to the backend base URL")?;
        let base_url = Url::parse(&base_url)
            .with_context(|| format!("VITA_API_BASE_URL is not a valid URL: {base_url}"))?;

        let timeout = Duration::from_secs(parse_env_or(
            "VITA_HTTP_TIMEOUT_SECS",
            DEFAULT_TIMEOUT_SECS,
        )?);
        let connect_timeout = Duration::from_secs(parse_env_or(
            "VITA_HTTP_CONNECT_TIMEOUT_SECS",
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?);

        let session_file = env::var("VITA_SESSION_FILE").ok().map(PathBuf::from);

        let backfill_days = parse_env_or("VITA_BACKFILL_DAYS", crate::sync::DEFAULT_BACKFILL_DAYS)?;
        let pacing = Duration::from_millis(parse_env_or(
            "VITA_PACING_MS",
            crate::sync::DEFAULT_PACING_MS,
        )?);
        let ingest_grace = Duration::from_secs(parse_env_or(
            "VITA_INGEST_GRACE_SECS",
            crate::sync::DEFAULT_INGEST_GRACE_SECS,
        )?);

        Ok(Self {
            base_url,
            timeout,
            connect_timeout,
            session_file,
            backfill_days,
            pacing,
            ingest_grace,
        })
    }

    /// Sync settings derived from this configuration.
    #[must_use]
    pub fn sync_config(&self) -> crate::sync::SyncConfig {
        crate::sync::SyncConfig {
            backfill_days: self.backfill_days,
            pacing: self.pacing,
            ingest_grace: self.ingest_grace,
            ..crate::sync::SyncConfig::default()
        }
    }
}

/// Parse an optional environment variable, falling back to a default.
fn parse_env_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .with_context(|| format!("{key} is not a valid value: {raw}")),
        Err(_) => Ok(default),
    }
}
