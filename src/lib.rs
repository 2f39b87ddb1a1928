// ABOUTME: Main library entry point for the Vita Sync health client
// ABOUTME: Wires transport, session, snapshot capture, and sync orchestration together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

#![deny(unsafe_code)]

//! # Vita Sync
//!
//! Client-side synchronization engine for the Vita health-tracking backend.
//! It reconciles locally captured daily health samples with the server,
//! triggers server-side aggregation and weekly ML summary generation, and
//! produces a deduplicated, correctly ordered recommendation view.
//!
//! ## Architecture
//!
//! - **transport**: authenticated HTTP client for the backend API, behind the
//!   [`transport::HealthApi`] trait so tests can substitute fakes
//! - **session**: file-backed credential store persisted across launches
//! - **snapshot**: device health-data source abstraction plus a synthetic
//!   implementation for development and tests
//! - **sync**: the orchestrator driving the
//!   authorize → capture → upload → profile → backfill → aggregate → display
//!   sequence
//! - **recommend**: pure reconciliation of the server's recommendation feed
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use vita_sync::config::ClientConfig;
//! use vita_sync::session::SessionStore;
//! use vita_sync::snapshot::SyntheticSnapshotProvider;
//! use vita_sync::sync::{SyncConfig, SyncOrchestrator};
//! use vita_sync::transport::ApiClient;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let session = Arc::new(SessionStore::open(config.session_file.clone())?);
//! let api = Arc::new(ApiClient::new(&config, Arc::clone(&session))?);
//! let provider = Arc::new(SyntheticSnapshotProvider::new(42));
//!
//! let orchestrator = SyncOrchestrator::new(api, session, provider, SyncConfig::default());
//! let report = orchestrator.run(None).await;
//! println!("uploaded today: {}", report.today_uploaded);
//! # Ok(())
//! # }
//! ```

/// Runtime configuration loaded from the environment
pub mod config;

/// Cross-component event signaling (session expiry, history sync completion)
pub mod events;

/// Structured logging setup
pub mod logging;

/// Recommendation feed reconciliation (filter, dedup, partition, rank)
pub mod recommend;

/// Persistent session credential store
pub mod session;

/// Device health-data source abstraction
pub mod snapshot;

/// Sync orchestration state machine
pub mod sync;

/// Authenticated HTTP transport for the backend API
pub mod transport;

pub use vita_core::{ApiError, ApiResult};
