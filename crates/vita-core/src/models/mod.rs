// ABOUTME: Domain and wire data models for the Vita Sync client
// ABOUTME: Re-exports snapshot, profile, summary, recommendation, and auth types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! # Data Models
//!
//! Core data structures shared by the transport client and the sync
//! orchestrator. Wire types serialize with `camelCase` field names to match
//! the backend's JSON contract.
//!
//! ## Design Principles
//!
//! - **Optional by default**: the device source may lack permission or data
//!   for any metric, so snapshot fields are individually optional
//! - **Immutable wire types**: DTOs are constructed once and never patched
//! - **Serializable**: every wire type round-trips through JSON

mod auth;
mod profile;
mod recommendation;
mod snapshot;
mod summary;

pub use auth::{
    LoginRequest, LoginResponse, PasswordReset, PasswordResetRequest, RegisterRequest,
};
pub use profile::{ProfileUpdate, UserProfile};
pub use recommendation::{HealthRecommendation, WEEKLY_SUMMARY_SOURCE};
pub use snapshot::{HealthDataDTO, HealthSnapshot, SampleOrigin};
pub use summary::DailySummary;
