// ABOUTME: Core types for the Vita Sync health client
// ABOUTME: Foundation crate with domain models, error taxonomy, and date helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

#![deny(unsafe_code)]

//! # Vita Core
//!
//! Foundation crate for the Vita Sync client. Holds the domain models shared
//! between the transport layer and the sync orchestrator, the API error
//! taxonomy, and the date/time conventions agreed with the backend. This crate
//! performs no I/O and is designed to change infrequently.
//!
//! ## Modules
//!
//! - **models**: wire and domain types (`HealthSnapshot`, `HealthDataDTO`,
//!   `UserProfile`, `DailySummary`, `HealthRecommendation`, auth payloads)
//! - **errors**: `ApiError` taxonomy surfaced by the transport client
//! - **dates**: backend date-format contract and ISO-week helpers

/// API error taxonomy shared by the transport client and its callers
pub mod errors;

/// Date formats crossing the client/backend boundary and ISO-week helpers
pub mod dates;

/// Domain and wire data models
pub mod models;

pub use errors::{ApiError, ApiResult};
pub use models::{
    DailySummary, HealthDataDTO, HealthRecommendation, HealthSnapshot, LoginRequest,
    LoginResponse, PasswordReset, PasswordResetRequest, ProfileUpdate, RegisterRequest,
    SampleOrigin, UserProfile,
};
