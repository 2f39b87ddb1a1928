// ABOUTME: Authentication wire payloads for login, registration, and password reset
// ABOUTME: Request/response bodies exchanged with the backend's auth endpoints
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use serde::{Deserialize, Serialize};

/// Body for `POST /auth/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    /// Account email
    pub email: String,
    /// Plain-text password (TLS-protected in transit)
    pub password: String,
}

/// Response from `POST /auth/login`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token for subsequent authenticated requests
    pub token: String,
    /// Stable user identifier to cache alongside the credential
    #[serde(default)]
    pub user_id: Option<i64>,
    /// Echo of the account email
    #[serde(default)]
    pub email: Option<String>,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    /// Given name
    pub name: String,
    /// Family name
    pub surname: String,
    /// Account email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

/// Body for `POST /password/request-reset`.
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetRequest {
    /// Account email to send the reset token to
    pub email: String,
}

/// Body for `POST /password/reset`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordReset {
    /// One-time reset token from the email link
    pub token: String,
    /// Replacement password
    pub new_password: String,
}
