// ABOUTME: API error taxonomy for the Vita backend transport client
// ABOUTME: Maps HTTP status codes and transport failures to typed, user-presentable errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

use thiserror::Error;

/// Result type alias for all backend API operations
pub type ApiResult<T> = Result<T, ApiError>;

/// Errors surfaced by the transport client to every caller.
///
/// Protocol failures map 1:1 from HTTP status codes (see [`ApiError::from_status`]).
/// `Unauthorized` is the only variant treated as fatal by the sync orchestrator:
/// it triggers global session teardown. `Forbidden` deliberately does not.
#[derive(Debug, Error)]
pub enum ApiError {
    /// 400 with the server's complaint, when it sent one
    #[error("bad request: {0}")]
    BadRequest(String),

    /// 401 - missing, expired, or rejected credential
    #[error("unauthorized")]
    Unauthorized,

    /// 403 - authenticated but not allowed
    #[error("forbidden")]
    Forbidden,

    /// 404
    #[error("resource not found")]
    NotFound,

    /// 5xx (and any unmapped status) with the raw response body
    #[error("server error: {0}")]
    ServerError(String),

    /// Response body did not match the expected shape
    #[error("failed to decode response body")]
    Decode {
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// Empty body where a payload was required
    #[error("no data in response")]
    NoData,

    /// Connectivity failure before any HTTP status was received
    #[error("transport failure")]
    Transport {
        /// Underlying reqwest error
        #[source]
        source: reqwest::Error,
    },

    /// Anything that does not fit the taxonomy above
    #[error("unknown error: {0}")]
    Unknown(String),
}

impl ApiError {
    /// Map a non-2xx HTTP status (plus the raw body, if any) to a typed error.
    #[must_use]
    pub fn from_status(status: u16, body: Option<String>) -> Self {
        let message = body.unwrap_or_default();
        match status {
            400 => Self::BadRequest(message),
            401 => Self::Unauthorized,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            _ => Self::ServerError(message),
        }
    }

    /// Human-readable message for explicit user actions (login, register,
    /// password reset). Background sync failures are logged, never shown.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::BadRequest(msg) if !msg.is_empty() => msg.clone(),
            Self::BadRequest(_) => "Bad request.".to_owned(),
            Self::Unauthorized => "You are not authorized. Please sign in again.".to_owned(),
            Self::Forbidden => "You do not have permission.".to_owned(),
            Self::NotFound => "Resource not found.".to_owned(),
            Self::ServerError(msg) if !msg.is_empty() => msg.clone(),
            Self::ServerError(_) => "Server error. Please try again later.".to_owned(),
            Self::Decode { .. } => "Failed to process server response.".to_owned(),
            Self::NoData => "No data received from server.".to_owned(),
            Self::Transport { .. } => "Could not reach the server. Check your connection.".to_owned(),
            Self::Unknown(msg) if !msg.is_empty() => msg.clone(),
            Self::Unknown(_) => "An unknown error occurred.".to_owned(),
        }
    }

    /// Whether this error invalidates the stored session credential.
    #[must_use]
    pub const fn is_session_fatal(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(source: reqwest::Error) -> Self {
        Self::Transport { source }
    }
}
