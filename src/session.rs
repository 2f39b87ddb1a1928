// ABOUTME: Persistent session store for the backend credential and cached user id
// ABOUTME: File-backed JSON state with atomic writes and an in-memory mode for tests
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Session persistence across launches.
//!
//! The credential and cached user id are the only cross-cutting mutable state
//! in the client. Orchestration code reads them at the start of each step and
//! treats them as read-only inputs; the only writers are the explicit auth
//! flows (login/logout) and [`SessionStore::expire`], the session-teardown
//! path taken when the backend rejects the credential.

use std::fs;
use std::path::PathBuf;
use std::sync::{PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Directory under the platform config dir holding client state.
const APP_DIR: &str = "vita-sync";

/// Session state file name.
const SESSION_FILE: &str = "session.json";

/// Errors from session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No platform config directory and no explicit path given
    #[error("no configuration directory available for session storage")]
    NoConfigDir,

    /// Filesystem failure while reading or writing the state file
    #[error("session file I/O failed")]
    Io(#[from] std::io::Error),

    /// State file exists but does not parse
    #[error("session file is corrupt")]
    Corrupt(#[from] serde_json::Error),
}

/// Persisted shape of the session state file.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
struct SessionState {
    token: Option<String>,
    user_id: Option<i64>,
}

/// Credential store persisted across launches.
///
/// Thread-safe; shared as `Arc<SessionStore>` between the transport client
/// and the orchestrator.
#[derive(Debug)]
pub struct SessionStore {
    path: Option<PathBuf>,
    state: RwLock<SessionState>,
}

impl SessionStore {
    /// Open the store, loading any persisted state.
    ///
    /// With `path == None` the state file lives under the platform config
    /// directory. A missing file is a valid signed-out state; a corrupt file
    /// is an error so the caller can decide whether to discard it.
    ///
    /// # Errors
    ///
    /// Returns an error if no storage path can be resolved, the file cannot
    /// be read, or its contents do not parse.
    pub fn open(path: Option<PathBuf>) -> Result<Self, SessionError> {
        let path = match path {
            Some(explicit) => explicit,
            None => dirs::config_dir()
                .ok_or(SessionError::NoConfigDir)?
                .join(APP_DIR)
                .join(SESSION_FILE),
        };

        let state = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            SessionState::default()
        };

        debug!(path = %path.display(), "session store opened");
        Ok(Self {
            path: Some(path),
            state: RwLock::new(state),
        })
    }

    /// A store that never touches disk, for tests and dry runs.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: RwLock::new(SessionState::default()),
        }
    }

    /// The stored bearer token, if any.
    #[must_use]
    pub fn credential(&self) -> Option<String> {
        self.read().token.clone()
    }

    /// The cached user id, if any.
    #[must_use]
    pub fn user_id(&self) -> Option<i64> {
        self.read().user_id
    }

    /// Whether a credential is present (derived, never stored separately).
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read().token.is_some()
    }

    /// Store a fresh credential and user id after login.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn save_session(&self, token: &str, user_id: Option<i64>) -> Result<(), SessionError> {
        self.write(|state| {
            state.token = Some(token.to_owned());
            if user_id.is_some() {
                state.user_id = user_id;
            }
        })
    }

    /// Drop the credential, keeping the cached user id.
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn delete_credential(&self) -> Result<(), SessionError> {
        self.write(|state| state.token = None)
    }

    /// Drop the credential and cached user id (explicit logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the state file cannot be written.
    pub fn clear(&self) -> Result<(), SessionError> {
        self.write(|state| *state = SessionState::default())
    }

    /// Session teardown: delete the credential, keeping the cached user id.
    ///
    /// Returns whether a credential was actually present, which is the
    /// exactly-once guard for the session-expired signal: concurrent or
    /// repeated 401s find the credential already gone and report `false`.
    /// Persistence failures are logged, not propagated; the in-memory state
    /// is invalidated regardless.
    pub fn expire(&self) -> bool {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if state.token.take().is_none() {
            return false;
        }
        let snapshot = state.clone();
        drop(state);

        if let Err(err) = self.persist(&snapshot) {
            warn!(error = %err, "failed to persist expired session state");
        }
        true
    }

    fn read(&self) -> SessionState {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write(&self, mutate: impl FnOnce(&mut SessionState)) -> Result<(), SessionError> {
        let mut state = self
            .state
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        mutate(&mut state);
        let snapshot = state.clone();
        drop(state);
        self.persist(&snapshot)
    }

    /// Write the state file atomically: temp file in the same directory, then
    /// rename over the old state.
    fn persist(&self, state: &SessionState) -> Result<(), SessionError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(state)?)?;
        fs::rename(&tmp, path)?;
        Ok(())
    }
}
