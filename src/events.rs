// ABOUTME: Cross-component event channel replacing implicit global broadcasts
// ABOUTME: ClientEvent enum and a broadcast-based hub for session and sync signals
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 Vita Health

//! Explicit event signaling between the sync engine and interested consumers.
//!
//! Presentation surfaces subscribe to a [`tokio::sync::broadcast`] channel
//! instead of listening on an ambient notification bus; senders are injected
//! where they are needed.

use tokio::sync::broadcast;

/// Buffered events per subscriber before lagging drops the oldest.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Events emitted by the sync engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientEvent {
    /// The stored credential was rejected and has been torn down; every
    /// surface should drop to the signed-out state. Emitted at most once per
    /// stored credential.
    SessionExpired,
    /// The history backfill pass finished; recommendation surfaces should
    /// refetch after the backend's ingestion settles.
    HistorySynced,
}

/// Event hub handing out subscriber handles.
#[derive(Debug)]
pub struct EventHub {
    sender: broadcast::Sender<ClientEvent>,
}

impl Default for EventHub {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHub {
    /// Create a hub with the default buffer capacity.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Subscribe to future events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ClientEvent> {
        self.sender.subscribe()
    }

    /// Emit an event to all current subscribers.
    ///
    /// Delivery is best-effort: with no subscribers the event is dropped,
    /// matching fire-and-forget notification semantics.
    pub fn emit(&self, event: ClientEvent) {
        let _ = self.sender.send(event);
    }
}
