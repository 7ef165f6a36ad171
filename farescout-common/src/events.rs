//! Coordinator event types and the EventBus
//!
//! Events are the coordinator's outbound side-channel: badge updates for the
//! badge display, dump requests for a session's producer, and clear notices.
//! They are broadcast in-process and streamed to out-of-process
//! collaborators over SSE.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::protocol::SessionId;

/// FareScout coordinator events
///
/// Every event is scoped to exactly one session. Fields go over the wire
/// in camelCase like the rest of the protocol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ScoutEvent {
    /// Session badge changed
    ///
    /// Emitted on every record append and every clear, even when the text
    /// did not change.
    #[serde(rename_all = "camelCase")]
    BadgeUpdated {
        session_id: SessionId,
        /// Decimal record count, or empty when the session has no records
        text: String,
        /// Badge background color (fixed)
        color: String,
        timestamp: DateTime<Utc>,
    },

    /// Producer should push every payload it can currently observe
    ///
    /// Delivered to the producer as `REQUEST_PAYLOADS_DUMP`. Fire-and-forget:
    /// nothing waits for an acknowledgement.
    #[serde(rename_all = "camelCase")]
    PayloadsDumpRequested {
        session_id: SessionId,
        /// Correlates the dump with the collection request that caused it
        request_id: Uuid,
        timestamp: DateTime<Utc>,
    },

    /// Session caches were emptied (navigation or explicit clear)
    #[serde(rename_all = "camelCase")]
    SessionCleared {
        session_id: SessionId,
        timestamp: DateTime<Utc>,
    },
}

impl ScoutEvent {
    /// Session this event belongs to
    pub fn session_id(&self) -> &SessionId {
        match self {
            ScoutEvent::BadgeUpdated { session_id, .. }
            | ScoutEvent::PayloadsDumpRequested { session_id, .. }
            | ScoutEvent::SessionCleared { session_id, .. } => session_id,
        }
    }

    /// Event name used on the SSE wire
    pub fn event_name(&self) -> &'static str {
        match self {
            ScoutEvent::BadgeUpdated { .. } => "BadgeUpdated",
            ScoutEvent::PayloadsDumpRequested { .. } => "REQUEST_PAYLOADS_DUMP",
            ScoutEvent::SessionCleared { .. } => "SessionCleared",
        }
    }
}

/// Central event distribution bus
///
/// Uses tokio::broadcast internally, so publishing never blocks and slow
/// subscribers observe `Lagged` rather than stalling the coordinator.
///
/// # Examples
///
/// ```
/// use farescout_common::events::{EventBus, ScoutEvent};
/// use farescout_common::SessionId;
///
/// let bus = EventBus::new(16);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(ScoutEvent::SessionCleared {
///     session_id: SessionId::from("tab-1"),
///     timestamp: chrono::Utc::now(),
/// });
///
/// assert!(rx.try_recv().is_ok());
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<ScoutEvent>,
}

impl EventBus {
    /// Creates a new EventBus buffering up to `capacity` events per subscriber
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<ScoutEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: ScoutEvent,
    ) -> Result<usize, broadcast::error::SendError<ScoutEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    pub fn emit_lossy(&self, event: ScoutEvent) {
        let _ = self.tx.send(event);
    }
}
