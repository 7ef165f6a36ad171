//! Seams to the collaborators outside the coordinator
//!
//! The badge display and the per-session producer are not in-process; the
//! coordinator only pushes to them. [`EventBusNotifier`] implements both
//! seams by publishing [`ScoutEvent`]s, which the HTTP layer streams out.

use chrono::Utc;
use farescout_common::events::{EventBus, ScoutEvent};
use farescout_common::SessionId;
use tracing::debug;
use uuid::Uuid;

use crate::cache::Badge;

/// Receives badge state for a session after every record append or clear
pub trait BadgeSink: Send + Sync {
    fn push_badge(&self, session: &SessionId, badge: &Badge);

    /// Session caches were just emptied
    fn session_cleared(&self, _session: &SessionId) {}
}

/// Reaches the producer embedded in a session's hosted page
pub trait ProducerLink: Send + Sync {
    /// Ask the producer to report every payload it can currently observe
    ///
    /// Fire-and-forget: replies, if any, arrive later as ordinary
    /// `RAW_PAYLOAD` messages.
    fn request_dump(&self, session: &SessionId, request_id: Uuid);
}

/// Publishes badge updates and dump requests on the EventBus
#[derive(Clone)]
pub struct EventBusNotifier {
    events: EventBus,
}

impl EventBusNotifier {
    pub fn new(events: EventBus) -> Self {
        Self { events }
    }
}

impl BadgeSink for EventBusNotifier {
    fn push_badge(&self, session: &SessionId, badge: &Badge) {
        debug!(session = %session, text = %badge.text, "Badge push");
        self.events.emit_lossy(ScoutEvent::BadgeUpdated {
            session_id: session.clone(),
            text: badge.text.clone(),
            color: badge.color.to_string(),
            timestamp: Utc::now(),
        });
    }

    fn session_cleared(&self, session: &SessionId) {
        self.events.emit_lossy(ScoutEvent::SessionCleared {
            session_id: session.clone(),
            timestamp: Utc::now(),
        });
    }
}

impl ProducerLink for EventBusNotifier {
    fn request_dump(&self, session: &SessionId, request_id: Uuid) {
        if let Err(e) = self.events.emit(ScoutEvent::PayloadsDumpRequested {
            session_id: session.clone(),
            request_id,
            timestamp: Utc::now(),
        }) {
            // No producer connected; the collection window still runs
            debug!(session = %session, "Dump request had no listeners: {}", e);
        }
    }
}
