//! Session lifecycle driven by host runtime signals
//!
//! A navigation that starts in a session's main frame empties that session's
//! caches immediately. Pending collection windows are not cancelled: a window
//! that closes after the clear answers from the emptied cache.

use farescout_common::SessionId;
use std::sync::Arc;
use tracing::{debug, info};

use crate::cache::SessionStateStore;
use crate::session::FocusTracker;

/// Frame id the host uses for a page's top-level document
pub const MAIN_FRAME_ID: u64 = 0;

/// Signals emitted by the host runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostSignal {
    /// A navigation began in `session`; `frame_id` is `None` when the host
    /// does not report frames
    NavigationStarted {
        session_id: SessionId,
        frame_id: Option<u64>,
    },
    SessionActivated(SessionId),
    SessionDeactivated,
}

pub struct LifecycleManager {
    store: Arc<SessionStateStore>,
    focus: Arc<FocusTracker>,
}

impl LifecycleManager {
    pub fn new(store: Arc<SessionStateStore>, focus: Arc<FocusTracker>) -> Self {
        Self { store, focus }
    }

    /// Clear `session` unconditionally
    pub async fn on_navigation_started(&self, session: &SessionId) {
        info!(session = %session, "Navigation started, clearing session caches");
        self.store.clear(session).await;
    }

    pub async fn handle_signal(&self, signal: HostSignal) {
        match signal {
            HostSignal::NavigationStarted { session_id, frame_id } => {
                if matches!(frame_id, None | Some(MAIN_FRAME_ID)) {
                    self.on_navigation_started(&session_id).await;
                } else {
                    debug!(session = %session_id, ?frame_id, "Subframe navigation ignored");
                }
            }
            HostSignal::SessionActivated(session_id) => self.focus.activate(session_id).await,
            HostSignal::SessionDeactivated => self.focus.deactivate().await,
        }
    }
}
