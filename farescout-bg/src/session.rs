//! Active session resolution
//!
//! Consumer messages carry no session of their own; they apply to whichever
//! session the host reports as focused.

use async_trait::async_trait;
use farescout_common::SessionId;
use tokio::sync::RwLock;
use tracing::debug;

/// Looks up the currently active session
#[async_trait]
pub trait ActiveSessionResolver: Send + Sync {
    /// `None` when no session is active; callers answer with empty defaults
    async fn active_session(&self) -> Option<SessionId>;
}

/// Tracks the focused session as reported by the host runtime
#[derive(Debug, Default)]
pub struct FocusTracker {
    active: RwLock<Option<SessionId>>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn activate(&self, session: SessionId) {
        debug!(session = %session, "Session activated");
        *self.active.write().await = Some(session);
    }

    pub async fn deactivate(&self) {
        debug!("No active session");
        *self.active.write().await = None;
    }
}

#[async_trait]
impl ActiveSessionResolver for FocusTracker {
    async fn active_session(&self) -> Option<SessionId> {
        self.active.read().await.clone()
    }
}
