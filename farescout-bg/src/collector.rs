//! Collect-or-wait payload protocol
//!
//! A request for the active session's payloads is answered from cache when
//! the cache is non-empty. Otherwise the session's producer is asked to dump
//! what it can see, and the answer is whatever the cache holds once the
//! collection window closes. Payloads arriving after that stay cached for
//! the next request.
//!
//! Requests are not coalesced: overlapping requests for one session each
//! dispatch their own dump and run their own window. A window is neither
//! cancelled nor extended, so a navigation clear landing inside it yields an
//! empty answer.

use farescout_common::{RawPayloadEntry, SessionId};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::SessionStateStore;
use crate::collaborators::ProducerLink;
use crate::session::ActiveSessionResolver;
use crate::timer::Timer;

/// Time between dispatching a dump request and answering
pub const COLLECT_WINDOW: Duration = Duration::from_millis(300);

/// Outcome of a payload request
#[derive(Debug)]
pub enum PayloadReply {
    /// Answered without waiting
    Ready(Vec<RawPayloadEntry>),
    /// Answer arrives when the collection window closes
    Pending(oneshot::Receiver<Vec<RawPayloadEntry>>),
}

impl PayloadReply {
    pub fn is_ready(&self) -> bool {
        matches!(self, PayloadReply::Ready(_))
    }

    /// Wait for the answer
    pub async fn resolve(self) -> Vec<RawPayloadEntry> {
        match self {
            PayloadReply::Ready(payloads) => payloads,
            PayloadReply::Pending(rx) => rx.await.unwrap_or_else(|_| {
                warn!("Collection window task dropped before answering");
                Vec::new()
            }),
        }
    }
}

pub struct PayloadCollector {
    store: Arc<SessionStateStore>,
    producer: Arc<dyn ProducerLink>,
    timer: Arc<dyn Timer>,
}

impl PayloadCollector {
    pub fn new(
        store: Arc<SessionStateStore>,
        producer: Arc<dyn ProducerLink>,
        timer: Arc<dyn Timer>,
    ) -> Self {
        Self {
            store,
            producer,
            timer,
        }
    }

    /// Payloads for whichever session `resolver` reports as active
    ///
    /// No active session answers an empty list immediately.
    pub async fn request_payloads(&self, resolver: &dyn ActiveSessionResolver) -> PayloadReply {
        match resolver.active_session().await {
            Some(session) => self.request_for_session(session).await,
            None => {
                debug!("Payload request with no active session");
                PayloadReply::Ready(Vec::new())
            }
        }
    }

    /// Payloads for `session`: cached ones now, or collected ones after the window
    pub async fn request_for_session(&self, session: SessionId) -> PayloadReply {
        let cached = self.store.raw_payloads(&session).await;
        if !cached.is_empty() {
            debug!(session = %session, count = cached.len(), "Serving cached payloads");
            return PayloadReply::Ready(cached);
        }

        let request_id = Uuid::new_v4();
        debug!(session = %session, %request_id, "Cache empty, requesting payload dump");
        self.producer.request_dump(&session, request_id);

        let (tx, rx) = oneshot::channel();
        let store = Arc::clone(&self.store);
        let timer = Arc::clone(&self.timer);
        tokio::spawn(async move {
            timer.sleep(COLLECT_WINDOW).await;
            let payloads = store.raw_payloads(&session).await;
            debug!(
                session = %session,
                %request_id,
                count = payloads.len(),
                "Collection window closed"
            );
            // Receiver may have gone away; nothing to do then
            let _ = tx.send(payloads);
        });

        PayloadReply::Pending(rx)
    }
}
