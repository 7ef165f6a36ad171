//! Message dispatch
//!
//! Resolves which session a message applies to and forwards it. Producer
//! messages apply to the sender's session; consumer messages apply to the
//! active session at handling time, which is resolved inside `route` for
//! every kind. Sync kinds are applied before `route` returns; async kinds
//! return a future that produces the reply later.

use farescout_common::protocol::{CredentialState, InboundMessage, Reply};
use farescout_common::{RawPayloadEntry, SessionId, StructuredRecord};
use futures::future::{BoxFuture, FutureExt};
use std::sync::Arc;
use tracing::debug;

use crate::cache::SessionStateStore;
use crate::collector::PayloadCollector;
use crate::credentials::CredentialService;
use crate::session::ActiveSessionResolver;

/// Who sent a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageOrigin {
    /// Producer embedded in the given session's page
    Producer(SessionId),
    /// UI consumer; has no session of its own
    Consumer,
}

/// How a routed message is answered
pub enum Routed {
    /// Effect already applied; reply is final
    Sync(Reply),
    /// Reply produced when the future resolves
    Async(BoxFuture<'static, Reply>),
}

impl Routed {
    pub fn is_sync(&self) -> bool {
        matches!(self, Routed::Sync(_))
    }

    pub async fn into_reply(self) -> Reply {
        match self {
            Routed::Sync(reply) => reply,
            Routed::Async(pending) => pending.await,
        }
    }
}

pub struct MessageRouter {
    store: Arc<SessionStateStore>,
    collector: Arc<PayloadCollector>,
    resolver: Arc<dyn ActiveSessionResolver>,
    credentials: Arc<CredentialService>,
}

impl MessageRouter {
    pub fn new(
        store: Arc<SessionStateStore>,
        collector: Arc<PayloadCollector>,
        resolver: Arc<dyn ActiveSessionResolver>,
        credentials: Arc<CredentialService>,
    ) -> Self {
        Self {
            store,
            collector,
            resolver,
            credentials,
        }
    }

    /// Dispatch one message
    ///
    /// Returns `None` for messages that get no reply at all: unknown kinds,
    /// and producer kinds sent without a sender session.
    pub async fn route(&self, origin: MessageOrigin, message: InboundMessage) -> Option<Routed> {
        debug!(kind = message.kind(), ?origin, "Routing message");

        match message {
            InboundMessage::RawPayload { url, payload } => {
                let session = Self::sender_session(&origin)?;
                self.store
                    .append_raw_payload(session, RawPayloadEntry::new(url, payload))
                    .await;
                Some(Routed::Sync(Reply::ack()))
            }

            InboundMessage::FlightsDetected { records } => {
                let session = Self::sender_session(&origin)?;
                self.store.append_records(session, records).await;
                Some(Routed::Sync(Reply::ack()))
            }

            InboundMessage::GetRawPayloads => {
                // Dump dispatch and window start happen here; the future only waits
                let pending = self.collector.request_payloads(self.resolver.as_ref()).await;
                Some(Routed::Async(
                    async move {
                        Reply::Payloads {
                            payloads: pending.resolve().await,
                        }
                    }
                    .boxed(),
                ))
            }

            InboundMessage::GetFlights => {
                let session = self.resolver.active_session().await;
                let store = Arc::clone(&self.store);
                Some(Routed::Async(
                    async move {
                        let records = match session {
                            Some(session) => store.records(&session).await,
                            None => Vec::new(),
                        };
                        Reply::Flights { records }
                    }
                    .boxed(),
                ))
            }

            InboundMessage::StoreFlights { records } => {
                self.store_for_active(records).await;
                Some(Routed::Sync(Reply::ack()))
            }

            InboundMessage::ClearFlights => {
                match self.resolver.active_session().await {
                    Some(session) => self.store.clear(&session).await,
                    None => debug!("CLEAR_FLIGHTS with no active session"),
                }
                Some(Routed::Sync(Reply::ack()))
            }

            InboundMessage::GetAuth => {
                let credentials = Arc::clone(&self.credentials);
                Some(Routed::Async(
                    async move { Reply::Auth(credentials.get().await) }.boxed(),
                ))
            }

            InboundMessage::SetAuth {
                access_token,
                refresh_token,
                user_email,
            } => {
                self.credentials
                    .set(CredentialState {
                        access_token,
                        refresh_token,
                        user_email,
                    })
                    .await;
                Some(Routed::Sync(Reply::ack()))
            }

            InboundMessage::ClearAuth => {
                self.credentials.clear().await;
                Some(Routed::Sync(Reply::ack()))
            }

            InboundMessage::Unknown => {
                debug!("Ignoring unrecognized message kind");
                None
            }
        }
    }

    /// Route and wait for the reply, whichever way it is answered
    pub async fn dispatch(&self, origin: MessageOrigin, message: InboundMessage) -> Option<Reply> {
        match self.route(origin, message).await {
            Some(routed) => Some(routed.into_reply().await),
            None => None,
        }
    }

    fn sender_session(origin: &MessageOrigin) -> Option<&SessionId> {
        match origin {
            MessageOrigin::Producer(session) => Some(session),
            MessageOrigin::Consumer => {
                debug!("Producer message without a sender session ignored");
                None
            }
        }
    }

    async fn store_for_active(&self, records: Vec<StructuredRecord>) {
        match self.resolver.active_session().await {
            Some(session) => {
                self.store.append_records(&session, records).await;
            }
            None => debug!(count = records.len(), "STORE_FLIGHTS with no active session"),
        }
    }
}
