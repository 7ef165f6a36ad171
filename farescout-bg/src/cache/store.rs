//! Session state store
//!
//! Owns one [`SessionCache`] per session. Every operation takes the store
//! lock once, so an append, clear or read is atomic with respect to other
//! message handling; multi-step protocols built on top are not.

use farescout_common::{RawPayloadEntry, SessionId, StructuredRecord};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

use super::dedup::{filter_new, identity_key};
use crate::collaborators::BadgeSink;

/// Maximum raw payloads kept per session (oldest evicted first)
pub const RAW_PAYLOAD_CAPACITY: usize = 10;

/// Badge background color
pub const BADGE_COLOR: &str = "#4F46E5";

/// Badge state derived from a session's record count
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    /// Decimal record count, empty when zero
    pub text: String,
    pub color: &'static str,
}

impl Badge {
    pub fn for_count(count: usize) -> Self {
        let text = if count > 0 {
            count.to_string()
        } else {
            String::new()
        };
        Self {
            text,
            color: BADGE_COLOR,
        }
    }
}

/// Point-in-time copy of one session's caches
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    pub raw_payloads: Vec<RawPayloadEntry>,
    pub records: Vec<StructuredRecord>,
    pub badge_count: usize,
}

#[derive(Debug, Default)]
struct SessionCache {
    raw_payloads: VecDeque<RawPayloadEntry>,
    records: Vec<StructuredRecord>,
    /// Identity keys of `records`, kept in step with it
    record_keys: HashSet<String>,
}

impl SessionCache {
    fn badge_count(&self) -> usize {
        self.records.len()
    }

    fn clear(&mut self) {
        self.raw_payloads.clear();
        self.records.clear();
        self.record_keys.clear();
    }
}

/// Bounded per-session caches with a derived badge
pub struct SessionStateStore {
    sessions: RwLock<HashMap<SessionId, SessionCache>>,
    badge_sink: Arc<dyn BadgeSink>,
}

impl SessionStateStore {
    pub fn new(badge_sink: Arc<dyn BadgeSink>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            badge_sink,
        }
    }

    /// Cache a raw payload for `session`
    ///
    /// Ignored when the session already holds a payload from the same URL.
    /// Returns whether the entry was stored.
    pub async fn append_raw_payload(&self, session: &SessionId, entry: RawPayloadEntry) -> bool {
        let mut sessions = self.sessions.write().await;
        let cache = sessions.entry(session.clone()).or_default();

        if cache
            .raw_payloads
            .iter()
            .any(|existing| existing.source_url == entry.source_url)
        {
            debug!(session = %session, url = %entry.source_url, "Duplicate payload URL ignored");
            return false;
        }

        cache.raw_payloads.push_back(entry);
        while cache.raw_payloads.len() > RAW_PAYLOAD_CAPACITY {
            if let Some(evicted) = cache.raw_payloads.pop_front() {
                debug!(session = %session, url = %evicted.source_url, "Evicted oldest payload");
            }
        }
        true
    }

    /// Append records not already known for `session`, then push the badge
    ///
    /// Returns how many records were added.
    pub async fn append_records(&self, session: &SessionId, batch: Vec<StructuredRecord>) -> usize {
        let mut sessions = self.sessions.write().await;
        let cache = sessions.entry(session.clone()).or_default();

        let survivors = filter_new(&cache.record_keys, batch);
        let added = survivors.len();
        for record in survivors {
            cache.record_keys.insert(identity_key(&record));
            cache.records.push(record);
        }

        debug!(session = %session, added, total = cache.badge_count(), "Records appended");
        self.badge_sink
            .push_badge(session, &Badge::for_count(cache.badge_count()));
        added
    }

    /// Cached raw payloads, oldest first; empty for an unknown session
    pub async fn raw_payloads(&self, session: &SessionId) -> Vec<RawPayloadEntry> {
        self.sessions
            .read()
            .await
            .get(session)
            .map(|cache| cache.raw_payloads.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Cached records in arrival order; empty for an unknown session
    pub async fn records(&self, session: &SessionId) -> Vec<StructuredRecord> {
        self.sessions
            .read()
            .await
            .get(session)
            .map(|cache| cache.records.clone())
            .unwrap_or_default()
    }

    pub async fn badge_count(&self, session: &SessionId) -> usize {
        self.sessions
            .read()
            .await
            .get(session)
            .map(SessionCache::badge_count)
            .unwrap_or(0)
    }

    pub async fn snapshot(&self, session: &SessionId) -> SessionSnapshot {
        let sessions = self.sessions.read().await;
        match sessions.get(session) {
            Some(cache) => SessionSnapshot {
                session_id: session.clone(),
                raw_payloads: cache.raw_payloads.iter().cloned().collect(),
                records: cache.records.clone(),
                badge_count: cache.badge_count(),
            },
            None => SessionSnapshot {
                session_id: session.clone(),
                raw_payloads: Vec::new(),
                records: Vec::new(),
                badge_count: 0,
            },
        }
    }

    /// Empty both caches for `session` and push the (empty) badge
    ///
    /// The session entry itself is kept.
    pub async fn clear(&self, session: &SessionId) {
        let mut sessions = self.sessions.write().await;
        sessions.entry(session.clone()).or_default().clear();

        debug!(session = %session, "Session cleared");
        self.badge_sink.push_badge(session, &Badge::for_count(0));
        self.badge_sink.session_cleared(session);
    }
}
