//! Recording collaborators for unit tests

use farescout_common::SessionId;
use std::sync::Mutex;
use uuid::Uuid;

use crate::cache::Badge;
use crate::collaborators::{BadgeSink, ProducerLink};

#[derive(Default)]
pub struct RecordingBadgeSink {
    pushes: Mutex<Vec<(SessionId, Badge)>>,
    cleared: Mutex<Vec<SessionId>>,
}

impl RecordingBadgeSink {
    pub fn pushes(&self) -> Vec<(SessionId, Badge)> {
        self.pushes.lock().unwrap().clone()
    }

    pub fn last_for(&self, session: &SessionId) -> Option<Badge> {
        self.pushes
            .lock()
            .unwrap()
            .iter()
            .rev()
            .find(|(id, _)| id == session)
            .map(|(_, badge)| badge.clone())
    }

    pub fn cleared(&self) -> Vec<SessionId> {
        self.cleared.lock().unwrap().clone()
    }
}

impl BadgeSink for RecordingBadgeSink {
    fn push_badge(&self, session: &SessionId, badge: &Badge) {
        self.pushes
            .lock()
            .unwrap()
            .push((session.clone(), badge.clone()));
    }

    fn session_cleared(&self, session: &SessionId) {
        self.cleared.lock().unwrap().push(session.clone());
    }
}

#[derive(Default)]
pub struct RecordingProducer {
    requests: Mutex<Vec<(SessionId, Uuid)>>,
}

impl RecordingProducer {
    pub fn requested_sessions(&self) -> Vec<SessionId> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }
}

impl ProducerLink for RecordingProducer {
    fn request_dump(&self, session: &SessionId, request_id: Uuid) {
        self.requests
            .lock()
            .unwrap()
            .push((session.clone(), request_id));
    }
}
