//! Per-session Server-Sent Events
//!
//! The producer listens here for `REQUEST_PAYLOADS_DUMP`; the badge display
//! listens for `BadgeUpdated`.

use axum::{
    extract::{Path, State},
    response::sse::{Event, KeepAlive, Sse},
};
use farescout_common::SessionId;
use futures::stream::{Stream, StreamExt};
use std::convert::Infallible;
use std::time::Duration;
use tokio_stream::wrappers::BroadcastStream;
use tracing::{debug, warn};

use crate::AppState;

/// GET /api/sessions/:session_id/events
pub async fn session_events(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let session = SessionId::from(session_id);
    debug!(session = %session, "SSE client connected");

    let stream = BroadcastStream::new(state.events.subscribe()).filter_map(move |result| {
        let session = session.clone();
        async move {
            match result {
                Ok(event) if event.session_id() == &session => {
                    match serde_json::to_string(&event) {
                        Ok(json) => Some(Ok(Event::default().event(event.event_name()).data(json))),
                        Err(e) => {
                            warn!("Failed to serialize event: {}", e);
                            None
                        }
                    }
                }
                Ok(_) => None,
                Err(e) => {
                    // Lagged subscriber; the next event still gets through
                    warn!(session = %session, "SSE stream error: {:?}", e);
                    None
                }
            }
        }
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
