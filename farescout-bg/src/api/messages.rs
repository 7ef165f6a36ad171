//! Message protocol endpoints
//!
//! Consumer messages post to `/api/messages`; producer messages post to
//! `/api/sessions/{id}/messages` so the sender's session is explicit.
//! Replies are the JSON reply body, or 204 for messages that get none.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farescout_common::protocol::{InboundMessage, Reply};
use farescout_common::SessionId;

use crate::router::MessageOrigin;
use crate::AppState;

/// POST /api/messages
pub async fn consumer_message(
    State(state): State<AppState>,
    Json(message): Json<InboundMessage>,
) -> Response {
    let reply = state
        .coordinator
        .router
        .dispatch(MessageOrigin::Consumer, message)
        .await;
    respond(reply)
}

/// POST /api/sessions/:session_id/messages
pub async fn producer_message(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    Json(message): Json<InboundMessage>,
) -> Response {
    let origin = MessageOrigin::Producer(SessionId::from(session_id));
    let reply = state.coordinator.router.dispatch(origin, message).await;
    respond(reply)
}

fn respond(reply: Option<Reply>) -> Response {
    match reply {
        Some(reply) => Json(reply).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}
