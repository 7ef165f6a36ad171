//! Host runtime signals and session diagnostics

use axum::{
    extract::{Path, State},
    Json,
};
use farescout_common::{Error, SessionId};
use serde::Deserialize;
use serde_json::{json, Value};

use super::ApiError;
use crate::cache::SessionSnapshot;
use crate::lifecycle::HostSignal;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRequest {
    /// Frame the navigation started in; absent means the top-level page
    #[serde(default)]
    pub frame_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveSessionRequest {
    /// Focused session, or null when nothing is focused
    pub session_id: Option<String>,
}

/// POST /api/sessions/:session_id/navigation
pub async fn navigation_started(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    body: Option<Json<NavigationRequest>>,
) -> Json<Value> {
    let frame_id = body.and_then(|Json(request)| request.frame_id);
    state
        .coordinator
        .lifecycle
        .handle_signal(HostSignal::NavigationStarted {
            session_id: SessionId::from(session_id),
            frame_id,
        })
        .await;
    Json(json!({ "success": true }))
}

/// PUT /api/active-session
pub async fn set_active_session(
    State(state): State<AppState>,
    Json(request): Json<ActiveSessionRequest>,
) -> Result<Json<Value>, ApiError> {
    let signal = match request.session_id {
        Some(id) if id.trim().is_empty() => {
            return Err(Error::InvalidInput("sessionId must not be empty".to_string()).into());
        }
        Some(id) => HostSignal::SessionActivated(SessionId::from(id)),
        None => HostSignal::SessionDeactivated,
    };

    state.coordinator.lifecycle.handle_signal(signal).await;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/sessions/:session_id
pub async fn get_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Json<SessionSnapshot> {
    let session = SessionId::from(session_id);
    Json(state.coordinator.store.snapshot(&session).await)
}
