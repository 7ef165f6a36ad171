//! HTTP API handlers for farescout-bg

pub mod health;
pub mod messages;
pub mod sessions;
pub mod sse;

pub use health::health_routes;
pub use messages::{consumer_message, producer_message};
pub use sessions::{get_session, navigation_started, set_active_session};
pub use sse::session_events;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use farescout_common::Error;
use serde_json::json;

/// Error returned from handlers as `{ "error": message }`
#[derive(Debug)]
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        ApiError(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::InvalidInput(_) | Error::Serialization(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.0.to_string(),
        }));

        (status, body).into_response()
    }
}
