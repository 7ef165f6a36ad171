//! Inbound messages and their replies

use serde::{Deserialize, Serialize};

use super::{CredentialState, RawPayloadEntry, StructuredRecord};

/// Messages accepted by the coordinator
///
/// Producer-originated kinds (`RAW_PAYLOAD`, `FLIGHTS_DETECTED`) apply to the
/// sender's own session. Consumer-originated kinds apply to whichever session
/// is active at handling time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InboundMessage {
    /// Intercepted network response from the hosted page
    RawPayload { url: String, payload: String },

    /// Records extracted by the producer
    FlightsDetected {
        #[serde(default, alias = "flights")]
        records: Vec<StructuredRecord>,
    },

    /// Payloads for the active session, collected on demand if none are cached
    GetRawPayloads,

    /// Records cached for the active session
    GetFlights,

    /// Records produced by the consumer (e.g. after remote extraction)
    StoreFlights {
        #[serde(default, alias = "flights")]
        records: Vec<StructuredRecord>,
    },

    /// Drop everything cached for the active session
    ClearFlights,

    GetAuth,

    /// Update stored credentials; absent fields are left unchanged
    SetAuth {
        #[serde(default, rename = "accessToken")]
        access_token: Option<String>,
        #[serde(default, rename = "refreshToken")]
        refresh_token: Option<String>,
        #[serde(default, rename = "userEmail")]
        user_email: Option<String>,
    },

    ClearAuth,

    /// Any kind this coordinator does not handle
    #[serde(other)]
    Unknown,
}

impl InboundMessage {
    /// Wire name of the message kind, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            InboundMessage::RawPayload { .. } => "RAW_PAYLOAD",
            InboundMessage::FlightsDetected { .. } => "FLIGHTS_DETECTED",
            InboundMessage::GetRawPayloads => "GET_RAW_PAYLOADS",
            InboundMessage::GetFlights => "GET_FLIGHTS",
            InboundMessage::StoreFlights { .. } => "STORE_FLIGHTS",
            InboundMessage::ClearFlights => "CLEAR_FLIGHTS",
            InboundMessage::GetAuth => "GET_AUTH",
            InboundMessage::SetAuth { .. } => "SET_AUTH",
            InboundMessage::ClearAuth => "CLEAR_AUTH",
            InboundMessage::Unknown => "UNKNOWN",
        }
    }
}

/// Reply bodies sent back to the message sender
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Reply {
    /// Acknowledgement for fire-and-forget kinds
    Ack { success: bool },
    Payloads { payloads: Vec<RawPayloadEntry> },
    Flights { records: Vec<StructuredRecord> },
    Auth(CredentialState),
}

impl Reply {
    pub fn ack() -> Self {
        Reply::Ack { success: true }
    }
}
