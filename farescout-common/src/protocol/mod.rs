//! Wire protocol shared between the coordinator and its collaborators
//!
//! The producer (content script embedded in a hosted page) reports raw
//! payloads and detected records; the consumer (popup UI) queries them back.
//! Every message is a JSON object discriminated by its `type` field.

mod credentials;
mod messages;
mod records;

pub use credentials::CredentialState;
pub use messages::{InboundMessage, Reply};
pub use records::StructuredRecord;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for one hosted-page session (one open tab)
///
/// Cache partition key. The coordinator never interprets the contents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for SessionId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// One intercepted network response body, tied to the URL that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPayloadEntry {
    /// URL of the intercepted response (dedup key within a session)
    #[serde(rename = "url")]
    pub source_url: String,
    /// Response body, verbatim
    pub payload: String,
}

impl RawPayloadEntry {
    pub fn new(source_url: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            payload: payload.into(),
        }
    }
}
