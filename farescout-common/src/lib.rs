//! # FareScout Common Library
//!
//! Shared code for the FareScout coordinator and its collaborators:
//! - Wire protocol types (messages, records, payloads, credentials)
//! - Coordinator event types and the EventBus
//! - Configuration loading
//! - Error types

pub mod config;
pub mod error;
pub mod events;
pub mod protocol;

pub use error::{Error, Result};
pub use protocol::{RawPayloadEntry, SessionId, StructuredRecord};
