//! Per-session caches
//!
//! [`SessionStateStore`] owns every session's cached payloads and records;
//! [`dedup`] decides which incoming records are new.

pub mod dedup;
pub mod store;

pub use dedup::{filter_new, identity_key};
pub use store::{Badge, SessionSnapshot, SessionStateStore, BADGE_COLOR, RAW_PAYLOAD_CAPACITY};
