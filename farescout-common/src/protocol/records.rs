//! Structured flight-offer records

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A parsed flight offer
///
/// `code`, `origin_airport`, `destination_airport` and `departure_time`
/// identify the offer; the remaining fields describe it. Fields the
/// coordinator does not know about are carried through untouched in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredRecord {
    /// Flight number / carrier code (e.g. "UA1")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin_airport: Option<String>,

    #[serde(default, rename = "destAirport", skip_serializing_if = "Option::is_none")]
    pub destination_airport: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub departure_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arrival_time: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub airline: Option<String>,

    /// Pages report this as a number or a formatted string ("$512")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    /// Total travel time as reported by the page (free-form, e.g. "7h 05m")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// A count or a label such as "nonstop"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stops: Option<Value>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl StructuredRecord {
    /// Build a record from its identifying fields only
    pub fn flight(
        code: impl Into<String>,
        origin_airport: impl Into<String>,
        destination_airport: impl Into<String>,
        departure_time: impl Into<String>,
    ) -> Self {
        Self {
            code: Some(code.into()),
            origin_airport: Some(origin_airport.into()),
            destination_airport: Some(destination_airport.into()),
            departure_time: Some(departure_time.into()),
            ..Default::default()
        }
    }
}
