//! Record identity and batch deduplication
//!
//! Pure functions, no I/O.

use farescout_common::StructuredRecord;
use std::collections::HashSet;

/// Stable identity key for a record
///
/// `code|origin|destination|departure`, each absent field contributing an
/// empty segment. The segment count never changes, so records missing
/// different fields still compare by the fields they do have.
pub fn identity_key(record: &StructuredRecord) -> String {
    [
        record.code.as_deref(),
        record.origin_airport.as_deref(),
        record.destination_airport.as_deref(),
        record.departure_time.as_deref(),
    ]
    .iter()
    .map(|field| field.unwrap_or(""))
    .collect::<Vec<_>>()
    .join("|")
}

/// Candidates whose identity key is not in `existing`, in input order
///
/// A key repeated within `candidates` survives only at its first occurrence.
pub fn filter_new<I>(existing: &HashSet<String>, candidates: I) -> Vec<StructuredRecord>
where
    I: IntoIterator<Item = StructuredRecord>,
{
    let mut seen: HashSet<String> = HashSet::new();

    candidates
        .into_iter()
        .filter(|record| {
            let key = identity_key(record);
            !existing.contains(&key) && seen.insert(key)
        })
        .collect()
}
