//! Wire types for the remote transaction source

use serde::{Deserialize, Serialize};

/// Response envelope returned by the transactions endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsEnvelope {
    /// Transaction-like records, unfiltered
    pub events: Vec<Event>,
}

/// One record as returned by the remote source
///
/// Fields beyond the known set are retained verbatim so configured
/// columns can reference them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Record identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Record date; the calendar-date prefix is what gets compared
    pub date: String,
    /// Amount as a plain JSON number
    pub amount: f64,
    /// Status string (completed, pending, failed, processing)
    pub status: String,
    /// IANA zone id the record belongs to; empty when absent
    #[serde(default)]
    pub timezone: String,
    /// Any additional fields present in the payload
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
