// src/event.rs
use serde::{Deserialize, Serialize};

/// Largest accepted timestamp, in seconds. Anything later cannot be a playback
/// offset and is rejected at ingestion.
pub const MAX_TIMESTAMP_SECS: f64 = u32::MAX as f64;

/// One timed comment: playback offset in seconds plus its text.
///
/// Timestamps are validated at the ingestion boundary (see
/// [`crate::ingest::validate_events`]); the core assumes `timestamp` is finite
/// and within `[0, MAX_TIMESTAMP_SECS]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: f64,
    pub text: String,
}

impl Event {
    pub fn new(timestamp: f64, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    /// Timestamp rounded to whole seconds, half to even (`30.5` → 30,
    /// `15.5` → 16).
    #[inline]
    pub fn rounded_second(&self) -> u64 {
        self.timestamp.round_ties_even().max(0.0) as u64
    }

    /// True when the timestamp is finite and inside the accepted range.
    #[inline]
    pub fn has_valid_timestamp(&self) -> bool {
        self.timestamp.is_finite() && (0.0..=MAX_TIMESTAMP_SECS).contains(&self.timestamp)
    }
}
