// src/ingest/mod.rs
//! Ingestion boundary: decoded comments in, validated [`Event`]s out.
//!
//! Events with a negative or non-finite timestamp are rejected here and never
//! reach the analysis core.

pub mod danmaku;

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use chrono::{DateTime, Utc};
use metrics::counter;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{info, warn};

use crate::error::AnalysisError;
use crate::event::{Event, MAX_TIMESTAMP_SECS};
use crate::telemetry::{ensure_metrics_described, EVENTS_REJECTED};

pub use danmaku::{parse_danmaku_xml, Barrage};

/// Collapse whitespace runs and trim.
pub fn normalize_text(s: &str) -> String {
    static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("whitespace regex"));
    RE_WS.replace_all(s, " ").trim().to_string()
}

/// Check one event's timestamp.
pub fn validate_event(index: usize, ev: &Event) -> Result<(), AnalysisError> {
    if !ev.timestamp.is_finite() {
        return Err(AnalysisError::MalformedEvent {
            index,
            reason: "timestamp is not finite".into(),
        });
    }
    if ev.timestamp < 0.0 {
        return Err(AnalysisError::MalformedEvent {
            index,
            reason: format!("negative timestamp {}", ev.timestamp),
        });
    }
    if ev.timestamp > MAX_TIMESTAMP_SECS {
        return Err(AnalysisError::MalformedEvent {
            index,
            reason: format!("timestamp {} beyond {MAX_TIMESTAMP_SECS}s", ev.timestamp),
        });
    }
    Ok(())
}

/// Validated events plus the reasons for each rejection.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub events: Vec<Event>,
    /// Wall-clock send time per kept event, aligned with `events`. Always
    /// `None` for sources without a real time axis (JSON).
    pub sent_at: Vec<Option<DateTime<Utc>>>,
    pub rejected: Vec<AnalysisError>,
}

/// Keep events with valid timestamps, preserving input order.
pub fn validate_events(raw: Vec<Event>) -> Ingested {
    validate_timed(raw.into_iter().map(|ev| (ev, None)))
}

fn validate_timed<I>(raw: I) -> Ingested
where
    I: IntoIterator<Item = (Event, Option<DateTime<Utc>>)>,
{
    ensure_metrics_described();

    let mut out = Ingested::default();
    for (i, (ev, sent_at)) in raw.into_iter().enumerate() {
        match validate_event(i, &ev) {
            Ok(()) => {
                out.events.push(ev);
                out.sent_at.push(sent_at);
            }
            Err(e) => {
                warn!(error = %e, "event rejected at ingestion");
                out.rejected.push(e);
            }
        }
    }
    counter!(EVENTS_REJECTED).increment(out.rejected.len() as u64);
    out
}

/// Parse a JSON array of `{ "timestamp": f64, "text": str }`.
pub fn parse_events_json(s: &str) -> Result<Vec<Event>> {
    let mut v: Vec<Event> = serde_json::from_str(s).context("parsing events json")?;
    for ev in &mut v {
        ev.text = normalize_text(&ev.text);
    }
    Ok(v)
}

/// Load events from a `.xml` danmaku document or a `.json` event array.
pub fn load_events(path: &Path) -> Result<Ingested> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading events from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    let ingested = match ext.as_str() {
        "xml" => validate_timed(
            parse_danmaku_xml(&content)?
                .into_iter()
                .map(|b| (b.to_event(), b.sent_at)),
        ),
        "json" => validate_events(parse_events_json(&content)?),
        other => return Err(anyhow!("unsupported events format `{other}` (expected xml or json)")),
    };

    info!(
        path = %path.display(),
        kept = ingested.events.len(),
        rejected = ingested.rejected.len(),
        "events loaded"
    );
    Ok(ingested)
}
