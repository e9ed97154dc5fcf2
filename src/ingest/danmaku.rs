// src/ingest/danmaku.rs
//! Danmaku comment XML: `<i> ... <d p="time,mode,size,color,sent,pool,user,id">text</d> ... </i>`.
//!
//! Only decoding happens here; downloading the document is the caller's job.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::event::Event;

#[derive(Debug, Deserialize)]
struct Document {
    #[serde(rename = "d", default)]
    comments: Vec<RawComment>,
}

#[derive(Debug, Deserialize)]
struct RawComment {
    #[serde(rename = "@p")]
    p: String,
    #[serde(rename = "$text", default)]
    text: String,
}

/// One decoded comment with both time axes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Barrage {
    /// Seconds into playback. `NaN` when the attribute could not be read, so
    /// the comment is rejected by timestamp validation instead of vanishing.
    pub video_time: f64,
    /// Wall-clock send time, if present and valid.
    pub sent_at: Option<DateTime<Utc>>,
    pub text: String,
}

impl Barrage {
    pub fn to_event(&self) -> Event {
        Event::new(self.video_time, self.text.clone())
    }
}

fn parse_p(p: &str) -> (f64, Option<DateTime<Utc>>) {
    let fields: Vec<&str> = p.split(',').collect();
    let video_time = fields
        .first()
        .and_then(|s| s.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN);
    let sent_at = fields
        .get(4)
        .and_then(|s| s.trim().parse::<i64>().ok())
        .and_then(|secs| DateTime::from_timestamp(secs, 0));
    (video_time, sent_at)
}

/// Decode every `<d>` element of a danmaku document, in document order.
pub fn parse_danmaku_xml(xml: &str) -> Result<Vec<Barrage>> {
    let doc: Document = from_str(xml).context("parsing danmaku xml")?;
    let out: Vec<Barrage> = doc
        .comments
        .into_iter()
        .map(|c| {
            let (video_time, sent_at) = parse_p(&c.p);
            Barrage {
                video_time,
                sent_at,
                text: super::normalize_text(&c.text),
            }
        })
        .collect();
    debug!(comments = out.len(), "danmaku xml decoded");
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<i>
  <chatserver>chat.example.com</chatserver>
  <chatid>375203456</chatid>
  <maxlimit>3000</maxlimit>
  <d p="12.345,1,25,16777215,1700000000,0,abcd1234,1">前方高能</d>
  <d p="0.5,1,25,16777215,1700000100,0,ef567890,2">  hello &amp;   world </d>
  <d p="oops,1,25">broken</d>
</i>"#;

    #[test]
    fn decodes_both_time_axes() {
        let v = parse_danmaku_xml(SAMPLE).unwrap();
        assert_eq!(v.len(), 3);
        assert!((v[0].video_time - 12.345).abs() < 1e-9);
        assert_eq!(v[0].sent_at.unwrap().timestamp(), 1_700_000_000);
        assert_eq!(v[0].text, "前方高能");
        assert_eq!(v[1].text, "hello & world");
    }

    #[test]
    fn unreadable_time_becomes_nan() {
        let v = parse_danmaku_xml(SAMPLE).unwrap();
        assert!(v[2].video_time.is_nan());
        assert!(v[2].sent_at.is_none());
    }

    #[test]
    fn empty_document_is_ok() {
        let v = parse_danmaku_xml("<i><chatid>1</chatid></i>").unwrap();
        assert!(v.is_empty());
    }
}
