//! # Temporal Segmenter
//! Partitions the playback timeline into fixed-width, index-ordered segments
//! and assigns every event to exactly one of them.
//!
//! Boundary rule, applied by every consumer of the partition:
//! - timestamps are rounded to whole seconds, half to even;
//! - segment 0 covers `[0, width]`;
//! - segment `i > 0` covers `[width*i + 1, width*(i+1)]` on rounded seconds,
//!   i.e. right-closed and left-open on the real line.
//!
//! So a timestamp landing exactly on `width*i` belongs to segment `i - 1`.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::error::{AnalysisError, Result};
use crate::event::{Event, MAX_TIMESTAMP_SECS};

/// A contiguous slice of the playback timeline, in whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Segment {
    pub index: usize,
    pub start: u64,
    pub end: u64,
}

impl Segment {
    /// Bounds of segment `index`; `None` when they do not fit in `u64`.
    fn nth(index: usize, width: u32) -> Option<Self> {
        let w = u64::from(width);
        let i = u64::try_from(index).ok()?;
        if index == 0 {
            return Some(Self {
                index,
                start: 0,
                end: w,
            });
        }
        Some(Self {
            index,
            start: w.checked_mul(i)?.checked_add(1)?,
            end: w.checked_mul(i.checked_add(1)?)?,
        })
    }

    /// Inclusive membership test on a rounded second.
    #[inline]
    pub fn contains(&self, second: u64) -> bool {
        self.start <= second && second <= self.end
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

fn check_width(width: u32) -> Result<()> {
    if width == 0 {
        return Err(AnalysisError::config("segment width must be > 0"));
    }
    Ok(())
}

/// Index of the segment owning rounded second `second`.
#[inline]
fn index_for(second: u64, width: u32) -> usize {
    if second == 0 {
        0
    } else {
        ((second - 1) / u64::from(width)) as usize
    }
}

/// Build the ordered segment list for `events`.
///
/// `ceil(max_timestamp / width)` segments are produced; an event set whose
/// timestamps all sit at zero still gets segment 0 so that no event is left
/// unassigned. An empty event set yields no segments.
///
/// Fails with `MalformedEvent` when a timestamp is negative, non-finite or
/// beyond [`MAX_TIMESTAMP_SECS`].
pub fn segment(events: &[Event], width: u32) -> Result<Vec<Segment>> {
    check_width(width)?;
    if events.is_empty() {
        return Ok(Vec::new());
    }

    if let Some((index, ev)) = events
        .iter()
        .enumerate()
        .find(|(_, e)| !e.has_valid_timestamp())
    {
        return Err(AnalysisError::MalformedEvent {
            index,
            reason: format!("timestamp {} outside [0, {MAX_TIMESTAMP_SECS}]", ev.timestamp),
        });
    }

    let max_ts = events
        .iter()
        .map(|e| e.timestamp)
        .fold(0.0_f64, f64::max);
    let n = usize::try_from((max_ts / f64::from(width)).ceil() as u64)
        .map_err(|_| AnalysisError::config("segment count does not fit in memory"))?
        .max(1);

    (0..n)
        .map(|i| {
            Segment::nth(i, width)
                .ok_or_else(|| AnalysisError::config(format!("segment {i} bounds overflow")))
        })
        .collect()
}

/// Events grouped per segment. Built once per run and read-only afterwards.
///
/// Members are stored as indices into the event slice the bucket was built
/// from, in input order.
#[derive(Debug, Clone)]
pub struct SegmentBucket {
    width: u32,
    segments: Vec<Segment>,
    members: Vec<Vec<usize>>,
}

impl SegmentBucket {
    /// Segment `events` with `width` and assign each event to its segment.
    pub fn build(events: &[Event], width: u32) -> Result<Self> {
        let segments = segment(events, width)?;
        let mut members = vec![Vec::new(); segments.len()];

        for (i, ev) in events.iter().enumerate() {
            // The last segment always reaches ceil(max), so the clamp never
            // moves an event in practice; it guards float edge cases only.
            let idx = index_for(ev.rounded_second(), width).min(segments.len() - 1);
            members[idx].push(i);
        }

        debug!(
            width,
            segments = segments.len(),
            events = events.len(),
            "segment bucket built"
        );

        Ok(Self {
            width,
            segments,
            members,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Indices (into the source event slice) of the events in `segment`.
    pub fn members(&self, segment: &Segment) -> &[usize] {
        self.members
            .get(segment.index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Segment index owning event `event_index`, if the event was bucketed.
    pub fn segment_of(&self, event_index: usize) -> Option<usize> {
        self.members
            .iter()
            .position(|m| m.binary_search(&event_index).is_ok())
    }

    /// Events of `segment`, borrowed from `events` (the slice used to build).
    pub fn events_in<'a>(
        &'a self,
        segment: &Segment,
        events: &'a [Event],
    ) -> impl Iterator<Item = &'a Event> + 'a {
        self.members(segment)
            .iter()
            .filter_map(move |&i| events.get(i))
    }

    /// Iterate `(segment, member indices)` in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&Segment, &[usize])> {
        self.segments
            .iter()
            .zip(self.members.iter().map(Vec::as_slice))
    }
}
