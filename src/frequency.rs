//! # Frequency Aggregator
//! Event counts per segment and selection of the densest segment.

use serde::Serialize;

use crate::error::{AnalysisError, Result};
use crate::segment::{Segment, SegmentBucket};

/// Number of events that fell into one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SegmentCount {
    pub segment: Segment,
    pub count: usize,
}

/// Counts for every segment of the partition, zeros included, in index order.
pub fn count_per_segment(bucket: &SegmentBucket) -> Vec<SegmentCount> {
    bucket
        .iter()
        .map(|(segment, members)| SegmentCount {
            segment: *segment,
            count: members.len(),
        })
        .collect()
}

/// The segment with the most events. Ties resolve to the lowest index.
pub fn top_segment(counts: &[SegmentCount]) -> Result<Segment> {
    let mut best: Option<&SegmentCount> = None;
    for c in counts {
        match best {
            // strict `>` keeps the first maximum
            Some(b) if c.count <= b.count => {}
            _ => best = Some(c),
        }
    }
    best.map(|c| c.segment)
        .ok_or(AnalysisError::EmptyInput("no segments to select a maximum from"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Event;

    fn bucket(ts: &[f64], width: u32) -> SegmentBucket {
        let events: Vec<Event> = ts.iter().map(|&t| Event::new(t, "x")).collect();
        SegmentBucket::build(&events, width).unwrap()
    }

    #[test]
    fn counts_sum_to_event_total() {
        let ts = [0.0, 3.0, 14.9, 16.0, 31.0, 31.2, 59.0];
        let counts = count_per_segment(&bucket(&ts, 15));
        assert_eq!(counts.iter().map(|c| c.count).sum::<usize>(), ts.len());
        assert_eq!(counts.len(), 4);
    }

    #[test]
    fn empty_segments_report_zero() {
        let counts = count_per_segment(&bucket(&[1.0, 50.0], 10));
        let raw: Vec<usize> = counts.iter().map(|c| c.count).collect();
        assert_eq!(raw, vec![1, 0, 0, 0, 1]);
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let counts = count_per_segment(&bucket(&[1.0, 2.0, 20.0, 40.0, 41.0], 15));
        // segments: 0-15 => 2, 16-30 => 1, 31-45 => 2
        assert_eq!(top_segment(&counts).unwrap().index, 0);
    }

    #[test]
    fn top_of_nothing_is_empty_input() {
        let err = top_segment(&[]).unwrap_err();
        assert!(matches!(err, AnalysisError::EmptyInput(_)));
    }
}
