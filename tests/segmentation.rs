// tests/segmentation.rs
use barrage_trend_analyzer::{count_per_segment, segment, top_segment, Event, SegmentBucket};

fn events(pairs: &[(f64, &str)]) -> Vec<Event> {
    pairs.iter().map(|&(t, s)| Event::new(t, s)).collect()
}

#[test]
fn scenario_two_segments_top_is_first() {
    let evs = events(&[(0.0, "good good"), (10.0, "bad"), (20.0, "good")]);
    let bucket = SegmentBucket::build(&evs, 15).unwrap();
    let counts = count_per_segment(&bucket);

    let shape: Vec<(String, usize)> = counts
        .iter()
        .map(|c| (c.segment.to_string(), c.count))
        .collect();
    assert_eq!(
        shape,
        vec![("0-15".to_string(), 2), ("16-30".to_string(), 1)]
    );
    assert_eq!(top_segment(&counts).unwrap().index, 0);
}

#[test]
fn partition_is_contiguous_and_complete() {
    // irregular timestamps, including exact multiples of the width
    let ts: Vec<f64> = (0..97).map(|i| (i * i) as f64 % 131.0 + 0.25).collect();
    let mut evs: Vec<Event> = ts.iter().map(|&t| Event::new(t, "x")).collect();
    evs.push(Event::new(30.0, "edge"));
    evs.push(Event::new(45.0, "edge"));

    for width in [1u32, 7, 15, 60, 500] {
        let segs = segment(&evs, width).unwrap();
        assert_eq!(segs[0].start, 0);
        for (i, s) in segs.iter().enumerate() {
            assert_eq!(s.index, i);
        }
        for w in segs.windows(2) {
            assert_eq!(w[0].end + 1, w[1].start);
        }

        let bucket = SegmentBucket::build(&evs, width).unwrap();
        let total: usize = count_per_segment(&bucket).iter().map(|c| c.count).sum();
        assert_eq!(total, evs.len(), "width {width}");

        for i in 0..evs.len() {
            let owners = bucket
                .iter()
                .filter(|(_, members)| members.contains(&i))
                .count();
            assert_eq!(owners, 1, "event {i} width {width}");
        }
    }
}

#[test]
fn exact_multiple_belongs_to_the_segment_it_closes() {
    let evs = events(&[(1.0, "a"), (30.0, "b"), (31.0, "c")]);
    let bucket = SegmentBucket::build(&evs, 15).unwrap();
    assert_eq!(bucket.segment_of(1), Some(1)); // 16-30
    assert_eq!(bucket.segment_of(2), Some(2)); // 31-45
}

#[test]
fn densest_segment_events_come_back_in_order() {
    let evs = events(&[(1.0, "a"), (17.0, "b"), (18.0, "c"), (29.0, "d"), (40.0, "e")]);
    let bucket = SegmentBucket::build(&evs, 15).unwrap();
    let top = top_segment(&count_per_segment(&bucket)).unwrap();
    let texts: Vec<&str> = bucket
        .events_in(&top, &evs)
        .map(|e| e.text.as_str())
        .collect();
    assert_eq!(texts, vec!["b", "c", "d"]);
}

#[test]
fn half_second_ties_round_to_even() {
    let evs = events(&[(1.0, "a"), (30.5, "b"), (40.0, "c")]);
    let bucket = SegmentBucket::build(&evs, 15).unwrap();
    let counts: Vec<usize> = count_per_segment(&bucket).iter().map(|c| c.count).collect();
    assert_eq!(counts, vec![1, 1, 1]);
    assert_eq!(bucket.segment_of(1), Some(1));

    let evs = events(&[(15.5, "d")]);
    let bucket = SegmentBucket::build(&evs, 15).unwrap();
    assert_eq!(bucket.segment_of(0), Some(1));
}

#[test]
fn out_of_range_timestamp_fails_without_panicking() {
    let evs = events(&[(1.0, "a"), (1e300, "b")]);
    let err = SegmentBucket::build(&evs, 15).unwrap_err();
    assert!(matches!(
        err,
        barrage_trend_analyzer::AnalysisError::MalformedEvent { index: 1, .. }
    ));
}
