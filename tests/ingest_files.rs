// tests/ingest_files.rs
use std::fs;

use barrage_trend_analyzer::ingest::load_events;
use barrage_trend_analyzer::{analyze, AnalysisSettings, LexiconScorer, LexiconTokenizer};
use tempfile::tempdir;

const XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<i>
  <chatid>1</chatid>
  <d p="3.2,1,25,16777215,1700000000,0,u1,1">开场 Hello</d>
  <d p="20.0,1,25,16777215,1700000005,0,u2,2">高能 Warning</d>
  <d p="-1,1,25,16777215,1700000009,0,u3,3">rewind</d>
  <d p="21.7,1,25,16777215,1700000010,0,u4,4">高能</d>
</i>"#;

#[test]
fn xml_file_loads_and_analyzes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("comments.xml");
    fs::write(&path, XML).unwrap();

    let ing = load_events(&path).unwrap();
    assert_eq!(ing.events.len(), 3);
    assert_eq!(ing.rejected.len(), 1);
    assert_eq!(ing.events[1].text, "高能 Warning");

    // send times stay aligned with the kept events
    let secs: Vec<i64> = ing
        .sent_at
        .iter()
        .map(|t| t.unwrap().timestamp())
        .collect();
    assert_eq!(secs, vec![1_700_000_000, 1_700_000_005, 1_700_000_010]);

    let report = analyze(
        &ing.events,
        &AnalysisSettings::default(),
        &LexiconTokenizer::default(),
        &LexiconScorer::default(),
    )
    .unwrap();
    assert_eq!(report.segment_counts.len(), 2);
    assert_eq!(report.top_segment.unwrap().segment.index, 1);
    assert_eq!(report.term_frequencies.get("高能"), 2);
}

#[test]
fn json_file_loads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.JSON");
    fs::write(
        &path,
        r#"[{"timestamp": 1.0, "text": "a"}, {"timestamp": 2.5, "text": "b  c"}]"#,
    )
    .unwrap();

    let ing = load_events(&path).unwrap();
    assert!(ing.rejected.is_empty());
    assert_eq!(ing.events[1].text, "b c");
}

#[test]
fn unknown_extension_and_missing_file_fail() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("events.csv");
    fs::write(&path, "1,hi").unwrap();
    assert!(load_events(&path).is_err());
    assert!(load_events(&dir.path().join("nope.xml")).is_err());
}

#[test]
fn absurd_playback_time_is_rejected_before_analysis() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("far.xml");
    fs::write(
        &path,
        r#"<i><d p="1.0,1,25,0,1700000000,0,u,1">ok</d><d p="1e300,1,25,0,1700000001,0,u,2">far</d></i>"#,
    )
    .unwrap();

    let ing = load_events(&path).unwrap();
    assert_eq!(ing.events.len(), 1);
    assert_eq!(ing.rejected.len(), 1);

    let report = analyze(
        &ing.events,
        &AnalysisSettings::default(),
        &LexiconTokenizer::default(),
        &LexiconScorer::default(),
    )
    .unwrap();
    assert_eq!(report.segment_counts.len(), 1);
}
