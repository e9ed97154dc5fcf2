// src/lib.rs
//! Timed-comment (danmaku) analysis: segment density, TextRank keywords,
//! sentiment trend and term frequencies for one video's comment stream.
//!
//! ```
//! use barrage_trend_analyzer::{analyze, AnalysisSettings, Event, LexiconScorer, LexiconTokenizer};
//!
//! let events = vec![
//!     Event::new(0.0, "good good"),
//!     Event::new(10.0, "bad"),
//!     Event::new(20.0, "good"),
//! ];
//! let report = analyze(
//!     &events,
//!     &AnalysisSettings::default(),
//!     &LexiconTokenizer::default(),
//!     &LexiconScorer::default(),
//! )
//! .unwrap();
//! assert_eq!(report.segment_counts.len(), 2);
//! assert_eq!(report.top_segment.unwrap().segment.index, 0);
//! ```

pub mod config;
pub mod error;
pub mod event;
pub mod frequency;
pub mod ingest;
pub mod keywords;
pub mod pipeline;
pub mod segment;
pub mod sentiment;
pub mod telemetry;
pub mod tokenize;
pub mod wordfreq;

// ---- Re-exports for stable public API ----
pub use crate::config::AnalysisConfig;
pub use crate::error::AnalysisError;
pub use crate::event::Event;
pub use crate::frequency::{count_per_segment, top_segment, SegmentCount};
pub use crate::keywords::{rank, rank_text, KeywordScore, RankConfig, Ranking};
pub use crate::pipeline::{analyze, AnalysisReport, AnalysisSettings, TopSegment};
pub use crate::segment::{segment, Segment, SegmentBucket};
pub use crate::sentiment::{
    classify, classify_all, trend, LexiconScorer, SentimentLabel, SentimentRecord,
    SentimentScorer, SentimentThresholds, SentimentTrendRow,
};
pub use crate::tokenize::{LexiconTokenizer, Token, Tokenizer};
pub use crate::wordfreq::{frequencies, TermFilter, TermFrequencyTable};
