//! # Analysis Pipeline
//! One batch run over a validated event set: segmentation, densest segment and
//! its keywords, corpus keywords, sentiment trend and term frequencies.
//!
//! Pure apart from logging/metrics: no file or display I/O, no shared state
//! between runs.

use metrics::counter;
use serde::Serialize;
use tracing::info;

use crate::config::{AnalysisConfig, DEFAULT_SEGMENT_WIDTH};
use crate::error::Result;
use crate::event::Event;
use crate::frequency::{count_per_segment, top_segment, SegmentCount};
use crate::keywords::{rank, RankConfig, Ranking};
use crate::segment::{Segment, SegmentBucket};
use crate::sentiment::{
    classify_all, trend, SentimentRecord, SentimentScorer, SentimentThresholds, SentimentTrendRow,
};
use crate::telemetry::{ensure_metrics_described, EVENTS_TOTAL};
use crate::tokenize::Tokenizer;
use crate::wordfreq::{frequencies, TermFilter, TermFrequencyTable};

/// Fully resolved parameters of a run (stopwords already loaded).
#[derive(Debug, Clone)]
pub struct AnalysisSettings {
    pub segment_width: u32,
    /// Shared by both ranking calls; `with_weights` is set per call.
    pub rank: RankConfig,
    pub thresholds: SentimentThresholds,
    pub term_filter: TermFilter,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            segment_width: DEFAULT_SEGMENT_WIDTH,
            rank: RankConfig::default(),
            thresholds: SentimentThresholds::default(),
            term_filter: TermFilter::default(),
        }
    }
}

impl AnalysisSettings {
    /// Resolve a loaded config, reading its stopword file if any.
    pub fn from_config(cfg: &AnalysisConfig) -> anyhow::Result<Self> {
        let stopwords = cfg.load_stopwords()?;
        Ok(Self {
            segment_width: cfg.segment.width,
            rank: cfg.rank_config(stopwords, false),
            thresholds: cfg.sentiment.thresholds,
            term_filter: cfg.word_frequency,
        })
    }
}

/// The densest segment, its events and their keywords.
#[derive(Debug, Clone, Serialize)]
pub struct TopSegment {
    pub segment: Segment,
    pub count: usize,
    pub events: Vec<Event>,
    /// Ranked without weights.
    pub keywords: Ranking,
}

/// Every table produced by one run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub event_count: usize,
    pub segment_width: u32,
    pub segment_counts: Vec<SegmentCount>,
    /// `None` only when there are no events.
    pub top_segment: Option<TopSegment>,
    /// Ranked over the whole corpus, with weights.
    pub corpus_keywords: Ranking,
    pub sentiment: Vec<SentimentRecord>,
    pub sentiment_trend: Vec<SentimentTrendRow>,
    pub term_frequencies: TermFrequencyTable,
}

/// Run the full analysis over `events`.
pub fn analyze<T, S>(
    events: &[Event],
    settings: &AnalysisSettings,
    tokenizer: &T,
    scorer: &S,
) -> Result<AnalysisReport>
where
    T: Tokenizer + ?Sized,
    S: SentimentScorer + ?Sized,
{
    ensure_metrics_described();
    settings.rank.validate()?;
    settings.thresholds.validate()?;

    let bucket = SegmentBucket::build(events, settings.segment_width)?;
    let segment_counts = count_per_segment(&bucket);

    let top = if bucket.is_empty() {
        None
    } else {
        let segment = top_segment(&segment_counts)?;
        let seg_events: Vec<Event> = bucket.events_in(&segment, events).cloned().collect();
        let texts: Vec<&str> = seg_events.iter().map(|e| e.text.as_str()).collect();
        let keywords = rank(&texts, tokenizer, &settings.rank.clone().with_weights(false))?;
        Some(TopSegment {
            segment,
            count: seg_events.len(),
            events: seg_events,
            keywords,
        })
    };

    let all_texts: Vec<&str> = events.iter().map(|e| e.text.as_str()).collect();
    let corpus_keywords = rank(&all_texts, tokenizer, &settings.rank.clone().with_weights(true))?;

    let sentiment = classify_all(events, scorer, &settings.thresholds)?;
    let sentiment_trend = trend(&sentiment, &bucket);

    let term_frequencies = frequencies(
        events,
        tokenizer,
        &settings.rank.stopwords,
        &settings.term_filter,
    );

    counter!(EVENTS_TOTAL).increment(events.len() as u64);
    info!(
        events = events.len(),
        segments = bucket.len(),
        top_segment = top.as_ref().map(|t| t.segment.index),
        corpus_keywords = corpus_keywords.keywords.len(),
        terms = term_frequencies.len(),
        "analysis run complete"
    );

    Ok(AnalysisReport {
        event_count: events.len(),
        segment_width: settings.segment_width,
        segment_counts,
        top_segment: top,
        corpus_keywords,
        sentiment,
        sentiment_trend,
        term_frequencies,
    })
}
