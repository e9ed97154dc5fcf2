//! # Sentiment Trend Aggregator
//! Per-event polarity labels and their per-segment cross-tabulation.
//!
//! The polarity model is injected through [`SentimentScorer`]; [`LexiconScorer`]
//! is the bundled reference model (word lexicon + negation window, squashed
//! into `[0, 1]`).

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};
use crate::event::Event;
use crate::segment::{Segment, SegmentBucket};

/// Polarity model: probability-like positivity in `[0, 1]`.
pub trait SentimentScorer {
    fn score(&self, text: &str) -> f64;
}

impl<T: SentimentScorer + ?Sized> SentimentScorer for &T {
    fn score(&self, text: &str) -> f64 {
        (**self).score(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Cut points between labels. `score < negative_below` is negative,
/// `score > positive_above` is positive, everything else neutral.
///
/// With the default 0.5 / 0.5 only an exact `0.5` is neutral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentThresholds {
    #[serde(default = "default_cut")]
    pub negative_below: f64,
    #[serde(default = "default_cut")]
    pub positive_above: f64,
}

fn default_cut() -> f64 {
    0.5
}

impl Default for SentimentThresholds {
    fn default() -> Self {
        Self {
            negative_below: default_cut(),
            positive_above: default_cut(),
        }
    }
}

impl SentimentThresholds {
    pub fn validate(&self) -> Result<()> {
        let in_unit = |x: f64| (0.0..=1.0).contains(&x);
        if !in_unit(self.negative_below) || !in_unit(self.positive_above) {
            return Err(AnalysisError::config("sentiment thresholds must lie in [0, 1]"));
        }
        if self.negative_below > self.positive_above {
            return Err(AnalysisError::config(format!(
                "negative_below ({}) must not exceed positive_above ({})",
                self.negative_below, self.positive_above
            )));
        }
        Ok(())
    }

    pub fn label(&self, score: f64) -> SentimentLabel {
        if score < self.negative_below {
            SentimentLabel::Negative
        } else if score > self.positive_above {
            SentimentLabel::Positive
        } else {
            SentimentLabel::Neutral
        }
    }
}

/// Score and label of one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SentimentRecord {
    pub event_index: usize,
    pub score: f64,
    pub label: SentimentLabel,
}

/// Classify event `index` with `scorer`.
pub fn classify<S: SentimentScorer + ?Sized>(
    index: usize,
    event: &Event,
    scorer: &S,
    thresholds: &SentimentThresholds,
) -> Result<SentimentRecord> {
    let score = scorer.score(&event.text);
    if !(0.0..=1.0).contains(&score) {
        return Err(AnalysisError::ScoreOutOfRange { index, score });
    }
    Ok(SentimentRecord {
        event_index: index,
        score,
        label: thresholds.label(score),
    })
}

/// One record per event, in event order.
pub fn classify_all<S: SentimentScorer + ?Sized>(
    events: &[Event],
    scorer: &S,
    thresholds: &SentimentThresholds,
) -> Result<Vec<SentimentRecord>> {
    thresholds.validate()?;
    events
        .iter()
        .enumerate()
        .map(|(i, ev)| classify(i, ev, scorer, thresholds))
        .collect()
}

/// Label counts of one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SentimentTrendRow {
    pub segment: Segment,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentTrendRow {
    pub fn total(&self) -> usize {
        self.positive + self.neutral + self.negative
    }
}

/// One row per segment of `bucket`, in index order, zero counts included.
///
/// Records whose event is not part of the bucket are ignored.
pub fn trend(records: &[SentimentRecord], bucket: &SegmentBucket) -> Vec<SentimentTrendRow> {
    let labels: HashMap<usize, SentimentLabel> =
        records.iter().map(|r| (r.event_index, r.label)).collect();

    bucket
        .iter()
        .map(|(segment, members)| {
            let mut row = SentimentTrendRow {
                segment: *segment,
                positive: 0,
                neutral: 0,
                negative: 0,
            };
            for label in members.iter().filter_map(|i| labels.get(i)) {
                match label {
                    SentimentLabel::Positive => row.positive += 1,
                    SentimentLabel::Neutral => row.neutral += 1,
                    SentimentLabel::Negative => row.negative += 1,
                }
            }
            row
        })
        .collect()
}

/* ----------------------------
Reference lexicon scorer
---------------------------- */

static SEED_LEXICON: Lazy<HashMap<String, i32>> = Lazy::new(|| {
    let raw = include_str!("../sentiment_lexicon.json");
    serde_json::from_str::<HashMap<String, i32>>(raw).expect("valid sentiment lexicon")
});

/// Word-lexicon polarity model.
///
/// Sums per-word scores, inverting a word's sign when a negator appears in the
/// 1..=3 preceding tokens, then maps the sum through a logistic curve so that
/// a zero sum lands exactly on 0.5.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: HashMap<String, i32>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            lexicon: SEED_LEXICON.clone(),
        }
    }
}

impl LexiconScorer {
    pub fn new(lexicon: HashMap<String, i32>) -> Self {
        Self { lexicon }
    }

    /// Load a JSON object `{ "word": score, ... }`.
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading sentiment lexicon from {}", path.display()))?;
        let lexicon = serde_json::from_str(&raw)
            .with_context(|| format!("parsing sentiment lexicon {}", path.display()))?;
        Ok(Self::new(lexicon))
    }

    #[inline]
    fn word_score(&self, w: &str) -> i32 {
        *self.lexicon.get(w).unwrap_or(&0)
    }

    /// Raw lexicon sum and token count.
    pub fn score_text(&self, text: &str) -> (i32, usize) {
        let tokens: Vec<String> = tokenize(text).collect();
        let mut score: i32 = 0;

        for i in 0..tokens.len() {
            let base = self.word_score(&tokens[i]);
            if base == 0 {
                continue;
            }
            let negated = (1..=3).any(|k| i >= k && is_negator(&tokens[i - k]));
            score += if negated { -base } else { base };
        }

        (score, tokens.len())
    }
}

impl SentimentScorer for LexiconScorer {
    fn score(&self, text: &str) -> f64 {
        let (raw, _) = self.score_text(text);
        1.0 / (1.0 + (-f64::from(raw)).exp())
    }
}

fn tokenize(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
}

fn is_negator(tok: &str) -> bool {
    matches!(
        tok,
        "not" | "no" | "never" | "isn't" | "wasn't" | "aren't" | "don't" | "can't" | "cannot"
            | "不" | "没" | "没有" | "别" | "不是"
    )
}
