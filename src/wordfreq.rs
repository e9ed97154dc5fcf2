//! # Word-Frequency Builder
//! Corpus-wide term counts for word-cloud style consumers.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::tokenize::Tokenizer;

/// Which tokens are discarded before counting.
///
/// The case rules drop Latin-alphabet noise (`233`, `awsl`, `AWSL`) while
/// keeping mixed-case and script-mixed terms. A term counts as lowercase only
/// when it has at least one cased character and none of them is uppercase, so
/// CJK-only terms are never lowercase nor uppercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermFilter {
    #[serde(default = "yes")]
    pub drop_numeric: bool,
    #[serde(default = "yes")]
    pub drop_lowercase: bool,
    #[serde(default = "yes")]
    pub drop_uppercase: bool,
}

fn yes() -> bool {
    true
}

impl Default for TermFilter {
    fn default() -> Self {
        Self {
            drop_numeric: true,
            drop_lowercase: true,
            drop_uppercase: true,
        }
    }
}

impl TermFilter {
    /// Keep everything except stopwords and blanks.
    pub fn permissive() -> Self {
        Self {
            drop_numeric: false,
            drop_lowercase: false,
            drop_uppercase: false,
        }
    }

    pub fn keeps(&self, term: &str, stopwords: &HashSet<String>) -> bool {
        if term.trim().is_empty() || stopwords.contains(term) {
            return false;
        }
        if self.drop_numeric && is_numeric(term) {
            return false;
        }
        if self.drop_lowercase && is_lowercase(term) {
            return false;
        }
        if self.drop_uppercase && is_uppercase(term) {
            return false;
        }
        true
    }
}

fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(char::is_numeric)
}

fn is_lowercase(s: &str) -> bool {
    s.chars().any(char::is_lowercase) && !s.chars().any(char::is_uppercase)
}

fn is_uppercase(s: &str) -> bool {
    s.chars().any(char::is_uppercase) && !s.chars().any(char::is_lowercase)
}

/// Term → occurrence count, ordered by term.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TermFrequencyTable(BTreeMap<String, u64>);

impl TermFrequencyTable {
    pub fn get(&self, term: &str) -> u64 {
        self.0.get(term).copied().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.0.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// The `n` most frequent terms; equal counts ordered by term.
    pub fn top(&self, n: usize) -> Vec<(&str, u64)> {
        let mut v: Vec<(&str, u64)> = self.iter().collect();
        v.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        v.truncate(n);
        v
    }

    fn bump(&mut self, term: &str) {
        *self.0.entry(term.to_string()).or_insert(0) += 1;
    }
}

/// Count kept terms across every event.
pub fn frequencies<T: Tokenizer + ?Sized>(
    events: &[Event],
    tokenizer: &T,
    stopwords: &HashSet<String>,
    filter: &TermFilter,
) -> TermFrequencyTable {
    let mut table = TermFrequencyTable::default();
    for ev in events {
        for tok in tokenizer.tokenize(&ev.text) {
            if filter.keeps(&tok.term, stopwords) {
                table.bump(&tok.term);
            }
        }
    }
    table
}
