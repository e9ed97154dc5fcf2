// src/tokenize.rs
//! Tokenizer / part-of-speech capability.
//!
//! The analysis core only sees the [`Tokenizer`] trait. [`LexiconTokenizer`] is
//! a small reference implementation: Unicode word splitting plus tag lookup in
//! a term → tag dictionary. Swap in a real segmenter/tagger by implementing the
//! trait.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Tag given to purely numeric terms by the reference tokenizer.
pub const NUMERAL_TAG: &str = "m";

/// One token with its part-of-speech tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub term: String,
    pub tag: String,
}

impl Token {
    pub fn new(term: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            tag: tag.into(),
        }
    }
}

/// Splits text into `(term, tag)` pairs.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        (**self).tokenize(text)
    }
}

// \w with (?u) covers letters/digits/underscore of every script.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?u)\w+").expect("word regex"));

/// Dictionary-tagging tokenizer.
///
/// Words are maximal runs of Unicode word characters, so CJK text must be
/// pre-segmented with whitespace or punctuation. Lookup is exact first, then
/// lowercase; unknown numerals get [`NUMERAL_TAG`], other unknown words get
/// `default_tag`.
#[derive(Debug, Clone)]
pub struct LexiconTokenizer {
    lexicon: HashMap<String, String>,
    default_tag: String,
}

impl LexiconTokenizer {
    pub fn new(lexicon: HashMap<String, String>, default_tag: impl Into<String>) -> Self {
        Self {
            lexicon,
            default_tag: default_tag.into(),
        }
    }

    /// Load a JSON object `{ "term": "tag", ... }`.
    pub fn from_json_file(path: &Path, default_tag: impl Into<String>) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading tag lexicon from {}", path.display()))?;
        let lexicon: HashMap<String, String> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing tag lexicon {}", path.display()))?;
        Ok(Self::new(lexicon, default_tag))
    }

    pub fn len(&self) -> usize {
        self.lexicon.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexicon.is_empty()
    }

    fn tag_for(&self, term: &str) -> &str {
        if let Some(t) = self.lexicon.get(term) {
            return t;
        }
        if let Some(t) = self.lexicon.get(&term.to_lowercase()) {
            return t;
        }
        if term.chars().all(|c| c.is_numeric()) {
            NUMERAL_TAG
        } else {
            &self.default_tag
        }
    }
}

impl Default for LexiconTokenizer {
    /// Empty dictionary; every word is tagged as a common noun.
    fn default() -> Self {
        Self::new(HashMap::new(), "n")
    }
}

impl Tokenizer for LexiconTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        WORD_RE
            .find_iter(text)
            .map(|m| {
                let term = m.as_str();
                Token::new(term, self.tag_for(term))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(pairs: &[(&str, &str)]) -> LexiconTokenizer {
        let map = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        LexiconTokenizer::new(map, "x")
    }

    #[test]
    fn splits_on_whitespace_and_punctuation() {
        let t = lex(&[("猫", "n"), ("跳", "v")]);
        let toks = t.tokenize("猫，跳! 上");
        let terms: Vec<&str> = toks.iter().map(|t| t.term.as_str()).collect();
        assert_eq!(terms, vec!["猫", "跳", "上"]);
        assert_eq!(toks[0].tag, "n");
        assert_eq!(toks[1].tag, "v");
        assert_eq!(toks[2].tag, "x");
    }

    #[test]
    fn numerals_and_case_fallback() {
        let t = lex(&[("good", "a")]);
        let toks = t.tokenize("GOOD 233");
        assert_eq!(toks[0].tag, "a");
        assert_eq!(toks[1].tag, NUMERAL_TAG);
    }

    #[test]
    fn loads_json_lexicon() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("tags.json");
        fs::write(&p, r#"{"弹幕": "n", "好看": "a"}"#).unwrap();
        let t = LexiconTokenizer::from_json_file(&p, "x").unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.tokenize("好看")[0].tag, "a");
    }
}
