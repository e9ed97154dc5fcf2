// src/config.rs
//! Analysis configuration, loaded from TOML.
//!
//! ```toml
//! [segment]
//! width = 15
//!
//! [keywords]
//! top_k = 10
//! window = 5
//! damping = 0.85
//! epsilon = 1e-4
//! max_iterations = 100
//! allowed_tags = ["n", "nr", "ns", "nz", "v", "vd", "vn", "a", "q"]
//!
//! [sentiment]
//! negative_below = 0.5
//! positive_above = 0.5
//! lexicon_path = "sentiment_lexicon.json"   # optional
//!
//! [word_frequency]
//! drop_numeric = true
//! drop_lowercase = true
//! drop_uppercase = true
//!
//! [stopwords]
//! words = ["的", "了"]
//! path = "stopwords.txt"                    # optional, one word per line
//!
//! [tokenizer]
//! default_tag = "n"
//! lexicon_path = "tags.json"                # optional
//! ```
//!
//! Relative paths are resolved against the directory of the config file, never
//! against the process working directory.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tracing::info;

use crate::error::AnalysisError;
use crate::keywords::{
    RankConfig, DEFAULT_ALLOWED_TAGS, DEFAULT_DAMPING, DEFAULT_EPSILON, DEFAULT_MAX_ITERATIONS,
    DEFAULT_TOP_K, DEFAULT_WINDOW,
};
use crate::sentiment::SentimentThresholds;
use crate::wordfreq::TermFilter;

pub const DEFAULT_CONFIG_PATH: &str = "config/analysis.toml";
pub const ENV_CONFIG_PATH: &str = "BARRAGE_CONFIG_PATH";
pub const DEFAULT_SEGMENT_WIDTH: u32 = 15;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub segment: SegmentSection,
    #[serde(default)]
    pub keywords: KeywordSection,
    #[serde(default)]
    pub sentiment: SentimentSection,
    #[serde(default)]
    pub word_frequency: TermFilter,
    #[serde(default)]
    pub stopwords: StopwordSection,
    #[serde(default)]
    pub tokenizer: TokenizerSection,
    /// Directory relative paths are resolved against.
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SegmentSection {
    #[serde(default = "default_width")]
    pub width: u32,
}

fn default_width() -> u32 {
    DEFAULT_SEGMENT_WIDTH
}

impl Default for SegmentSection {
    fn default() -> Self {
        Self {
            width: default_width(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct KeywordSection {
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default = "default_window")]
    pub window: usize,
    #[serde(default = "default_damping")]
    pub damping: f64,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_allowed_tags")]
    pub allowed_tags: Vec<String>,
}

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}
fn default_window() -> usize {
    DEFAULT_WINDOW
}
fn default_damping() -> f64 {
    DEFAULT_DAMPING
}
fn default_epsilon() -> f64 {
    DEFAULT_EPSILON
}
fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}
fn default_allowed_tags() -> Vec<String> {
    DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect()
}

impl Default for KeywordSection {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            window: default_window(),
            damping: default_damping(),
            epsilon: default_epsilon(),
            max_iterations: default_max_iterations(),
            allowed_tags: default_allowed_tags(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SentimentSection {
    #[serde(flatten)]
    pub thresholds: SentimentThresholds,
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StopwordSection {
    #[serde(default)]
    pub words: Vec<String>,
    #[serde(default)]
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenizerSection {
    #[serde(default = "default_tag")]
    pub default_tag: String,
    #[serde(default)]
    pub lexicon_path: Option<PathBuf>,
}

fn default_tag() -> String {
    "n".to_string()
}

impl Default for TokenizerSection {
    fn default() -> Self {
        Self {
            default_tag: default_tag(),
            lexicon_path: None,
        }
    }
}

impl AnalysisConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(s).context("parsing analysis config")?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load from an explicit file; relative paths inside resolve next to it.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading analysis config from {}", path.display()))?;
        let mut cfg = Self::from_toml_str(&content)
            .with_context(|| format!("in config file {}", path.display()))?;
        cfg.base_dir = path.parent().map(Path::to_path_buf);
        Ok(cfg)
    }

    /// Resolution order:
    /// 1) `explicit` path
    /// 2) `$BARRAGE_CONFIG_PATH`
    /// 3) `config/analysis.toml` if it exists
    /// 4) built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(p) = explicit {
            return Self::from_path(p);
        }
        if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            return Self::from_path(&pb);
        }
        let default_p = PathBuf::from(DEFAULT_CONFIG_PATH);
        if default_p.exists() {
            return Self::from_path(&default_p);
        }
        info!("no analysis config found; using built-in defaults");
        Ok(Self::default())
    }

    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.segment.width == 0 {
            return Err(AnalysisError::config("segment.width must be > 0"));
        }
        self.rank_config(HashSet::new(), false).validate()?;
        self.sentiment.thresholds.validate()
    }

    /// Resolve `p` against the config file's directory.
    pub fn resolve(&self, p: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if p.is_relative() => base.join(p),
            _ => p.to_path_buf(),
        }
    }

    /// Inline stopwords merged with the optional stopword file.
    pub fn load_stopwords(&self) -> Result<HashSet<String>> {
        let mut set: HashSet<String> = self
            .stopwords
            .words
            .iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();

        if let Some(p) = &self.stopwords.path {
            let path = self.resolve(p);
            let content = fs::read_to_string(&path)
                .with_context(|| format!("reading stopwords from {}", path.display()))?;
            set.extend(parse_stopwords(&content));
        }
        Ok(set)
    }

    /// Ranking parameters for this config.
    pub fn rank_config(&self, stopwords: HashSet<String>, with_weights: bool) -> RankConfig {
        let k = &self.keywords;
        RankConfig {
            top_k: k.top_k,
            allowed_tags: k.allowed_tags.iter().cloned().collect(),
            stopwords,
            window: k.window,
            damping: k.damping,
            epsilon: k.epsilon,
            max_iterations: k.max_iterations,
            with_weights,
        }
    }
}

/// One word per line; blank lines and `#` comments skipped.
pub fn parse_stopwords(content: &str) -> impl Iterator<Item = String> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#'))
        .map(str::to_string)
}
