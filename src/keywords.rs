//! # Keyword Ranker
//! TextRank over a term co-occurrence graph.
//!
//! Pipeline per call:
//! 1. tokenize every input text with the injected [`Tokenizer`];
//! 2. keep tokens whose tag is allowed and whose term is not a stopword;
//! 3. link terms that sit within `window` positions of each other *inside the
//!    same text* (texts are separate events, so no edge crosses between them);
//! 4. iterate `s_i = (1 - d) + d * sum_j (w_ij / out_j) * s_j` from `s = 1`
//!    until the largest change drops below `epsilon` or `max_iterations` runs out;
//! 5. order by score (ties: first appearance) and keep `top_k`.
//!
//! Pure and deterministic: edge storage is ordered, so identical input always
//! produces the identical float sequence.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use metrics::{counter, histogram};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{AnalysisError, Result};
use crate::telemetry::{ensure_metrics_described, RANK_ITERATIONS, RANK_NONCONVERGED};
use crate::tokenize::Tokenizer;

/// Common nouns, person/place/other proper nouns, verbs (plain, adverbial,
/// nominal), adjectives and quantifiers.
pub const DEFAULT_ALLOWED_TAGS: [&str; 9] = ["n", "nr", "ns", "nz", "v", "vd", "vn", "a", "q"];

pub const DEFAULT_TOP_K: usize = 10;
pub const DEFAULT_WINDOW: usize = 5;
pub const DEFAULT_DAMPING: f64 = 0.85;
pub const DEFAULT_EPSILON: f64 = 1e-4;
pub const DEFAULT_MAX_ITERATIONS: usize = 100;

/// Parameters of one ranking call.
#[derive(Debug, Clone)]
pub struct RankConfig {
    pub top_k: usize,
    pub allowed_tags: BTreeSet<String>,
    pub stopwords: HashSet<String>,
    /// Span length: terms at positions `i < j` are linked when `j - i < window`.
    pub window: usize,
    pub damping: f64,
    pub epsilon: f64,
    pub max_iterations: usize,
    pub with_weights: bool,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            top_k: DEFAULT_TOP_K,
            allowed_tags: DEFAULT_ALLOWED_TAGS.iter().map(|t| t.to_string()).collect(),
            stopwords: HashSet::new(),
            window: DEFAULT_WINDOW,
            damping: DEFAULT_DAMPING,
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            with_weights: false,
        }
    }
}

impl RankConfig {
    pub fn with_weights(mut self, on: bool) -> Self {
        self.with_weights = on;
        self
    }

    pub fn top_k(mut self, k: usize) -> Self {
        self.top_k = k;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(AnalysisError::config("top_k must be > 0"));
        }
        if self.window == 0 {
            return Err(AnalysisError::config("co-occurrence window must be > 0"));
        }
        if !(self.damping > 0.0 && self.damping < 1.0) {
            return Err(AnalysisError::config(format!(
                "damping must lie in (0, 1), got {}",
                self.damping
            )));
        }
        if !(self.epsilon.is_finite() && self.epsilon > 0.0) {
            return Err(AnalysisError::config(format!(
                "epsilon must be finite and > 0, got {}",
                self.epsilon
            )));
        }
        if self.max_iterations == 0 {
            return Err(AnalysisError::config("max_iterations must be > 0"));
        }
        Ok(())
    }

    fn keeps(&self, term: &str, tag: &str) -> bool {
        !term.trim().is_empty() && self.allowed_tags.contains(tag) && !self.stopwords.contains(term)
    }
}

/// A ranked term. `weight` is present only when weights were requested.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KeywordScore {
    pub term: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

/// Outcome of one ranking call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ranking {
    pub keywords: Vec<KeywordScore>,
    /// False when `max_iterations` ran out before the change fell below epsilon.
    pub converged: bool,
    pub iterations: usize,
    /// Distinct terms that survived filtering (graph size before truncation).
    pub nodes: usize,
}

impl Ranking {
    pub fn terms(&self) -> Vec<&str> {
        self.keywords.iter().map(|k| k.term.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }
}

/// Undirected weighted co-occurrence graph, local to one ranking call.
///
/// Node ids follow first appearance in the filtered token stream.
#[derive(Debug, Default)]
struct CooccurrenceGraph {
    terms: Vec<String>,
    ids: HashMap<String, usize>,
    /// Keyed by `(min_id, max_id)`.
    edges: BTreeMap<(usize, usize), f64>,
}

impl CooccurrenceGraph {
    fn intern(&mut self, term: &str) -> usize {
        if let Some(&id) = self.ids.get(term) {
            return id;
        }
        let id = self.terms.len();
        self.terms.push(term.to_string());
        self.ids.insert(term.to_string(), id);
        id
    }

    /// Add one event's filtered term sequence.
    fn add_span(&mut self, span: &[usize], window: usize) {
        for (i, &a) in span.iter().enumerate() {
            for &b in span.iter().skip(i + 1).take(window.saturating_sub(1)) {
                if a == b {
                    continue;
                }
                let key = if a < b { (a, b) } else { (b, a) };
                *self.edges.entry(key).or_insert(0.0) += 1.0;
            }
        }
    }

    fn len(&self) -> usize {
        self.terms.len()
    }

    /// Neighbour lists (ordered by neighbour id) and total incident weight per node.
    fn adjacency(&self) -> (Vec<Vec<(usize, f64)>>, Vec<f64>) {
        let n = self.len();
        let mut adj = vec![Vec::new(); n];
        let mut out = vec![0.0; n];
        for (&(a, b), &w) in &self.edges {
            adj[a].push((b, w));
            adj[b].push((a, w));
            out[a] += w;
            out[b] += w;
        }
        for list in &mut adj {
            list.sort_by_key(|&(j, _)| j);
        }
        (adj, out)
    }

    /// Power iteration. Returns `(scores, converged, iterations)`.
    fn scores(&self, damping: f64, epsilon: f64, max_iterations: usize) -> (Vec<f64>, bool, usize) {
        let n = self.len();
        let mut scores = vec![1.0; n];
        if n == 0 {
            return (scores, true, 0);
        }
        let (adj, out) = self.adjacency();

        for it in 1..=max_iterations {
            let next: Vec<f64> = adj
                .iter()
                .map(|neigh| {
                    let s: f64 = neigh
                        .iter()
                        .map(|&(j, w)| w / out[j] * scores[j])
                        .sum();
                    (1.0 - damping) + damping * s
                })
                .collect();

            let delta = next
                .iter()
                .zip(&scores)
                .map(|(a, b)| (a - b).abs())
                .fold(0.0_f64, f64::max);
            scores = next;

            if delta < epsilon {
                return (scores, true, it);
            }
        }
        (scores, false, max_iterations)
    }
}

/// Rank keywords over `texts`, one text per event.
pub fn rank<T, S>(texts: &[S], tokenizer: &T, cfg: &RankConfig) -> Result<Ranking>
where
    T: Tokenizer + ?Sized,
    S: AsRef<str>,
{
    cfg.validate()?;
    ensure_metrics_described();

    let mut graph = CooccurrenceGraph::default();
    for text in texts {
        let span: Vec<usize> = tokenizer
            .tokenize(text.as_ref())
            .into_iter()
            .filter(|t| cfg.keeps(&t.term, &t.tag))
            .map(|t| graph.intern(&t.term))
            .collect();
        graph.add_span(&span, cfg.window);
    }

    let (scores, converged, iterations) = graph.scores(cfg.damping, cfg.epsilon, cfg.max_iterations);

    histogram!(RANK_ITERATIONS).record(iterations as f64);
    if !converged {
        counter!(RANK_NONCONVERGED).increment(1);
        warn!(
            nodes = graph.len(),
            iterations, "keyword ranking stopped before converging; returning last iterate"
        );
    }
    debug!(
        texts = texts.len(),
        nodes = graph.len(),
        edges = graph.edges.len(),
        iterations,
        converged,
        "keyword ranking done"
    );

    // Stable sort keeps first-appearance order among equal scores.
    let mut order: Vec<usize> = (0..graph.len()).collect();
    order.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let keywords = order
        .into_iter()
        .take(cfg.top_k)
        .map(|id| KeywordScore {
            term: graph.terms[id].clone(),
            weight: cfg.with_weights.then_some(scores[id]),
        })
        .collect();

    Ok(Ranking {
        keywords,
        converged,
        iterations,
        nodes: graph.len(),
    })
}

/// Rank keywords of a single text span.
pub fn rank_text<T>(text: &str, tokenizer: &T, cfg: &RankConfig) -> Result<Ranking>
where
    T: Tokenizer + ?Sized,
{
    rank(&[text], tokenizer, cfg)
}
