//! Barrage analysis CLI.
//!
//! `barrage-analyze <events.xml|events.json> [config.toml]`
//!
//! Loads the comment file, runs one analysis and prints the report as JSON on
//! stdout. Logs go to stderr.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use barrage_trend_analyzer::ingest::load_events;
use barrage_trend_analyzer::{
    analyze, AnalysisConfig, AnalysisReport, AnalysisSettings, LexiconScorer, LexiconTokenizer,
};

const ENV_LOG: &str = "BARRAGE_LOG";

/// Compact stderr logs. Filter from `BARRAGE_LOG`, then `RUST_LOG`, then a
/// quiet default.
fn init_tracing() {
    let filter = EnvFilter::try_from_env(ENV_LOG)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("barrage_trend_analyzer=info,warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact().with_writer(std::io::stderr))
        .init();
}

/// Report plus the real send time of every analysed comment (XML input only).
#[derive(Serialize)]
struct Output<'a> {
    #[serde(flatten)]
    report: &'a AnalysisReport,
    #[serde(skip_serializing_if = "no_send_times")]
    sent_at: &'a [Option<DateTime<Utc>>],
}

fn no_send_times(v: &&[Option<DateTime<Utc>>]) -> bool {
    v.iter().all(Option::is_none)
}

fn usage() -> &'static str {
    "usage: barrage-analyze <events.xml|events.json> [config.toml]"
}

fn build_tokenizer(cfg: &AnalysisConfig) -> Result<LexiconTokenizer> {
    let tag = cfg.tokenizer.default_tag.clone();
    match &cfg.tokenizer.lexicon_path {
        Some(p) => LexiconTokenizer::from_json_file(&cfg.resolve(p), tag),
        None => Ok(LexiconTokenizer::new(Default::default(), tag)),
    }
}

fn build_scorer(cfg: &AnalysisConfig) -> Result<LexiconScorer> {
    match &cfg.sentiment.lexicon_path {
        Some(p) => LexiconScorer::from_json_file(&cfg.resolve(p)),
        None => Ok(LexiconScorer::default()),
    }
}

fn main() -> Result<()> {
    // Load .env in local/dev; no-op when absent.
    let _ = dotenvy::dotenv();
    init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(events_path) = args.next().map(PathBuf::from) else {
        bail!(usage());
    };
    let config_path = args.next().map(PathBuf::from);
    if args.next().is_some() {
        bail!(usage());
    }

    let cfg = AnalysisConfig::load(config_path.as_deref())?;
    let settings = AnalysisSettings::from_config(&cfg)?;
    let tokenizer = build_tokenizer(&cfg)?;
    let scorer = build_scorer(&cfg)?;

    let ingested = load_events(&events_path)?;
    if !ingested.rejected.is_empty() {
        warn!(
            rejected = ingested.rejected.len(),
            "some comments had invalid timestamps and were skipped"
        );
    }

    let report = analyze(&ingested.events, &settings, &tokenizer, &scorer)
        .context("running analysis")?;

    let out = Output {
        report: &report,
        sent_at: &ingested.sent_at,
    };
    let json = serde_json::to_string_pretty(&out).context("serializing report")?;
    println!("{json}");

    info!(events = report.event_count, "done");
    Ok(())
}
