//! Metric names emitted by the analysis run.
//!
//! Only the `metrics` facade is used here; without a recorder installed by the
//! embedding application every call is a no-op.

use metrics::{describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

pub const EVENTS_TOTAL: &str = "analysis_events_total";
pub const EVENTS_REJECTED: &str = "analysis_events_rejected_total";
pub const RANK_ITERATIONS: &str = "keyword_rank_iterations";
pub const RANK_NONCONVERGED: &str = "keyword_rank_nonconverged_total";

/// One-time registration so series carry descriptions once a recorder exists.
pub(crate) fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(EVENTS_TOTAL, "Events analysed across all runs.");
        describe_counter!(
            EVENTS_REJECTED,
            "Events dropped at ingestion for invalid timestamps."
        );
        describe_histogram!(RANK_ITERATIONS, "Power iterations per keyword ranking call.");
        describe_counter!(
            RANK_NONCONVERGED,
            "Keyword rankings that hit max_iterations before converging."
        );
    });
}
