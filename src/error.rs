//! Error kinds reported at the boundary of every analysis operation.
//!
//! Empty inputs are not errors (they produce empty tables); only an explicit
//! maximum over nothing is. Ranking non-convergence is reported on
//! [`crate::keywords::Ranking::converged`] instead of here.

/// Errors produced by the analysis core and the ingestion boundary.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    /// A parameter is out of its valid range. Never clamped.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A maximum was requested over zero items.
    #[error("empty input: {0}")]
    EmptyInput(&'static str),

    /// An event with a negative or non-finite timestamp reached ingestion.
    #[error("malformed event #{index}: {reason}")]
    MalformedEvent { index: usize, reason: String },

    /// The injected sentiment scorer returned a value outside `[0, 1]`.
    #[error("sentiment score {score} for event #{index} is outside [0, 1]")]
    ScoreOutOfRange { index: usize, score: f64 },
}

impl AnalysisError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// True for errors caused by caller-supplied parameters.
    #[inline]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::InvalidConfiguration(_))
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;
