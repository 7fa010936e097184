// =============================================================================
// Analytics errors
// =============================================================================
//
// Only conditions that make a computation meaningless abort with an error.
// Short history, zero denominators and wipeouts are reported in-band as NaN
// (or -1 for CAGR) on the affected value.

use thiserror::Error;

/// Fatal conditions raised by the indicator engine and the summarizer.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// The series cannot be analysed at all (empty, unordered, or missing the
    /// adjusted close).
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A window, span, or multiplier is unusable.
    #[error("Invalid parameter: {name} - {reason}")]
    InvalidParameter { name: String, reason: String },
}

impl AnalyticsError {
    pub(crate) fn parameter(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
