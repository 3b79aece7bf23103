use thiserror::Error;

/// Fatal errors.
///
/// Only configuration problems abort a run, and they are rejected before any
/// category is processed. Insufficient data and malformed records are not
/// errors: they are counted and reported per category instead.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

impl AnalysisError {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        AnalysisError::InvalidConfig {
            reason: reason.into(),
        }
    }
}
