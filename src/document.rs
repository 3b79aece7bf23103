use serde::{Deserialize, Serialize};

/// A raw input record: one free-text entry tagged with a category.
///
/// Records reach the pipeline already loaded in memory; ingestion and
/// merging of tabular sources happen outside this crate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub text: String,
    /// `None` marks a record with no usable category label. Such records are
    /// filtered out and counted, never raised as errors.
    pub category: Option<String>,
}

impl Record {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Record {
            id: id.into(),
            text: text.into(),
            category: Some(category.into()),
        }
    }
}

/// A record after normalization: an ordered sequence of stemmed,
/// stop-word-filtered terms.
///
/// A document whose token list came out empty is excluded from every
/// downstream matrix.
#[derive(Debug, Clone)]
pub struct NormalizedDoc {
    pub id: String,
    pub category: String,
    pub tokens: Vec<String>,
}
