use serde::{Deserialize, Serialize};

use crate::analysis::vocab::Vocabulary;

/// Why a category was skipped instead of analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// One usable document or fewer; neither clustering nor topic modeling
    /// is meaningful.
    TooFewDocuments,
    /// No term survived vocabulary pruning.
    EmptyVocabulary,
}

/// Top-N terms of one cluster or topic, descending by weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermRanking {
    /// Cluster or topic index within its category.
    pub index: usize,
    pub terms: Vec<(String, f64)>,
}

impl TermRanking {
    /// Rank a dense weight row against the vocabulary and keep the top
    /// `n` terms. Equal weights fall back to column order, which keeps the
    /// ranking stable across runs.
    pub(crate) fn from_weights(index: usize, weights: &[f64], vocab: &Vocabulary, n: usize) -> Self {
        let mut cols: Vec<usize> = (0..weights.len()).collect();
        cols.sort_by(|&a, &b| {
            weights[b]
                .partial_cmp(&weights[a])
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.cmp(&b))
        });
        let terms = cols
            .into_iter()
            .take(n)
            .filter_map(|col| {
                vocab
                    .term(col as u32)
                    .map(|t| (t.to_string(), weights[col]))
            })
            .collect();
        TermRanking { index, terms }
    }
}

/// A document's dominant topic within its category's model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocTopic {
    pub doc_id: String,
    pub topic: usize,
}

/// Outcome of one category's pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CategoryOutcome {
    Analyzed {
        /// One ranking per cluster, from centroid TF-IDF weights.
        clusters: Vec<TermRanking>,
        /// One ranking per topic, from term probabilities.
        topics: Vec<TermRanking>,
        /// Dominant topic per retained document.
        dominant_topics: Vec<DocTopic>,
    },
    Skipped {
        reason: SkipReason,
    },
}

/// Per-category results. Skipped categories appear here explicitly;
/// silent omission is not allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    /// Usable (non-empty) documents the group started with.
    pub documents: usize,
    /// Documents dropped as all-zero rows after vocabulary pruning.
    pub dropped_documents: usize,
    pub outcome: CategoryOutcome,
}

impl CategoryReport {
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, CategoryOutcome::Skipped { .. })
    }
}

/// Full run output: the only surface downstream consumers read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// One entry per category, sorted by category label.
    pub categories: Vec<CategoryReport>,
    /// Input records seen.
    pub total_records: usize,
    /// Records dropped for a missing or excluded category label.
    pub excluded_records: usize,
    /// Records whose text normalized to zero tokens.
    pub empty_documents: usize,
}

impl AnalysisReport {
    pub fn category(&self, label: &str) -> Option<&CategoryReport> {
        self.categories.iter().find(|c| c.category == label)
    }
}
