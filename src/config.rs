use std::collections::HashSet;

use crate::error::AnalysisError;

/// Configuration for one analysis run.
///
/// Every knob the pipeline reads lives here; there is no process-wide mutable
/// state. The struct is validated once, up front, and then treated as
/// immutable for the whole run.
///
/// # Examples
/// ```
/// use topic_miner::AnalysisConfig;
///
/// let mut config = AnalysisConfig::default();
/// config.top_n_terms = 3;
/// config.custom_stopwords.insert("today".to_string());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Stop words added on top of the base English list.
    pub custom_stopwords: HashSet<String>,
    /// Category labels dropped before grouping (placeholder values etc.).
    pub excluded_categories: HashSet<String>,
    /// Minimum character length for a vocabulary term.
    pub min_term_length: usize,
    /// A term present in more than this fraction of a group's documents is
    /// pruned as non-discriminating. Must lie in (0, 1].
    pub sparsity_upper_bound: f64,
    /// Requested cluster count; capped at the group's document count.
    pub k_clusters: usize,
    /// Requested topic count; capped at the group's document count.
    pub k_topics: usize,
    /// Length of each cluster/topic term ranking.
    pub top_n_terms: usize,
    /// Base seed. Each category group derives its own seed from this, so
    /// repeated runs are reproducible regardless of scheduling.
    pub random_seed: u64,
    /// Iteration cap for Lloyd's algorithm.
    pub max_cluster_iterations: usize,
    /// Gibbs sweeps for the topic model.
    pub lda_iterations: usize,
    /// Document-topic Dirichlet prior.
    pub lda_alpha: f64,
    /// Topic-term Dirichlet prior.
    pub lda_beta: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            custom_stopwords: HashSet::new(),
            excluded_categories: HashSet::new(),
            min_term_length: 3,
            sparsity_upper_bound: 0.98,
            k_clusters: 5,
            k_topics: 5,
            top_n_terms: 10,
            random_seed: 42,
            max_cluster_iterations: 100,
            lda_iterations: 100,
            lda_alpha: 0.1,
            lda_beta: 0.01,
        }
    }
}

impl AnalysisConfig {
    /// Reject nonsensical configuration before any computation starts.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.min_term_length == 0 {
            return Err(AnalysisError::config("min_term_length must be >= 1"));
        }
        if !(self.sparsity_upper_bound > 0.0 && self.sparsity_upper_bound <= 1.0) {
            return Err(AnalysisError::config(
                "sparsity_upper_bound must lie in (0, 1]",
            ));
        }
        if self.k_clusters == 0 {
            return Err(AnalysisError::config("k_clusters must be >= 1"));
        }
        if self.k_topics == 0 {
            return Err(AnalysisError::config("k_topics must be >= 1"));
        }
        if self.top_n_terms == 0 {
            return Err(AnalysisError::config("top_n_terms must be >= 1"));
        }
        if self.max_cluster_iterations == 0 {
            return Err(AnalysisError::config("max_cluster_iterations must be >= 1"));
        }
        if self.lda_iterations == 0 {
            return Err(AnalysisError::config("lda_iterations must be >= 1"));
        }
        if !(self.lda_alpha.is_finite() && self.lda_alpha > 0.0) {
            return Err(AnalysisError::config("lda_alpha must be finite and > 0"));
        }
        if !(self.lda_beta.is_finite() && self.lda_beta > 0.0) {
            return Err(AnalysisError::config("lda_beta must be finite and > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_top_n_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.top_n_terms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn sparsity_bound_must_be_in_unit_interval() {
        let mut config = AnalysisConfig::default();
        config.sparsity_upper_bound = 0.0;
        assert!(config.validate().is_err());
        config.sparsity_upper_bound = 1.5;
        assert!(config.validate().is_err());
        config.sparsity_upper_bound = 1.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_k_is_rejected() {
        let mut config = AnalysisConfig::default();
        config.k_clusters = 0;
        assert!(config.validate().is_err());

        let mut config = AnalysisConfig::default();
        config.k_topics = 0;
        assert!(config.validate().is_err());
    }
}
