pub mod kmeans;
pub mod lda;
pub mod report;
pub mod tfidf;
pub mod vocab;

use std::collections::BTreeMap;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::document::{NormalizedDoc, Record};
use crate::error::AnalysisError;
use crate::normalize::TermNormalizer;
use report::{AnalysisReport, CategoryOutcome, CategoryReport, DocTopic, SkipReason, TermRanking};
use tfidf::TfIdfMatrix;
use vocab::DocTermMatrix;

/// Orchestrates the per-category pipeline.
///
/// Normalization happens once over the whole corpus; grouping happens after.
/// Each category group then runs its own builder, TF-IDF transform,
/// clusterer and topic model on a rayon worker, with no state shared
/// between groups. A group flagged as insufficient is reported as skipped
/// and never aborts the other groups.
#[derive(Debug)]
pub struct CategoryAnalyzer {
    config: AnalysisConfig,
    normalizer: TermNormalizer,
}

impl CategoryAnalyzer {
    /// Validate the configuration and build the analyzer.
    ///
    /// This is the only fallible step of a run; everything after
    /// construction degrades per category instead of failing.
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let normalizer = TermNormalizer::new(&config.custom_stopwords);
        Ok(CategoryAnalyzer { config, normalizer })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Run the full pipeline over an in-memory record collection.
    pub fn run(&self, records: &[Record]) -> AnalysisReport {
        let total_records = records.len();

        let (kept, excluded_records) = self.filter_records(records);
        let (docs, empty_documents) = self.normalize_records(&kept);

        // sorted grouping keeps both report order and per-group seeds
        // independent of scheduling
        let mut groups: BTreeMap<String, Vec<NormalizedDoc>> = BTreeMap::new();
        for doc in docs {
            groups.entry(doc.category.clone()).or_default().push(doc);
        }
        let groups: Vec<(String, Vec<NormalizedDoc>)> = groups.into_iter().collect();

        info!(
            total_records,
            excluded_records,
            empty_documents,
            groups = groups.len(),
            "corpus grouped"
        );

        let categories: Vec<CategoryReport> = groups
            .par_iter()
            .enumerate()
            .map(|(idx, (category, docs))| {
                let seed = self.config.random_seed.wrapping_add(idx as u64);
                self.analyze_group(category, docs, seed)
            })
            .collect();

        AnalysisReport {
            categories,
            total_records,
            excluded_records,
            empty_documents,
        }
    }

    /// Drop records with a missing or excluded category label.
    fn filter_records<'a>(&self, records: &'a [Record]) -> (Vec<&'a Record>, usize) {
        let mut kept = Vec::with_capacity(records.len());
        let mut excluded = 0;
        for record in records {
            match &record.category {
                Some(category) if !self.config.excluded_categories.contains(category) => {
                    kept.push(record);
                }
                _ => excluded += 1,
            }
        }
        (kept, excluded)
    }

    /// Normalize the whole corpus in parallel, dropping documents that
    /// come out empty.
    fn normalize_records(&self, records: &[&Record]) -> (Vec<NormalizedDoc>, usize) {
        let normalized: Vec<Option<NormalizedDoc>> = records
            .par_iter()
            .map(|record| {
                let tokens = self.normalizer.normalize(&record.text);
                if tokens.is_empty() {
                    return None;
                }
                Some(NormalizedDoc {
                    id: record.id.clone(),
                    category: record.category.clone().unwrap_or_default(),
                    tokens,
                })
            })
            .collect();

        let empty = normalized.iter().filter(|d| d.is_none()).count();
        (normalized.into_iter().flatten().collect(), empty)
    }

    /// Run builder → TF-IDF → clusterer and builder → topic model for one
    /// category, isolated from every other group.
    fn analyze_group(&self, category: &str, docs: &[NormalizedDoc], seed: u64) -> CategoryReport {
        let cfg = &self.config;
        let documents = docs.len();

        if documents <= 1 {
            debug!(category, documents, "skipped: too few documents");
            return skipped(category, documents, 0, SkipReason::TooFewDocuments);
        }

        let Some(dtm) = DocTermMatrix::build(docs, cfg.min_term_length, cfg.sparsity_upper_bound)
        else {
            debug!(category, documents, "skipped: empty vocabulary");
            return skipped(category, documents, 0, SkipReason::EmptyVocabulary);
        };

        let dropped_documents = dtm.dropped_docs();
        if dtm.n_docs() <= 1 {
            debug!(category, "skipped: too few documents after pruning");
            return skipped(
                category,
                documents,
                dropped_documents,
                SkipReason::TooFewDocuments,
            );
        }

        let tfidf = TfIdfMatrix::transform(&dtm);
        let assignment = kmeans::cluster(&tfidf, cfg.k_clusters, seed, cfg.max_cluster_iterations);
        let model = lda::fit(
            &dtm,
            cfg.k_topics,
            cfg.lda_alpha,
            cfg.lda_beta,
            cfg.lda_iterations,
            seed,
        );

        let (Some(assignment), Some(model)) = (assignment, model) else {
            return skipped(
                category,
                documents,
                dropped_documents,
                SkipReason::TooFewDocuments,
            );
        };

        let clusters = assignment
            .centroids
            .iter()
            .enumerate()
            .map(|(i, centroid)| {
                TermRanking::from_weights(i, centroid, dtm.vocab(), cfg.top_n_terms)
            })
            .collect();

        let topics = model
            .topic_terms
            .iter()
            .enumerate()
            .map(|(i, probs)| TermRanking::from_weights(i, probs, dtm.vocab(), cfg.top_n_terms))
            .collect();

        let dominant_topics = dtm
            .doc_ids()
            .iter()
            .enumerate()
            .map(|(row, doc_id)| DocTopic {
                doc_id: doc_id.clone(),
                topic: model.dominant_topic(row),
            })
            .collect();

        CategoryReport {
            category: category.to_string(),
            documents,
            dropped_documents,
            outcome: CategoryOutcome::Analyzed {
                clusters,
                topics,
                dominant_topics,
            },
        }
    }
}

fn skipped(
    category: &str,
    documents: usize,
    dropped_documents: usize,
    reason: SkipReason,
) -> CategoryReport {
    CategoryReport {
        category: category.to_string(),
        documents,
        dropped_documents,
        outcome: CategoryOutcome::Skipped { reason },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn analyzer(config: AnalysisConfig) -> CategoryAnalyzer {
        CategoryAnalyzer::new(config).unwrap()
    }

    fn corpus() -> Vec<Record> {
        vec![
            Record::new("1", "I love my family and my dog", "married"),
            Record::new("2", "My family walks the dog every evening", "married"),
            Record::new("3", "Dogs and long walks with the family", "married"),
            Record::new("4", "Friends and parties make me happy", "single"),
            Record::new("5", "Happy hours and parties with friends downtown", "single"),
            Record::new("6", "My friends organize the best parties", "single"),
        ]
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let mut config = AnalysisConfig::default();
        config.top_n_terms = 0;
        assert!(CategoryAnalyzer::new(config).is_err());
    }

    #[test]
    fn records_without_category_are_counted_not_raised() {
        let mut records = corpus();
        records.push(Record {
            id: "7".to_string(),
            text: "no category here".to_string(),
            category: None,
        });
        let report = analyzer(AnalysisConfig::default()).run(&records);
        assert_eq!(report.total_records, 7);
        assert_eq!(report.excluded_records, 1);
        assert_eq!(report.categories.len(), 2);
    }

    #[test]
    fn excluded_categories_are_filtered() {
        let mut config = AnalysisConfig::default();
        config.excluded_categories.insert("single".to_string());
        let report = analyzer(config).run(&corpus());
        assert_eq!(report.excluded_records, 3);
        assert_eq!(report.categories.len(), 1);
        assert_eq!(report.categories[0].category, "married");
    }

    #[test]
    fn empty_text_documents_are_counted() {
        let mut records = corpus();
        records.push(Record::new("7", "!!! 123 ...", "married"));
        let report = analyzer(AnalysisConfig::default()).run(&records);
        assert_eq!(report.empty_documents, 1);
        assert_eq!(report.category("married").unwrap().documents, 3);
    }

    #[test]
    fn single_document_category_is_skipped_others_analyzed() {
        let mut records = corpus();
        records.push(Record::new("7", "My new job is going well", "divorced"));
        let report = analyzer(AnalysisConfig::default()).run(&records);

        let divorced = report.category("divorced").unwrap();
        assert!(matches!(
            divorced.outcome,
            CategoryOutcome::Skipped {
                reason: SkipReason::TooFewDocuments
            }
        ));
        assert!(!report.category("married").unwrap().is_skipped());
        assert!(!report.category("single").unwrap().is_skipped());
    }

    #[test]
    fn analyzed_category_has_rankings_from_its_own_vocabulary() {
        let mut config = AnalysisConfig::default();
        config.top_n_terms = 3;
        let report = analyzer(config).run(&corpus());

        let married = report.category("married").unwrap();
        let CategoryOutcome::Analyzed {
            clusters,
            topics,
            dominant_topics,
        } = &married.outcome
        else {
            panic!("married should be analyzed");
        };

        assert!(!clusters.is_empty());
        assert!(!topics.is_empty());
        assert_eq!(dominant_topics.len(), 3);
        for ranking in clusters.iter().chain(topics.iter()) {
            assert!(!ranking.terms.is_empty());
            assert!(ranking.terms.len() <= 3);
            for (term, _) in &ranking.terms {
                // stemmed and drawn from this category's documents only
                assert!(
                    ["love", "famili", "dog", "walk", "long", "even", "everi", "evening"]
                        .contains(&term.as_str()),
                    "unexpected term {term}"
                );
            }
        }
    }

    #[test]
    fn rerun_is_deterministic() {
        let analyzer = analyzer(AnalysisConfig::default());
        let records = corpus();
        let first = analyzer.run(&records);
        let second = analyzer.run(&records);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
