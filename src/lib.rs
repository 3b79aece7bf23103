/// This crate is a category-conditioned text analytics pipeline.
/// It normalizes a corpus of short free-text entries, groups them by a
/// categorical attribute, and surfaces each category's dominant vocabulary
/// through TF-IDF weighting, centroid clustering and a Dirichlet-multinomial
/// topic model — all seeded and reproducible.
pub mod analysis;
pub mod config;
pub mod document;
pub mod error;
pub mod normalize;

/// Category Analyzer
/// The top-level struct of this crate. It validates a configuration once,
/// then drives the whole pipeline over an in-memory record collection:
/// normalization, per-category matrix construction, TF-IDF, clustering and
/// topic modeling, with categories processed in parallel and in isolation.
///
/// Construction fails on nonsensical configuration; nothing else is fatal.
/// Per-category insufficiency is reported, never raised.
pub use analysis::CategoryAnalyzer;

/// Analysis Report
/// The sole output surface of the pipeline. For each category it carries
/// the cluster term rankings, the topic term rankings, the per-document
/// dominant topics, or an explicit skip marker with its reason. Corpus-wide
/// counters record excluded and empty documents. Serializable with serde.
pub use analysis::report::AnalysisReport;

/// Per-category report entry and its outcome variants.
/// A `CategoryReport` is either `Analyzed` with its term rankings or
/// `Skipped` with a `SkipReason`; skipped categories are always present in
/// the report rather than silently omitted.
pub use analysis::report::{CategoryOutcome, CategoryReport, DocTopic, SkipReason, TermRanking};

/// Analysis Configuration
/// Every knob of a run: stop-word additions, vocabulary pruning bounds,
/// cluster and topic counts, ranking length, iteration caps and the random
/// seed. Validated up front, immutable afterwards.
pub use config::AnalysisConfig;

/// Input record: one free-text entry tagged with an optional category.
pub use document::Record;

/// Fatal error type. Only configuration problems abort a run.
pub use error::AnalysisError;

/// Term Normalizer
/// Converts raw text into stemmed, stop-word-filtered alphabetic terms.
/// Exposed for callers that want to inspect or reuse the normalization
/// stage on its own.
pub use normalize::TermNormalizer;
