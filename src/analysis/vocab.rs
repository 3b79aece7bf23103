use indexmap::IndexMap;
use tracing::debug;

use crate::document::NormalizedDoc;

/// Vocabulary of one analysis group.
///
/// Maps each retained term to a contiguous column index in first-seen order,
/// which keeps column assignment deterministic for a given document order.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    terms: IndexMap<String, u32>,
    doc_freq: Vec<u32>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Column index of a term, if retained.
    pub fn col(&self, term: &str) -> Option<u32> {
        self.terms.get(term).copied()
    }

    /// Term at a column index.
    pub fn term(&self, col: u32) -> Option<&str> {
        self.terms.get_index(col as usize).map(|(t, _)| t.as_str())
    }

    /// Number of the group's documents containing the term at `col`.
    pub fn doc_freq(&self, col: u32) -> u32 {
        self.doc_freq[col as usize]
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.keys().map(|t| t.as_str())
    }
}

/// One document's sparse count row.
#[derive(Debug, Clone)]
pub struct SparseRow {
    /// (column, count) pairs in ascending column order.
    pub cells: Vec<(u32, u32)>,
    /// Sum of all counts in the row; strictly positive for retained rows.
    pub total: u64,
}

/// Sparse document-term matrix over a group's vocabulary.
///
/// Rows whose total count came out zero after pruning are dropped at build
/// time without renumbering any column; the drop count is kept for
/// diagnostics.
#[derive(Debug, Clone)]
pub struct DocTermMatrix {
    vocab: Vocabulary,
    rows: Vec<SparseRow>,
    doc_ids: Vec<String>,
    dropped_docs: usize,
}

impl DocTermMatrix {
    /// Build the vocabulary and count matrix for one group.
    ///
    /// A term is retained when it is at least `min_term_length` characters
    /// long and appears in at most `sparsity_upper_bound` of the group's
    /// documents. Returns `None` when no term survives pruning, which the
    /// caller must treat as insufficient data for the group.
    pub fn build(
        docs: &[NormalizedDoc],
        min_term_length: usize,
        sparsity_upper_bound: f64,
    ) -> Option<Self> {
        let n_docs = docs.len();

        // document frequency in first-seen order
        let mut df: IndexMap<&str, u32> = IndexMap::new();
        for doc in docs {
            let mut seen: IndexMap<&str, ()> = IndexMap::new();
            for token in &doc.tokens {
                seen.entry(token.as_str()).or_insert(());
            }
            for (token, _) in seen {
                *df.entry(token).or_insert(0) += 1;
            }
        }

        let max_df = sparsity_upper_bound * n_docs as f64;
        let mut terms: IndexMap<String, u32> = IndexMap::new();
        let mut doc_freq: Vec<u32> = Vec::new();
        for (token, freq) in &df {
            if token.chars().count() < min_term_length {
                continue;
            }
            if (*freq as f64) > max_df {
                continue;
            }
            terms.insert((*token).to_string(), terms.len() as u32);
            doc_freq.push(*freq);
        }

        if terms.is_empty() {
            debug!(documents = n_docs, "vocabulary empty after pruning");
            return None;
        }

        let vocab = Vocabulary { terms, doc_freq };

        let mut rows = Vec::with_capacity(n_docs);
        let mut doc_ids = Vec::with_capacity(n_docs);
        let mut dropped_docs = 0;
        for doc in docs {
            let mut counts: IndexMap<u32, u32> = IndexMap::new();
            for token in &doc.tokens {
                if let Some(col) = vocab.col(token) {
                    *counts.entry(col).or_insert(0) += 1;
                }
            }
            let total: u64 = counts.values().map(|&c| c as u64).sum();
            if total == 0 {
                dropped_docs += 1;
                continue;
            }
            let mut cells: Vec<(u32, u32)> = counts.into_iter().collect();
            cells.sort_unstable_by_key(|&(col, _)| col);
            rows.push(SparseRow { cells, total });
            doc_ids.push(doc.id.clone());
        }

        if dropped_docs > 0 {
            debug!(dropped = dropped_docs, "documents dropped as all-zero rows");
        }

        Some(DocTermMatrix {
            vocab,
            rows,
            doc_ids,
            dropped_docs,
        })
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Number of retained documents (rows).
    pub fn n_docs(&self) -> usize {
        self.rows.len()
    }

    /// Number of vocabulary terms (columns).
    pub fn n_terms(&self) -> usize {
        self.vocab.len()
    }

    pub fn rows(&self) -> &[SparseRow] {
        &self.rows
    }

    /// Document ids parallel to `rows()`.
    pub fn doc_ids(&self) -> &[String] {
        &self.doc_ids
    }

    /// How many documents were dropped for having an all-zero row.
    pub fn dropped_docs(&self) -> usize {
        self.dropped_docs
    }
}
