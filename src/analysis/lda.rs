use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::analysis::vocab::DocTermMatrix;

/// A fitted Dirichlet-multinomial topic model for one group.
///
/// Each category owns its own instance; no parameters are shared across
/// groups.
#[derive(Debug, Clone)]
pub struct TopicModel {
    /// Effective topic count, `min(k_requested, documents)`.
    pub k: usize,
    /// Per-topic term distribution, `k` rows of vocabulary length.
    /// Every row sums to 1.
    pub topic_terms: Vec<Vec<f64>>,
    /// Per-document topic distribution, one row per retained document.
    /// Every row sums to 1.
    pub doc_topics: Vec<Vec<f64>>,
}

impl TopicModel {
    /// Dominant topic of a document: argmax of its topic row, lowest topic
    /// index on exact ties.
    pub fn dominant_topic(&self, doc: usize) -> usize {
        let row = &self.doc_topics[doc];
        let mut best = 0usize;
        let mut best_prob = row[0];
        for (topic, &prob) in row.iter().enumerate().skip(1) {
            if prob > best_prob {
                best_prob = prob;
                best = topic;
            }
        }
        best
    }
}

/// Fit a topic model by collapsed Gibbs sampling over the count matrix.
///
/// Returns `None` when the group has one retained document or fewer; a
/// mixture over a single document is not meaningful. Inference is seeded
/// and iteration-bounded, so a given (matrix, config, seed) always produces
/// the same model. A vocabulary too small for the requested topic count is
/// accepted; the resulting term lists may be degenerate but stay
/// reproducible.
pub fn fit(
    dtm: &DocTermMatrix,
    k_requested: usize,
    alpha: f64,
    beta: f64,
    iterations: usize,
    seed: u64,
) -> Option<TopicModel> {
    let n_docs = dtm.n_docs();
    if n_docs <= 1 {
        return None;
    }
    let k = k_requested.min(n_docs);
    let n_terms = dtm.n_terms();

    // expand sparse rows into one word id per token instance
    let docs: Vec<Vec<u32>> = dtm
        .rows()
        .iter()
        .map(|row| {
            let mut words = Vec::with_capacity(row.total as usize);
            for &(col, count) in &row.cells {
                for _ in 0..count {
                    words.push(col);
                }
            }
            words
        })
        .collect();

    let mut term_topic = vec![vec![0u32; k]; n_terms];
    let mut doc_topic = vec![vec![0u32; k]; n_docs];
    let mut topic_total = vec![0u64; k];

    let mut rng = StdRng::seed_from_u64(seed);

    // random initial assignment
    let mut assignments: Vec<Vec<usize>> = Vec::with_capacity(n_docs);
    for (d, words) in docs.iter().enumerate() {
        let mut z = Vec::with_capacity(words.len());
        for &w in words {
            let topic = rng.random_range(0..k);
            term_topic[w as usize][topic] += 1;
            doc_topic[d][topic] += 1;
            topic_total[topic] += 1;
            z.push(topic);
        }
        assignments.push(z);
    }

    let beta_sum = beta * n_terms as f64;
    let mut weights = vec![0.0f64; k];
    for _ in 0..iterations {
        for (d, words) in docs.iter().enumerate() {
            for (pos, &w) in words.iter().enumerate() {
                let old = assignments[d][pos];
                term_topic[w as usize][old] -= 1;
                doc_topic[d][old] -= 1;
                topic_total[old] -= 1;

                // full conditional: p(z = t) ∝
                //   (n_wt + beta) / (n_t + V beta) * (n_dt + alpha)
                let mut sum = 0.0;
                for t in 0..k {
                    let word_part = (term_topic[w as usize][t] as f64 + beta)
                        / (topic_total[t] as f64 + beta_sum);
                    let doc_part = doc_topic[d][t] as f64 + alpha;
                    sum += word_part * doc_part;
                    weights[t] = sum;
                }

                let draw = rng.random::<f64>() * sum;
                let mut new = k - 1;
                for (t, &cumulative) in weights.iter().enumerate() {
                    if draw < cumulative {
                        new = t;
                        break;
                    }
                }

                term_topic[w as usize][new] += 1;
                doc_topic[d][new] += 1;
                topic_total[new] += 1;
                assignments[d][pos] = new;
            }
        }
    }
    debug!(k, iterations, documents = n_docs, "topic model fitted");

    // smoothed point estimates from the final sample
    let topic_terms: Vec<Vec<f64>> = (0..k)
        .map(|t| {
            let denom = topic_total[t] as f64 + beta_sum;
            (0..n_terms)
                .map(|w| (term_topic[w][t] as f64 + beta) / denom)
                .collect()
        })
        .collect();

    let alpha_sum = alpha * k as f64;
    let doc_topics: Vec<Vec<f64>> = (0..n_docs)
        .map(|d| {
            let total: u32 = doc_topic[d].iter().sum();
            let denom = total as f64 + alpha_sum;
            (0..k)
                .map(|t| (doc_topic[d][t] as f64 + alpha) / denom)
                .collect()
        })
        .collect();

    Some(TopicModel {
        k,
        topic_terms,
        doc_topics,
    })
}
