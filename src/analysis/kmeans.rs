use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::analysis::tfidf::TfIdfMatrix;

/// Result of partitioning a group's TF-IDF rows into k clusters.
#[derive(Debug, Clone)]
pub struct ClusterAssignment {
    /// Cluster label per matrix row.
    pub labels: Vec<usize>,
    /// Final centroid per cluster, in TF-IDF space.
    pub centroids: Vec<Vec<f64>>,
    /// Effective cluster count, `min(k_requested, rows)`.
    pub k: usize,
}

impl ClusterAssignment {
    /// Row indices assigned to one cluster.
    pub fn members(&self, cluster: usize) -> Vec<usize> {
        self.labels
            .iter()
            .enumerate()
            .filter(|&(_, &label)| label == cluster)
            .map(|(i, _)| i)
            .collect()
    }
}

/// Lloyd's algorithm over the rows of a TF-IDF matrix.
///
/// Returns `None` when the group has one row or fewer: no partition of a
/// single document is meaningful, and the caller reports that instead of
/// aborting. Otherwise the result is deterministic for a given matrix and
/// seed: centroids start at `effective_k` distinct rows chosen by the
/// seeded RNG, assignment ties keep the lowest centroid index, and the loop
/// stops once assignments stabilize or `max_iterations` is reached.
pub fn cluster(
    matrix: &TfIdfMatrix,
    k_requested: usize,
    seed: u64,
    max_iterations: usize,
) -> Option<ClusterAssignment> {
    let n = matrix.n_rows();
    if n <= 1 {
        return None;
    }
    let k = k_requested.min(n);
    let dim = matrix.n_terms();

    let mut rng = StdRng::seed_from_u64(seed);
    let mut centroids: Vec<Vec<f64>> = rand::seq::index::sample(&mut rng, n, k)
        .into_iter()
        .map(|i| matrix.row(i).to_vec())
        .collect();

    let mut labels = vec![0usize; n];
    for iteration in 0..max_iterations {
        let mut changed = false;

        for (i, row) in matrix.rows().iter().enumerate() {
            let mut best = 0usize;
            let mut best_dist = f64::MAX;
            for (c, centroid) in centroids.iter().enumerate() {
                let dist: f64 = row
                    .iter()
                    .zip(centroid.iter())
                    .map(|(a, b)| (a - b) * (a - b))
                    .sum();
                // strict `<` keeps the lowest index on exact ties
                if dist < best_dist {
                    best_dist = dist;
                    best = c;
                }
            }
            if labels[i] != best {
                labels[i] = best;
                changed = true;
            }
        }

        if !changed {
            debug!(iteration, k, "cluster assignments stabilized");
            break;
        }

        let mut sums = vec![vec![0.0f64; dim]; k];
        let mut counts = vec![0usize; k];
        for (i, row) in matrix.rows().iter().enumerate() {
            let c = labels[i];
            counts[c] += 1;
            for (d, &val) in row.iter().enumerate() {
                sums[c][d] += val;
            }
        }
        for c in 0..k {
            // an emptied cluster keeps its previous centroid
            if counts[c] > 0 {
                for d in 0..dim {
                    centroids[c][d] = sums[c][d] / counts[c] as f64;
                }
            }
        }
    }

    Some(ClusterAssignment {
        labels,
        centroids,
        k,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::vocab::DocTermMatrix;
    use crate::document::NormalizedDoc;

    fn doc(id: &str, tokens: &[&str]) -> NormalizedDoc {
        NormalizedDoc {
            id: id.to_string(),
            category: "test".to_string(),
            tokens: tokens.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn matrix(docs: &[NormalizedDoc]) -> TfIdfMatrix {
        let dtm = DocTermMatrix::build(docs, 3, 1.0).unwrap();
        TfIdfMatrix::transform(&dtm)
    }

    #[test]
    fn single_row_is_insufficient() {
        let docs = vec![doc("a", &["dog", "cat"])];
        assert!(cluster(&matrix(&docs), 5, 1, 100).is_none());
    }

    #[test]
    fn k_is_capped_at_row_count() {
        let docs = vec![doc("a", &["dog"]), doc("b", &["cat"])];
        let assignment = cluster(&matrix(&docs), 5, 1, 100).unwrap();
        assert_eq!(assignment.k, 2);
        assert_eq!(assignment.labels.len(), 2);
        assert!(assignment.labels.iter().all(|&l| l < 2));
    }

    #[test]
    fn same_seed_same_assignment() {
        let docs = vec![
            doc("a", &["dog", "dog", "cat"]),
            doc("b", &["dog", "cat", "cat"]),
            doc("c", &["fish", "fish", "coral"]),
            doc("d", &["fish", "coral", "coral"]),
            doc("e", &["bird", "wing"]),
        ];
        let m = matrix(&docs);
        let first = cluster(&m, 2, 7, 100).unwrap();
        let second = cluster(&m, 2, 7, 100).unwrap();
        assert_eq!(first.labels, second.labels);
        assert_eq!(first.centroids, second.centroids);
    }

    #[test]
    fn separated_groups_land_in_distinct_clusters() {
        let docs = vec![
            doc("a", &["dog", "dog", "leash"]),
            doc("b", &["dog", "leash", "leash"]),
            doc("c", &["fish", "fish", "coral"]),
            doc("d", &["fish", "coral", "coral"]),
        ];
        let assignment = cluster(&matrix(&docs), 2, 3, 100).unwrap();
        assert_eq!(assignment.labels[0], assignment.labels[1]);
        assert_eq!(assignment.labels[2], assignment.labels[3]);
        assert_ne!(assignment.labels[0], assignment.labels[2]);
    }

    #[test]
    fn members_lists_rows_of_a_cluster() {
        let docs = vec![
            doc("a", &["dog", "dog"]),
            doc("b", &["dog", "dog"]),
            doc("c", &["fish", "fish"]),
        ];
        let assignment = cluster(&matrix(&docs), 2, 11, 100).unwrap();
        let all: usize = (0..assignment.k).map(|c| assignment.members(c).len()).sum();
        assert_eq!(all, 3);
    }
}
