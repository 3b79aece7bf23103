use crate::analysis::vocab::DocTermMatrix;

/// Dense TF-IDF weights for one group, rows parallel to the source matrix.
///
/// `weight(d, t) = count(d, t) / total(d) * ln(n_docs / doc_freq(t))`
///
/// The logarithm is natural throughout the crate. The IDF base is the
/// group's own document count: each category is its own weighting universe.
#[derive(Debug, Clone)]
pub struct TfIdfMatrix {
    rows: Vec<Vec<f64>>,
    n_terms: usize,
}

impl TfIdfMatrix {
    /// Reweight a count matrix into TF-IDF scores. Pure; the input is left
    /// untouched.
    ///
    /// Both divisions are well defined: zero-total rows were dropped at
    /// build time and a vocabulary term occurs in at least one document.
    pub fn transform(dtm: &DocTermMatrix) -> Self {
        let n_docs = dtm.n_docs() as f64;
        let n_terms = dtm.n_terms();
        let idf: Vec<f64> = (0..n_terms as u32)
            .map(|col| (n_docs / dtm.vocab().doc_freq(col) as f64).ln())
            .collect();

        let rows = dtm
            .rows()
            .iter()
            .map(|row| {
                let mut dense = vec![0.0; n_terms];
                for &(col, count) in &row.cells {
                    let tf = count as f64 / row.total as f64;
                    dense[col as usize] = tf * idf[col as usize];
                }
                dense
            })
            .collect();

        TfIdfMatrix { rows, n_terms }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_terms(&self) -> usize {
        self.n_terms
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.rows[i]
    }
}
