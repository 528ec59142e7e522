//! Document vectors built from external vector-space collaborators.
//!
//! Fitting TF-IDF weights, word embeddings and paragraph vectors is left to
//! the caller. This module only defines the seams those models plug into
//! and combines their outputs per message.

use std::collections::BTreeMap;

use tracing::info;

use crate::error::{Error, Result};
use crate::table::MessageTable;

/// Row-major dense matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DenseMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    /// Creates a zero matrix.
    #[must_use]
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Creates a matrix from equally long rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if a row's length differs from
    /// the first row's.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        let mut data = Vec::with_capacity(rows.len() * cols);
        for row in &rows {
            if row.len() != cols {
                return Err(Error::DimensionMismatch {
                    what: "matrix row length",
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Returns `(rows, cols)`.
    #[must_use]
    pub const fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Returns row `r`, if in range.
    #[must_use]
    pub fn row(&self, r: usize) -> Option<&[f64]> {
        (r < self.rows).then(|| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    /// Returns the value at `(r, c)`, if in range.
    #[must_use]
    pub fn get(&self, r: usize, c: usize) -> Option<f64> {
        (r < self.rows && c < self.cols).then(|| self.data[r * self.cols + c])
    }

    fn row_mut(&mut self, r: usize) -> &mut [f64] {
        &mut self.data[r * self.cols..(r + 1) * self.cols]
    }
}

/// Sparse matrix stored as `(column, value)` pairs per row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseMatrix {
    cols: usize,
    rows: Vec<Vec<(usize, f64)>>,
}

impl SparseMatrix {
    /// Creates an empty matrix with `cols` columns.
    #[must_use]
    pub const fn new(cols: usize) -> Self {
        Self {
            cols,
            rows: Vec::new(),
        }
    }

    /// Appends a row.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if a column is out of range.
    pub fn push_row(&mut self, entries: Vec<(usize, f64)>) -> Result<()> {
        if let Some(&(col, _)) = entries.iter().find(|(col, _)| *col >= self.cols) {
            return Err(Error::DimensionMismatch {
                what: "sparse column index",
                expected: self.cols,
                found: col,
            });
        }
        self.rows.push(entries);
        Ok(())
    }

    /// Returns `(rows, cols)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows.len(), self.cols)
    }

    /// Non-zero entries of row `r`.
    #[must_use]
    pub fn row(&self, r: usize) -> Option<&[(usize, f64)]> {
        self.rows.get(r).map(Vec::as_slice)
    }
}

/// TF-IDF weights produced by a [`TfidfTransform`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TfidfOutput {
    /// Document-term matrix, one row per document.
    pub matrix: SparseMatrix,
    /// Word to matrix column, as fitted by the transform.
    pub vocabulary: BTreeMap<String, usize>,
}

/// Fits TF-IDF weights over documents with a fixed vocabulary.
pub trait TfidfTransform {
    /// Fits and transforms `documents`.
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`Error::Collaborator`].
    fn fit_transform(&self, documents: &[&str], vocabulary: &[String]) -> Result<TfidfOutput>;
}

/// Word to vector lookup table.
pub trait WordEmbeddings {
    /// Length of every vector.
    fn dimension(&self) -> usize;

    /// Vector for `word`, if present.
    fn vector(&self, word: &str) -> Option<&[f64]>;

    /// Check if `word` has a vector.
    fn contains(&self, word: &str) -> bool {
        self.vector(word).is_some()
    }

    /// Vectors for many words at once.
    fn vectors<'a>(&'a self, words: &[&str]) -> Vec<Option<&'a [f64]>> {
        words.iter().map(|word| self.vector(word)).collect()
    }
}

/// Builds one paragraph vector per text.
pub trait ParagraphEmbedder {
    /// Returns a `texts.len() x dimension` matrix.
    ///
    /// # Errors
    ///
    /// Implementations report failures as [`Error::Collaborator`].
    fn embed(&self, texts: &[&str], dimension: usize) -> Result<DenseMatrix>;
}

impl WordEmbeddings for BTreeMap<String, Vec<f64>> {
    fn dimension(&self) -> usize {
        self.values().next().map_or(0, Vec::len)
    }

    fn vector(&self, word: &str) -> Option<&[f64]> {
        self.get(word).map(Vec::as_slice)
    }
}

/// Per-message vectors derived from the cleaned bodies.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentVectors {
    tfidf: SparseMatrix,
    id_to_word: BTreeMap<usize, String>,
    word_vectors: BTreeMap<String, Vec<f64>>,
    avg_embeddings: DenseMatrix,
    paragraph_vectors: DenseMatrix,
}

impl DocumentVectors {
    /// Runs the collaborators over the table's cleaned bodies.
    ///
    /// `vocabulary` maps token ids to words. The averaged embedding of a
    /// message is the sum over vocabulary columns of its TF-IDF weight
    /// times the word's vector; words without a vector are skipped.
    /// Paragraph vectors use the embedding dimension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyEmbeddings`] if no vocabulary word has a
    /// vector, [`Error::DimensionMismatch`] if a collaborator's output shape
    /// disagrees with the table or the embedding dimension, and any
    /// collaborator error unchanged.
    pub fn build(
        table: &MessageTable,
        vocabulary: &BTreeMap<usize, String>,
        tfidf: &dyn TfidfTransform,
        embeddings: &dyn WordEmbeddings,
        paragraphs: &dyn ParagraphEmbedder,
    ) -> Result<Self> {
        let documents: Vec<&str> = table.iter().map(|msg| msg.clean_body.as_str()).collect();
        let words: Vec<String> = vocabulary.values().cloned().collect();

        let TfidfOutput {
            matrix,
            vocabulary: word_to_id,
        } = tfidf.fit_transform(&documents, &words)?;
        let (rows, cols) = matrix.shape();
        check_len("tfidf rows", documents.len(), rows)?;
        let id_to_word: BTreeMap<usize, String> = word_to_id
            .into_iter()
            .map(|(word, id)| (id, word))
            .collect();
        if let Some((&id, _)) = id_to_word.iter().find(|(id, _)| **id >= cols) {
            return Err(Error::DimensionMismatch {
                what: "tfidf vocabulary column",
                expected: cols,
                found: id,
            });
        }

        let dimension = embeddings.dimension();
        let lookup: Vec<&str> = words.iter().map(String::as_str).collect();
        let mut word_vectors = BTreeMap::new();
        for (word, vector) in lookup.iter().zip(embeddings.vectors(&lookup)) {
            if let Some(vector) = vector {
                check_len("embedding dimension", dimension, vector.len())?;
                word_vectors.insert((*word).to_string(), vector.to_vec());
            }
        }
        if word_vectors.is_empty() {
            return Err(Error::EmptyEmbeddings);
        }

        let mut avg_embeddings = DenseMatrix::zeros(rows, dimension);
        for doc in 0..rows {
            let out = avg_embeddings.row_mut(doc);
            for &(col, weight) in matrix.row(doc).unwrap_or_default() {
                let Some(vector) = id_to_word.get(&col).and_then(|w| word_vectors.get(w)) else {
                    continue;
                };
                for (acc, value) in out.iter_mut().zip(vector) {
                    *acc += weight * value;
                }
            }
        }

        let paragraph_vectors = paragraphs.embed(&documents, dimension)?;
        let (p_rows, p_cols) = paragraph_vectors.shape();
        check_len("paragraph vector rows", documents.len(), p_rows)?;
        check_len("paragraph vector dimension", dimension, p_cols)?;

        info!(
            "Document vectors: {} documents, {} of {} words embedded, dimension {}",
            rows,
            word_vectors.len(),
            words.len(),
            dimension
        );

        Ok(Self {
            tfidf: matrix,
            id_to_word,
            word_vectors,
            avg_embeddings,
            paragraph_vectors,
        })
    }

    /// Document-term TF-IDF matrix.
    #[must_use]
    pub const fn tfidf(&self) -> &SparseMatrix {
        &self.tfidf
    }

    /// Column id to word, as fitted by the TF-IDF transform.
    #[must_use]
    pub const fn id_to_word(&self) -> &BTreeMap<usize, String> {
        &self.id_to_word
    }

    /// Vocabulary words that have an embedding.
    #[must_use]
    pub const fn word_vectors(&self) -> &BTreeMap<String, Vec<f64>> {
        &self.word_vectors
    }

    /// TF-IDF weighted embedding sum per document.
    #[must_use]
    pub const fn avg_embeddings(&self) -> &DenseMatrix {
        &self.avg_embeddings
    }

    /// Paragraph vector per document.
    #[must_use]
    pub const fn paragraph_vectors(&self) -> &DenseMatrix {
        &self.paragraph_vectors
    }

    /// Number of documents.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.avg_embeddings.rows
    }

    /// Check if there are no documents.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(Error::DimensionMismatch {
            what,
            expected,
            found,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::table::Message;

    /// Term-frequency "TF-IDF": counts of vocabulary words per document.
    struct Counts;

    impl TfidfTransform for Counts {
        fn fit_transform(&self, documents: &[&str], vocabulary: &[String]) -> Result<TfidfOutput> {
            let word_to_id: BTreeMap<String, usize> = vocabulary
                .iter()
                .enumerate()
                .map(|(id, word)| (word.clone(), id))
                .collect();
            let mut matrix = SparseMatrix::new(vocabulary.len());
            for doc in documents {
                let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
                for token in doc.split_whitespace() {
                    if let Some(&id) = word_to_id.get(token) {
                        *counts.entry(id).or_default() += 1.0;
                    }
                }
                matrix.push_row(counts.into_iter().collect())?;
            }
            Ok(TfidfOutput {
                matrix,
                vocabulary: word_to_id,
            })
        }
    }

    struct Constant(f64);

    impl ParagraphEmbedder for Constant {
        fn embed(&self, texts: &[&str], dimension: usize) -> Result<DenseMatrix> {
            DenseMatrix::from_rows(vec![vec![self.0; dimension]; texts.len()])
        }
    }

    struct Failing;

    impl ParagraphEmbedder for Failing {
        fn embed(&self, _texts: &[&str], _dimension: usize) -> Result<DenseMatrix> {
            Err(Error::Collaborator("model not trained".to_string()))
        }
    }

    fn table() -> MessageTable {
        MessageTable::new(vec![
            Message::new(0, "a", "inbox").with_clean_body("budget budget meeting"),
            Message::new(1, "b", "inbox").with_clean_body("lunch meeting unknown"),
            Message::new(2, "c", "inbox"),
        ])
    }

    fn vocabulary() -> BTreeMap<usize, String> {
        ["budget", "meeting", "lunch"]
            .into_iter()
            .enumerate()
            .map(|(id, word)| (id, word.to_string()))
            .collect()
    }

    fn embeddings() -> BTreeMap<String, Vec<f64>> {
        BTreeMap::from([
            ("budget".to_string(), vec![1.0, 0.0]),
            ("meeting".to_string(), vec![0.0, 1.0]),
        ])
    }

    #[test]
    fn test_weighted_embedding_sum() {
        let vectors =
            DocumentVectors::build(&table(), &vocabulary(), &Counts, &embeddings(), &Constant(0.5))
                .unwrap();

        assert_eq!(vectors.len(), 3);
        assert_eq!(vectors.avg_embeddings().row(0).unwrap(), [2.0, 1.0]);
        // "lunch" has no vector.
        assert_eq!(vectors.avg_embeddings().row(1).unwrap(), [0.0, 1.0]);
        assert_eq!(vectors.avg_embeddings().row(2).unwrap(), [0.0, 0.0]);
        assert_eq!(vectors.word_vectors().len(), 2);
        assert_eq!(vectors.id_to_word()[&2], "lunch");
        assert_eq!(vectors.paragraph_vectors().shape(), (3, 2));
        assert_eq!(vectors.tfidf().row(0).unwrap(), [(0, 2.0), (1, 1.0)]);
    }

    #[test]
    fn test_no_embedded_words() {
        let empty: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        assert!(matches!(
            DocumentVectors::build(&table(), &vocabulary(), &Counts, &empty, &Constant(0.0)),
            Err(Error::EmptyEmbeddings)
        ));
    }

    #[test]
    fn test_inconsistent_embedding_dimension() {
        let mut ragged = embeddings();
        ragged.insert("lunch".to_string(), vec![1.0, 2.0, 3.0]);
        assert!(matches!(
            DocumentVectors::build(&table(), &vocabulary(), &Counts, &ragged, &Constant(0.0)),
            Err(Error::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_collaborator_error_propagates() {
        assert!(matches!(
            DocumentVectors::build(&table(), &vocabulary(), &Counts, &embeddings(), &Failing),
            Err(Error::Collaborator(_))
        ));
    }

    #[test]
    fn test_dense_matrix_rejects_ragged_rows() {
        assert!(DenseMatrix::from_rows(vec![vec![1.0], vec![1.0, 2.0]]).is_err());
        let m = DenseMatrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(m.get(1, 0), Some(3.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.row(5), None);
    }

    #[test]
    fn test_sparse_matrix_rejects_out_of_range_column() {
        let mut m = SparseMatrix::new(2);
        assert!(m.push_row(vec![(0, 1.0), (1, 0.5)]).is_ok());
        assert!(m.push_row(vec![(2, 1.0)]).is_err());
        assert_eq!(m.shape(), (1, 2));
    }
}
