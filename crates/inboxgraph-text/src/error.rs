//! Error types for text normalization.

/// Result type alias for text operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Text normalization error types.
///
/// `clean` itself never fails. These errors come from building the pieces
/// a normalizer is made of (lexicons, configuration).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed line in a lexicon source.
    #[error("Invalid lexicon entry at line {line}: {message}")]
    Lexicon {
        /// One-based line number.
        line: usize,
        /// Description of what went wrong.
        message: String,
    },

    /// I/O error while reading a lexicon.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration rejected by validation.
    #[error("Invalid normalizer configuration: {0}")]
    InvalidConfig(String),
}

/// Per-word lemmatization failure.
///
/// Never escapes [`TextNormalizer::clean`](crate::TextNormalizer::clean); it is
/// carried inside [`LemmaOutcome::Failed`](crate::LemmaOutcome::Failed) so callers
/// can observe the fallback.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LemmaError {
    /// The word was empty.
    #[error("cannot lemmatize an empty word")]
    EmptyWord,

    /// The lemmatizer refused the word.
    #[error("unsupported word {0:?}")]
    Unsupported(String),
}
