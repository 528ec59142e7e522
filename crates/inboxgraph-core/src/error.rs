//! Error types for the analysis library.

use thiserror::Error;

/// Errors that can occur while analyzing a mailbox.
#[derive(Debug, Error)]
pub enum Error {
    /// No sent-folder sender could be taken as the mailbox owner.
    #[error("User identity could not be resolved: {0}")]
    IdentityUnresolved(String),

    /// Importance scores were requested for a mailbox with no correspondents.
    #[error("Importance table is empty: no correspondents found")]
    EmptyImportanceTable,

    /// Every raw importance score is zero, so nothing can be normalized.
    #[error("No importance signal: every raw score is zero")]
    NoImportanceSignal,

    /// No vocabulary word has an embedding.
    #[error("No vocabulary word has an embedding")]
    EmptyEmbeddings,

    /// Two matrices or columns that must line up do not.
    #[error("Dimension mismatch in {what}: expected {expected}, found {found}")]
    DimensionMismatch {
        /// What was being compared.
        what: &'static str,
        /// Expected size.
        expected: usize,
        /// Actual size.
        found: usize,
    },

    /// An external vector-space collaborator failed.
    #[error("Collaborator error: {0}")]
    Collaborator(String),

    /// Configuration rejected by validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Text normalization error.
    #[error("Text error: {0}")]
    Text(#[from] inboxgraph_text::Error),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
