//! The aggregate mailbox model.

use std::collections::BTreeMap;

use tracing::info;

use crate::config::AnalysisConfig;
use crate::correspondents::{CorrespondentIndex, identify_user, top_correspondents};
use crate::error::{Error, Result};
use crate::folders::{FolderStats, is_frequent_filer, three_important_folders};
use crate::importance::{ImportanceField, ImportanceScores};
use crate::table::MessageTable;
use crate::temporal::TimeBuckets;
use crate::vectors::{DocumentVectors, ParagraphEmbedder, TfidfTransform, WordEmbeddings};

/// Social graph, importance and folder structure of one user's mailbox.
///
/// Construction resolves the user and computes the correspondent index and
/// folder statistics. Importance, the top folders and the time buckets are
/// computed by the `make_*` methods.
#[derive(Debug, Clone)]
pub struct EmailNetwork {
    table: MessageTable,
    config: AnalysisConfig,
    index: CorrespondentIndex,
    top_correspondents: Vec<String>,
    folders: FolderStats,
    frequent_filer: bool,
    scores: Option<ImportanceScores>,
    importance: Option<ImportanceField>,
    important_folders: Option<Vec<String>>,
    time_buckets: Option<TimeBuckets>,
    vectors: Option<DocumentVectors>,
}

impl EmailNetwork {
    /// Analyzes `table`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the user cannot
    /// be identified.
    pub fn new(table: MessageTable, config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let user = identify_user(&table, &config)?;
        info!("Username identified as {}", user);

        let index = CorrespondentIndex::build(&table, &user, &config);
        let top_correspondents = top_correspondents(&index, config.top_k);
        let folders = FolderStats::compute(&table, &config);
        let frequent_filer = is_frequent_filer(&folders, &config);
        info!("Frequent filer: {}", frequent_filer);

        Ok(Self {
            table,
            config,
            index,
            top_correspondents,
            folders,
            frequent_filer,
            scores: None,
            importance: None,
            important_folders: None,
            time_buckets: None,
            vectors: None,
        })
    }

    /// Scores correspondents and computes the per-message importance field.
    ///
    /// # Errors
    ///
    /// Returns an error if the mailbox has no correspondents or no
    /// importance signal.
    pub fn make_importance(&mut self) -> Result<&ImportanceField> {
        let scores = ImportanceScores::compute(&self.table, &self.index, &self.config)?;
        let field = ImportanceField::compute(&self.table, &scores, &self.config);
        self.scores = Some(scores);
        Ok(&*self.importance.insert(field))
    }

    /// Ranks big folders by summed importance, computing importance first
    /// if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if importance cannot be computed.
    pub fn make_three_important_folders(&mut self) -> Result<&[String]> {
        if self.importance.is_none() {
            self.make_importance()?;
        }
        let field = self.importance.as_ref().ok_or(Error::EmptyImportanceTable)?;
        let folders = three_important_folders(&self.folders, &self.table, field, &self.config)?;
        info!("Most important folders: {:?}", folders);
        Ok(self.important_folders.insert(folders).as_slice())
    }

    /// Partitions messages into time buckets.
    pub fn make_three_time_periods(&mut self) -> &TimeBuckets {
        let buckets = TimeBuckets::partition(&self.table, &self.config);
        self.time_buckets.insert(buckets)
    }

    /// Builds document vectors with the given collaborators and attaches them.
    ///
    /// # Errors
    ///
    /// Returns any error from [`DocumentVectors::build`].
    pub fn make_vectors(
        &mut self,
        vocabulary: &BTreeMap<usize, String>,
        tfidf: &dyn TfidfTransform,
        embeddings: &dyn WordEmbeddings,
        paragraphs: &dyn ParagraphEmbedder,
    ) -> Result<&DocumentVectors> {
        let vectors =
            DocumentVectors::build(&self.table, vocabulary, tfidf, embeddings, paragraphs)?;
        Ok(&*self.vectors.insert(vectors))
    }

    /// Attaches document vectors built elsewhere.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the vectors do not cover
    /// every message.
    pub fn attach_vectors(&mut self, vectors: DocumentVectors) -> Result<()> {
        if vectors.len() != self.table.len() {
            return Err(Error::DimensionMismatch {
                what: "document vector rows",
                expected: self.table.len(),
                found: vectors.len(),
            });
        }
        self.vectors = Some(vectors);
        Ok(())
    }

    /// The analyzed messages.
    #[must_use]
    pub const fn table(&self) -> &MessageTable {
        &self.table
    }

    /// The configuration in use.
    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// The mailbox owner.
    #[must_use]
    pub fn user(&self) -> &str {
        self.index.user()
    }

    /// Correspondent maps and sets.
    #[must_use]
    pub const fn correspondents(&self) -> &CorrespondentIndex {
        &self.index
    }

    /// Correspondents the user writes to most.
    #[must_use]
    pub fn top_correspondents(&self) -> &[String] {
        &self.top_correspondents
    }

    /// Custom and big folder statistics.
    #[must_use]
    pub const fn folder_stats(&self) -> &FolderStats {
        &self.folders
    }

    /// Whether the user files mail into many well-used folders.
    #[must_use]
    pub const fn is_frequent_filer(&self) -> bool {
        self.frequent_filer
    }

    /// Normalized correspondent scores, once computed.
    #[must_use]
    pub const fn importance_scores(&self) -> Option<&ImportanceScores> {
        self.scores.as_ref()
    }

    /// Per-message importance, once computed.
    #[must_use]
    pub const fn importance(&self) -> Option<&ImportanceField> {
        self.importance.as_ref()
    }

    /// Most important big folders, once computed.
    #[must_use]
    pub fn three_important_folders(&self) -> Option<&[String]> {
        self.important_folders.as_deref()
    }

    /// Time buckets, once computed.
    #[must_use]
    pub const fn time_buckets(&self) -> Option<&TimeBuckets> {
        self.time_buckets.as_ref()
    }

    /// Whether every time bucket is large enough. False until the buckets
    /// are computed.
    #[must_use]
    pub fn is_temporally_sound(&self) -> bool {
        self.time_buckets.as_ref().is_some_and(TimeBuckets::is_sound)
    }

    /// Document vectors, once built or attached.
    #[must_use]
    pub const fn vectors(&self) -> Option<&DocumentVectors> {
        self.vectors.as_ref()
    }
}
