//! The message table: rows of archived messages in loader order.

mod folder;
mod message;

pub use folder::FolderKind;
pub use message::{Message, split_names};

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use inboxgraph_text::TextNormalizer;
use tracing::debug;

use crate::config::AnalysisConfig;
use crate::error::Result;

/// Ordered collection of messages.
///
/// Row order is the order every aggregate is summed in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageTable {
    rows: Vec<Message>,
}

impl MessageTable {
    /// Creates a table from rows.
    #[must_use]
    pub const fn new(rows: Vec<Message>) -> Self {
        Self { rows }
    }

    /// Parses a JSON array of messages.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is not an array of messages.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let rows: Vec<Message> = serde_json::from_str(json)?;
        Ok(Self::new(rows))
    }

    /// Returns the rows.
    #[must_use]
    pub fn rows(&self) -> &[Message] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows.
    pub fn iter(&self) -> std::slice::Iter<'_, Message> {
        self.rows.iter()
    }

    /// Rows filed in the sent folder.
    pub fn sent<'a>(&'a self, config: &'a AnalysisConfig) -> impl Iterator<Item = &'a Message> {
        self.rows.iter().filter(|msg| config.is_sent(&msg.folder))
    }

    /// Rows filed anywhere but the sent folder.
    pub fn received<'a>(
        &'a self,
        config: &'a AnalysisConfig,
    ) -> impl Iterator<Item = &'a Message> {
        self.rows.iter().filter(|msg| !config.is_sent(&msg.folder))
    }

    /// Distinct folder labels.
    #[must_use]
    pub fn folders(&self) -> BTreeSet<&str> {
        self.rows.iter().map(|msg| msg.folder.as_str()).collect()
    }

    /// Fills `clean_body` from `body` for every row whose cleaned body is
    /// empty. Returns the number of rows filled.
    pub fn normalize_bodies(&mut self, normalizer: &TextNormalizer) -> usize {
        let mut filled = 0;
        for msg in self.rows.iter_mut().filter(|msg| msg.clean_body.is_empty()) {
            msg.clean_body = normalizer.clean(&msg.body);
            filled += 1;
        }
        debug!("Normalized {} message bodies", filled);
        filled
    }

    /// Recomputes every day offset as whole days from the send timestamp to
    /// `reference`.
    pub fn rebase_offsets(&mut self, reference: DateTime<Utc>) {
        for msg in &mut self.rows {
            msg.day_offset = (reference - msg.sent_on).num_days();
        }
    }
}

impl FromIterator<Message> for MessageTable {
    fn from_iter<I: IntoIterator<Item = Message>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a MessageTable {
    type Item = &'a Message;
    type IntoIter = std::slice::Iter<'a, Message>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
