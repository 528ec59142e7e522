//! Correspondent importance scores and the per-message importance field.

use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::config::AnalysisConfig;
use crate::correspondents::CorrespondentIndex;
use crate::error::{Error, Result};
use crate::table::{Message, MessageTable, split_names};

/// How a correspondent's score was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreOrigin {
    /// Computed from send/receive volume.
    #[default]
    Computed,
    /// A count did not fit the score arithmetic or the raw score was not
    /// finite; epsilon was used instead.
    Fallback,
}

/// Correspondent importance, normalized so the maximum is exactly 1.
///
/// The raw score of a correspondent `u` is
/// `(sent(u) + eps) * (sent(u) + recvd(u)) / (recvd(u) + 1)` where `sent(u)`
/// counts sent-folder messages whose recipients mention `u` and `recvd(u)`
/// counts messages from `u` outside the sent folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportanceScores {
    scores: BTreeMap<String, f64>,
    origins: BTreeMap<String, ScoreOrigin>,
}

impl ImportanceScores {
    /// Scores every correspondent of `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImportanceTable`] if the index has no
    /// correspondents, or [`Error::NoImportanceSignal`] if every raw score
    /// is zero.
    pub fn compute(
        table: &MessageTable,
        index: &CorrespondentIndex,
        config: &AnalysisConfig,
    ) -> Result<Self> {
        if index.all_users().is_empty() {
            return Err(Error::EmptyImportanceTable);
        }

        let recipients: Vec<_> = table
            .sent(config)
            .map(Message::combined_recipients)
            .collect();

        let mut raw = BTreeMap::new();
        let mut origins = BTreeMap::new();
        for user in index.all_users() {
            let sent = recipients
                .iter()
                .filter(|field| field.contains(user.as_str()))
                .count();
            let recvd = index.received_count(user);
            let (score, origin) = scored_or_fallback(sent, recvd, config.epsilon);
            if origin == ScoreOrigin::Fallback {
                debug!("Score for {} could not be computed, using epsilon", user);
            }
            raw.insert(user.clone(), score);
            origins.insert(user.clone(), origin);
        }

        let max = raw.values().copied().fold(0.0_f64, f64::max);
        if max <= 0.0 {
            return Err(Error::NoImportanceSignal);
        }

        let scores = raw
            .into_iter()
            .map(|(user, score)| (user, score / max))
            .collect();
        Ok(Self { scores, origins })
    }

    /// Normalized score of `name`, if they are a correspondent.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.scores.get(name).copied()
    }

    /// How the score of `name` was obtained.
    #[must_use]
    pub fn origin(&self, name: &str) -> Option<ScoreOrigin> {
        self.origins.get(name).copied()
    }

    /// All normalized scores by name.
    #[must_use]
    pub const fn scores(&self) -> &BTreeMap<String, f64> {
        &self.scores
    }

    /// Iterates over `(name, score)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(name, score)| (name.as_str(), *score))
    }

    /// Number of scored correspondents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Check if no correspondent was scored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

fn scored_or_fallback(sent: usize, recvd: usize, eps: f64) -> (f64, ScoreOrigin) {
    raw_score(sent, recvd, eps).map_or((eps, ScoreOrigin::Fallback), |score| {
        (score, ScoreOrigin::Computed)
    })
}

/// `None` when a count is not exactly representable or the result is not
/// finite.
fn raw_score(sent: usize, recvd: usize, eps: f64) -> Option<f64> {
    let sent = f64::from(u32::try_from(sent).ok()?);
    let recvd = f64::from(u32::try_from(recvd).ok()?);
    let score = (sent + eps) * (sent + recvd) / (recvd + 1.0);
    score.is_finite().then_some(score)
}

/// Replies over reads among messages outside the sent folder.
///
/// The read count is padded by epsilon, so a mailbox with nothing read
/// yields a large but finite fraction when anything was replied to.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn read_reply_fraction(table: &MessageTable, config: &AnalysisConfig) -> f64 {
    let (read, replied) = table
        .received(config)
        .fold((0_usize, 0_usize), |(read, replied), msg| {
            (read + usize::from(msg.is_read()), replied + usize::from(msg.replied))
        });
    let fraction = replied as f64 / (read as f64 + config.epsilon);
    info!("Read-reply fraction = {}/{} = {:.4}", replied, read, fraction);
    fraction
}

/// Importance of every message, in table row order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportanceField {
    values: Vec<f64>,
}

impl ImportanceField {
    /// Computes the importance of every message.
    ///
    /// A sent message scores 1 plus the mean score of its known recipients.
    /// Any other message scores 1 if replied to, the read-reply fraction if
    /// read, plus its sender's score. Every message then gains the
    /// configured offset. Unknown names contribute nothing.
    #[must_use]
    pub fn compute(
        table: &MessageTable,
        scores: &ImportanceScores,
        config: &AnalysisConfig,
    ) -> Self {
        let fraction = read_reply_fraction(table, config);
        let values = table
            .iter()
            .map(|msg| {
                let mut imp = 0.0;
                if config.is_sent(&msg.folder) {
                    imp += 1.0;
                    let recipients = msg.combined_recipients();
                    let (total, known) = split_names(&recipients)
                        .filter_map(|name| scores.get(name))
                        .fold((0.0, 0_u32), |(total, known), score| (total + score, known + 1));
                    if known > 0 {
                        imp += total / f64::from(known);
                    }
                } else {
                    if msg.replied {
                        imp += 1.0;
                    }
                    if msg.is_read() {
                        imp += fraction;
                    }
                    imp += scores.get(msg.sender_name()).unwrap_or(0.0);
                }
                imp + config.importance_offset
            })
            .collect();
        Self { values }
    }

    /// Builds a field from precomputed values, one per row.
    #[must_use]
    pub const fn from_values(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Importance values in row order.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Importance of the row at `position`.
    #[must_use]
    pub fn get(&self, position: usize) -> Option<f64> {
        self.values.get(position).copied()
    }

    /// Number of rows covered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the field covers no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn table() -> MessageTable {
        MessageTable::new(vec![
            Message::new(0, "Me", "sent_items").with_to("Alice;Bob"),
            Message::new(1, "Me", "sent_items").with_to("Alice"),
            Message::new(2, "Alice", "inbox").with_replied(true),
            Message::new(3, "Carol", "inbox").with_unread(true),
            Message::new(4, "Carol", "Projects"),
        ])
    }

    fn scored() -> (MessageTable, ImportanceScores) {
        let config = AnalysisConfig::default();
        let table = table();
        let index = CorrespondentIndex::build(&table, "Me", &config);
        let scores = ImportanceScores::compute(&table, &index, &config).unwrap();
        (table, scores)
    }

    #[test]
    fn test_scores_normalized_to_one() {
        let (_, scores) = scored();
        let max = scores.iter().map(|(_, s)| s).fold(f64::MIN, f64::max);
        assert_eq!(max, 1.0);
        assert!(scores.iter().all(|(_, s)| (0.0..=1.0).contains(&s)));
        assert_eq!(scores.len(), 3);
    }

    #[test]
    fn test_raw_score_formula() {
        // Alice: sent 2, received 1; Bob: sent 1, received 0; Carol: sent 0, received 2.
        let (_, scores) = scored();
        let eps = 1e-3;
        let alice = (2.0 + eps) * 3.0 / 2.0;
        let bob = (1.0 + eps) * 1.0 / 1.0;
        let carol = eps * 2.0 / 3.0;
        assert_eq!(scores.get("Alice").unwrap(), 1.0);
        assert!(approx(scores.get("Bob").unwrap(), bob / alice));
        assert!(approx(scores.get("Carol").unwrap(), carol / alice));
        assert_eq!(scores.origin("Bob"), Some(ScoreOrigin::Computed));
        assert_eq!(scores.get("Nobody"), None);
    }

    #[test]
    fn test_score_origin() {
        let eps = 1e-3;
        assert_eq!(scored_or_fallback(2, 1, eps), ((2.0 + eps) * 3.0 / 2.0, ScoreOrigin::Computed));
        assert_eq!(scored_or_fallback(0, 0, eps), (0.0, ScoreOrigin::Computed));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_unrepresentable_count_falls_back_to_epsilon() {
        let eps = 1e-3;
        let too_many = usize::try_from(u64::from(u32::MAX) + 1).unwrap();
        assert_eq!(scored_or_fallback(too_many, 0, eps), (eps, ScoreOrigin::Fallback));
        assert_eq!(scored_or_fallback(1, too_many, eps), (eps, ScoreOrigin::Fallback));
        assert_eq!(raw_score(too_many, 0, eps), None);
    }

    #[test]
    fn test_sent_count_is_substring_match() {
        let config = AnalysisConfig::default();
        let table = MessageTable::new(vec![
            Message::new(0, "Me", "sent_items").with_to("Alice Smith"),
            Message::new(1, "Me", "sent_items").with_to("Alice"),
        ]);
        let index = CorrespondentIndex::build(&table, "Me", &config);
        let scores = ImportanceScores::compute(&table, &index, &config).unwrap();
        // "Alice" also matches inside "Alice Smith".
        assert_eq!(scores.get("Alice").unwrap(), 1.0);
        assert!(scores.get("Alice Smith").unwrap() < 1.0);
    }

    #[test]
    fn test_empty_table_is_error() {
        let config = AnalysisConfig::default();
        let table = MessageTable::new(vec![Message::new(0, "Me", "sent_items")]);
        let index = CorrespondentIndex::build(&table, "Me", &config);
        assert!(matches!(
            ImportanceScores::compute(&table, &index, &config),
            Err(Error::EmptyImportanceTable)
        ));
    }

    #[test]
    fn test_no_signal_is_error() {
        // Carol is copied on a message that never reached the sent folder.
        let config = AnalysisConfig::default();
        let table = MessageTable::new(vec![
            Message::new(0, "Me", "sent_items"),
            Message::new(1, "Me", "outbox").with_cc("Carol"),
        ]);
        let index = CorrespondentIndex::build(&table, "Me", &config);
        assert!(matches!(
            ImportanceScores::compute(&table, &index, &config),
            Err(Error::NoImportanceSignal)
        ));
    }

    #[test]
    fn test_read_reply_fraction() {
        let config = AnalysisConfig::default();
        // Received: 2 (read, replied), 3 (unread), 4 (read).
        let fraction = read_reply_fraction(&table(), &config);
        assert!(approx(fraction, 1.0 / (2.0 + 1e-3)));
    }

    #[test]
    fn test_importance_field() {
        let config = AnalysisConfig::default();
        let (table, scores) = scored();
        let field = ImportanceField::compute(&table, &scores, &config);
        assert_eq!(field.len(), table.len());

        let fraction = 1.0 / (2.0 + 1e-3);
        let alice = scores.get("Alice").unwrap();
        let bob = scores.get("Bob").unwrap();
        let carol = scores.get("Carol").unwrap();

        assert!(approx(field.values()[0], 1.0 + (alice + bob) / 2.0 + 0.01));
        assert!(approx(field.values()[1], 1.0 + alice + 0.01));
        assert!(approx(field.values()[2], 1.0 + fraction + alice + 0.01));
        assert!(approx(field.values()[3], carol + 0.01));
        assert!(approx(field.values()[4], fraction + carol + 0.01));
    }

    #[test]
    fn test_unknown_recipients_contribute_nothing() {
        let config = AnalysisConfig::default();
        let (_, scores) = scored();
        let table = MessageTable::new(vec![Message::new(0, "Me", "sent_items").with_to("Stranger")]);
        let field = ImportanceField::compute(&table, &scores, &config);
        assert!(approx(field.get(0).unwrap(), 1.01));
        assert_eq!(field.get(1), None);
    }
}
