//! Mailbox owner identification and the correspondent index.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{error, info, warn};

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::table::{MessageTable, split_names};

/// Correspondent name to the indices of the messages linking them to the user.
pub type CorrespondentMap = BTreeMap<String, Vec<usize>>;

/// Identifies the mailbox owner as the most frequent sent-folder sender.
///
/// Senders are ranked by message count, descending, ties by name. When the
/// top sender is the unknown placeholder the runner-up is taken instead.
///
/// # Errors
///
/// Returns [`Error::IdentityUnresolved`] if the sent folder has no named
/// sender, or if the placeholder tops the ranking with no valid runner-up.
pub fn identify_user(table: &MessageTable, config: &AnalysisConfig) -> Result<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for msg in table.sent(config) {
        let sender = msg.sender_name();
        if !sender.is_empty() {
            *counts.entry(sender).or_default() += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    // BTreeMap order is by name; a stable sort on count keeps it as the tie-break.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    let Some(&(top, _)) = ranked.first() else {
        error!("Username could not be detected: no sent-folder senders");
        return Err(Error::IdentityUnresolved(format!(
            "no senders in folder {:?}",
            config.sent_folder
        )));
    };
    if !config.is_unknown(top) {
        return Ok(top.to_string());
    }

    warn!(
        "Username detected as {}, falling back to the second highest sender",
        top
    );
    match ranked.get(1) {
        Some(&(second, _)) if !config.is_unknown(second) => Ok(second.to_string()),
        _ => {
            error!("Username could not be detected");
            Err(Error::IdentityUnresolved(
                "only the unknown placeholder sends from the sent folder".to_string(),
            ))
        }
    }
}

/// Who the user writes to, copies, and hears from.
///
/// Every correspondent found in any of the three directions has an entry,
/// possibly empty, in all three maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorrespondentIndex {
    user: String,
    sent_to: CorrespondentMap,
    cc: CorrespondentMap,
    received_from: CorrespondentMap,
    sent_to_users: BTreeSet<String>,
    cc_users: BTreeSet<String>,
    received_from_users: BTreeSet<String>,
    all_users: BTreeSet<String>,
}

impl CorrespondentIndex {
    /// Builds the index for `user`.
    ///
    /// Sent-to and cc entries come from every message sent by the user;
    /// received-from entries come from messages outside the sent folder.
    /// The user, empty names and the unknown placeholder are skipped.
    #[must_use]
    pub fn build(table: &MessageTable, user: &str, config: &AnalysisConfig) -> Self {
        let keep = |name: &str| name != user && !config.is_unknown(name);

        let mut sent_to = CorrespondentMap::new();
        let mut cc = CorrespondentMap::new();
        for msg in table.iter().filter(|msg| msg.sender_name() == user) {
            for name in split_names(&msg.to).filter(|&name| keep(name)) {
                sent_to.entry(name.to_string()).or_default().push(msg.idx);
            }
            for name in split_names(&msg.cc).filter(|&name| keep(name)) {
                cc.entry(name.to_string()).or_default().push(msg.idx);
            }
        }

        let mut received_from = CorrespondentMap::new();
        for msg in table.received(config) {
            let sender = msg.sender_name();
            if !sender.is_empty() && keep(sender) {
                received_from
                    .entry(sender.to_string())
                    .or_default()
                    .push(msg.idx);
            }
        }

        let sent_to_users: BTreeSet<String> = sent_to.keys().cloned().collect();
        let cc_users: BTreeSet<String> = cc.keys().cloned().collect();
        let received_from_users: BTreeSet<String> = received_from.keys().cloned().collect();
        let all_users: BTreeSet<String> = sent_to_users
            .iter()
            .chain(&cc_users)
            .chain(&received_from_users)
            .cloned()
            .collect();

        for name in &all_users {
            for map in [&mut sent_to, &mut cc, &mut received_from] {
                map.entry(name.clone()).or_default();
            }
        }

        info!(
            "Correspondents of {}: {} sent-to, {} cc, {} received-from, {} total",
            user,
            sent_to_users.len(),
            cc_users.len(),
            received_from_users.len(),
            all_users.len()
        );

        Self {
            user: user.to_string(),
            sent_to,
            cc,
            received_from,
            sent_to_users,
            cc_users,
            received_from_users,
            all_users,
        }
    }

    /// The mailbox owner.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Correspondent to sent message indices.
    #[must_use]
    pub const fn sent_to(&self) -> &CorrespondentMap {
        &self.sent_to
    }

    /// Correspondent to indices of sent messages they were copied on.
    #[must_use]
    pub const fn cc(&self) -> &CorrespondentMap {
        &self.cc
    }

    /// Correspondent to received message indices.
    #[must_use]
    pub const fn received_from(&self) -> &CorrespondentMap {
        &self.received_from
    }

    /// Names the user wrote to.
    #[must_use]
    pub const fn sent_to_users(&self) -> &BTreeSet<String> {
        &self.sent_to_users
    }

    /// Names the user copied.
    #[must_use]
    pub const fn cc_users(&self) -> &BTreeSet<String> {
        &self.cc_users
    }

    /// Names the user received mail from.
    #[must_use]
    pub const fn received_from_users(&self) -> &BTreeSet<String> {
        &self.received_from_users
    }

    /// Union of the three directions.
    #[must_use]
    pub const fn all_users(&self) -> &BTreeSet<String> {
        &self.all_users
    }

    /// Number of messages received from `name` outside the sent folder.
    #[must_use]
    pub fn received_count(&self, name: &str) -> usize {
        self.received_from.get(name).map_or(0, Vec::len)
    }
}

/// The `k` correspondents the user wrote to most, descending, ties by name.
#[must_use]
pub fn top_correspondents(index: &CorrespondentIndex, k: usize) -> Vec<String> {
    let mut ranked: Vec<(&String, usize)> = index
        .sent_to()
        .iter()
        .map(|(name, indices)| (name, indices.len()))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked.into_iter().take(k).map(|(name, _)| name.clone()).collect()
}
