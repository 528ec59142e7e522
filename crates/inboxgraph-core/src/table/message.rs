//! A single row of the message table.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One archived message, as produced by the loader.
///
/// Field names follow the loader's JSON export; the original column names
/// (`SenderName`, `FolderType`, `UnRead`, ...) are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Stable row index.
    pub idx: usize,
    /// Sender display name.
    #[serde(alias = "SenderName")]
    pub sender: String,
    /// `;`-delimited recipients.
    #[serde(default, alias = "To")]
    pub to: String,
    /// `;`-delimited cc recipients.
    #[serde(default, alias = "CC")]
    pub cc: String,
    /// `;`-delimited bcc recipients.
    #[serde(default, alias = "BCC")]
    pub bcc: String,
    /// Precomputed union of to, cc and bcc, when the loader provides one.
    #[serde(default)]
    pub to_cc_bcc: String,
    /// Folder label.
    #[serde(alias = "FolderType")]
    pub folder: String,
    /// Raw body text.
    #[serde(default, alias = "Body")]
    pub body: String,
    /// Cleaned body tokens.
    #[serde(default, alias = "CleanBody")]
    pub clean_body: String,
    /// Whether the message is unread.
    #[serde(default, alias = "UnRead", with = "flag_serde")]
    pub unread: bool,
    /// Whether the user replied to the message.
    #[serde(default, with = "flag_serde")]
    pub replied: bool,
    /// Send timestamp.
    #[serde(default, alias = "SentOn")]
    pub sent_on: DateTime<Utc>,
    /// Whole days between the send timestamp and the reference date.
    #[serde(default)]
    pub day_offset: i64,
}

impl Message {
    /// Creates a read, unreplied message with empty recipients and body.
    #[must_use]
    pub fn new(idx: usize, sender: impl Into<String>, folder: impl Into<String>) -> Self {
        Self {
            idx,
            sender: sender.into(),
            to: String::new(),
            cc: String::new(),
            bcc: String::new(),
            to_cc_bcc: String::new(),
            folder: folder.into(),
            body: String::new(),
            clean_body: String::new(),
            unread: false,
            replied: false,
            sent_on: DateTime::default(),
            day_offset: 0,
        }
    }

    /// Sets the recipients.
    #[must_use]
    pub fn with_to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    /// Sets the cc recipients.
    #[must_use]
    pub fn with_cc(mut self, cc: impl Into<String>) -> Self {
        self.cc = cc.into();
        self
    }

    /// Sets the bcc recipients.
    #[must_use]
    pub fn with_bcc(mut self, bcc: impl Into<String>) -> Self {
        self.bcc = bcc.into();
        self
    }

    /// Sets the raw body.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Sets the cleaned body.
    #[must_use]
    pub fn with_clean_body(mut self, clean_body: impl Into<String>) -> Self {
        self.clean_body = clean_body.into();
        self
    }

    /// Sets the unread flag.
    #[must_use]
    pub const fn with_unread(mut self, unread: bool) -> Self {
        self.unread = unread;
        self
    }

    /// Sets the replied flag.
    #[must_use]
    pub const fn with_replied(mut self, replied: bool) -> Self {
        self.replied = replied;
        self
    }

    /// Sets the send timestamp.
    #[must_use]
    pub const fn with_sent_on(mut self, sent_on: DateTime<Utc>) -> Self {
        self.sent_on = sent_on;
        self
    }

    /// Sets the day offset.
    #[must_use]
    pub const fn with_day_offset(mut self, days: i64) -> Self {
        self.day_offset = days;
        self
    }

    /// Sender with surrounding whitespace removed.
    #[must_use]
    pub fn sender_name(&self) -> &str {
        self.sender.trim()
    }

    /// Check if the message has been read.
    #[must_use]
    pub const fn is_read(&self) -> bool {
        !self.unread
    }

    /// All recipients as one `;`-delimited field.
    ///
    /// Uses `to_cc_bcc` when present, otherwise joins the non-empty
    /// to, cc and bcc fields.
    #[must_use]
    pub fn combined_recipients(&self) -> Cow<'_, str> {
        if !self.to_cc_bcc.trim().is_empty() {
            return Cow::Borrowed(&self.to_cc_bcc);
        }
        let parts: Vec<&str> = [&self.to, &self.cc, &self.bcc]
            .into_iter()
            .map(String::as_str)
            .filter(|field| !field.trim().is_empty())
            .collect();
        match parts.as_slice() {
            [] => Cow::Borrowed(""),
            [only] => Cow::Borrowed(*only),
            _ => Cow::Owned(parts.join(";")),
        }
    }
}

/// Splits a `;`-delimited name list, trimming and dropping empty entries.
pub fn split_names(field: &str) -> impl Iterator<Item = &str> {
    field.split(';').map(str::trim).filter(|name| !name.is_empty())
}

/// Serde helpers for flags exported as `"True"`/`"False"` strings.
mod flag_serde {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    #[allow(clippy::trivially_copy_pass_by_ref)] // Required by serde with= signature
    pub fn serialize<S>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(if *flag { "True" } else { "False" })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Flag::deserialize(deserializer)? {
            Flag::Bool(flag) => Ok(flag),
            Flag::Text(text) => match text.trim() {
                t if t.eq_ignore_ascii_case("true") => Ok(true),
                t if t.eq_ignore_ascii_case("false") => Ok(false),
                other => Err(D::Error::custom(format!("invalid flag {other:?}"))),
            },
        }
    }
}
