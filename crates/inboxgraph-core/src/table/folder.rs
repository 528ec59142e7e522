//! Folder classification.

use crate::config::AnalysisConfig;

/// Kind of folder a label names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FolderKind {
    /// Inbox folder.
    Inbox,
    /// Sent mail folder.
    Sent,
    /// Archive folder.
    Archive,
    /// Folder created by the user.
    Custom,
}

impl FolderKind {
    /// Classifies a folder label. Labels are matched exactly.
    #[must_use]
    pub fn from_label(label: &str, config: &AnalysisConfig) -> Self {
        if label == config.inbox_folder {
            Self::Inbox
        } else if label == config.sent_folder {
            Self::Sent
        } else if label == config.archive_folder {
            Self::Archive
        } else {
            Self::Custom
        }
    }

    /// Check if this is a user-created folder.
    #[must_use]
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_label() {
        let config = AnalysisConfig::default();
        assert_eq!(FolderKind::from_label("inbox", &config), FolderKind::Inbox);
        assert_eq!(FolderKind::from_label("sent_items", &config), FolderKind::Sent);
        assert_eq!(FolderKind::from_label("Archive", &config), FolderKind::Archive);
        assert_eq!(FolderKind::from_label("archive", &config), FolderKind::Custom);
        assert!(FolderKind::from_label("Projects", &config).is_custom());
    }
}
