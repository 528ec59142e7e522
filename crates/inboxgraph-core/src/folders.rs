//! Custom folder statistics and folder ranking.

use std::collections::{BTreeMap, BTreeSet};

use tracing::info;

use crate::config::AnalysisConfig;
use crate::error::{Error, Result};
use crate::importance::ImportanceField;
use crate::table::{FolderKind, MessageTable};

/// Sizes of the folders the user created.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FolderStats {
    custom: BTreeSet<String>,
    indices: BTreeMap<String, Vec<usize>>,
    avg_len: f64,
    threshold: f64,
    big: BTreeSet<String>,
}

impl FolderStats {
    /// Collects custom folders, their message indices, their average length
    /// and the big folders.
    ///
    /// A folder is big when it holds more than
    /// `max(big_folder_floor, avg_len / big_folder_divisor)` messages.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(table: &MessageTable, config: &AnalysisConfig) -> Self {
        let mut indices: BTreeMap<String, Vec<usize>> = BTreeMap::new();
        for msg in table {
            if FolderKind::from_label(&msg.folder, config).is_custom() {
                indices.entry(msg.folder.clone()).or_default().push(msg.idx);
            }
        }
        let custom: BTreeSet<String> = indices.keys().cloned().collect();

        let total: usize = indices.values().map(Vec::len).sum();
        let avg_len = if indices.is_empty() {
            0.0
        } else {
            total as f64 / indices.len() as f64
        };

        let threshold = config.big_folder_threshold(avg_len);
        let big: BTreeSet<String> = indices
            .iter()
            .filter(|(_, idx)| idx.len() as f64 > threshold)
            .map(|(folder, _)| folder.clone())
            .collect();

        info!(
            "Folders: {} custom, average length {:.2}, {} big (threshold {:.2})",
            custom.len(),
            avg_len,
            big.len(),
            threshold
        );

        Self {
            custom,
            indices,
            avg_len,
            threshold,
            big,
        }
    }

    /// Labels of user-created folders.
    #[must_use]
    pub const fn custom_folders(&self) -> &BTreeSet<String> {
        &self.custom
    }

    /// Custom folder label to the indices of its messages.
    #[must_use]
    pub const fn folder_indices(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.indices
    }

    /// Mean message count over custom folders, 0 when there are none.
    #[must_use]
    pub const fn avg_len(&self) -> f64 {
        self.avg_len
    }

    /// Size a folder must exceed to be big.
    #[must_use]
    pub const fn big_threshold(&self) -> f64 {
        self.threshold
    }

    /// Labels of big folders.
    #[must_use]
    pub const fn big_folders(&self) -> &BTreeSet<String> {
        &self.big
    }
}

/// Whether the user files mail into many well-used folders.
#[must_use]
pub fn is_frequent_filer(stats: &FolderStats, config: &AnalysisConfig) -> bool {
    stats.custom_folders().len() >= config.frequent_filer_min_folders
        && stats.avg_len() >= config.frequent_filer_min_avg_len
        && stats.big_folders().len() >= config.frequent_filer_min_big_folders
}

/// The `top_k` big folders with the greatest summed message importance.
///
/// Sums run in table row order. Ranking is descending by sum, ties by label.
///
/// # Errors
///
/// Returns [`Error::DimensionMismatch`] if `field` does not cover every row.
pub fn three_important_folders(
    stats: &FolderStats,
    table: &MessageTable,
    field: &ImportanceField,
    config: &AnalysisConfig,
) -> Result<Vec<String>> {
    if field.len() != table.len() {
        return Err(Error::DimensionMismatch {
            what: "importance field rows",
            expected: table.len(),
            found: field.len(),
        });
    }

    let mut sums: BTreeMap<&str, f64> = stats
        .big_folders()
        .iter()
        .map(|folder| (folder.as_str(), 0.0))
        .collect();
    for (msg, imp) in table.iter().zip(field.values()) {
        if let Some(sum) = sums.get_mut(msg.folder.as_str()) {
            *sum += imp;
        }
    }

    let mut ranked: Vec<(&str, f64)> = sums.into_iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    Ok(ranked
        .into_iter()
        .take(config.top_k)
        .map(|(folder, _)| folder.to_string())
        .collect())
}
