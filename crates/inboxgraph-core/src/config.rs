//! Analysis configuration.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Number of sequential time buckets.
pub const BUCKET_COUNT: usize = 3;

/// Thresholds and folder labels driving the analysis.
///
/// Every field has a default, so a JSON document only needs to name the
/// values it overrides:
///
/// ```ignore
/// let config = AnalysisConfig::from_json(r#"{ "sent_folder": "Sent Items" }"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Label of the sent folder.
    pub sent_folder: String,
    /// Label of the inbox.
    pub inbox_folder: String,
    /// Label of the archive folder.
    pub archive_folder: String,
    /// Placeholder used by the loader for unknown names.
    pub unknown_sender: String,
    /// Small constant guarding divisions and scores.
    pub epsilon: f64,
    /// Added to every message importance.
    pub importance_offset: f64,
    /// Minimum size above which a folder can be big.
    pub big_folder_floor: usize,
    /// Average folder length is divided by this for the big-folder threshold.
    pub big_folder_divisor: f64,
    /// Custom folders needed for a frequent filer.
    pub frequent_filer_min_folders: usize,
    /// Average custom folder length needed for a frequent filer.
    pub frequent_filer_min_avg_len: f64,
    /// Big folders needed for a frequent filer.
    pub frequent_filer_min_big_folders: usize,
    /// Width of each time bucket in days.
    pub bucket_width_days: i64,
    /// A bucket must hold more messages than this for temporal soundness.
    pub min_bucket_size: usize,
    /// Length of the top correspondent and top folder rankings.
    pub top_k: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sent_folder: "sent_items".to_string(),
            inbox_folder: "inbox".to_string(),
            archive_folder: "Archive".to_string(),
            unknown_sender: "<UNKNOWN>".to_string(),
            epsilon: 1e-3,
            importance_offset: 0.01,
            big_folder_floor: 50,
            big_folder_divisor: 3.0,
            frequent_filer_min_folders: 3,
            frequent_filer_min_avg_len: 30.0,
            frequent_filer_min_big_folders: 3,
            bucket_width_days: 60,
            min_bucket_size: 20,
            top_k: 3,
        }
    }
}

impl AnalysisConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder::new()
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or fails [`Self::validate`].
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the numeric settings.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for a non-finite or non-positive
    /// epsilon or divisor, a non-finite offset, or a non-positive bucket width.
    pub fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "epsilon must be positive, got {}",
                self.epsilon
            )));
        }
        if !self.importance_offset.is_finite() {
            return Err(Error::InvalidConfig(
                "importance_offset must be finite".to_string(),
            ));
        }
        if !self.big_folder_divisor.is_finite() || self.big_folder_divisor <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "big_folder_divisor must be positive, got {}",
                self.big_folder_divisor
            )));
        }
        if self.bucket_width_days <= 0 {
            return Err(Error::InvalidConfig(format!(
                "bucket_width_days must be positive, got {}",
                self.bucket_width_days
            )));
        }
        Ok(())
    }

    /// Returns true if `name` is the unknown placeholder, ignoring case.
    #[must_use]
    pub fn is_unknown(&self, name: &str) -> bool {
        name.to_uppercase() == self.unknown_sender.to_uppercase()
    }

    /// Returns true if `folder` is the sent folder.
    #[must_use]
    pub fn is_sent(&self, folder: &str) -> bool {
        folder == self.sent_folder
    }

    /// Size a folder must exceed to count as big.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn big_folder_threshold(&self, avg_len: f64) -> f64 {
        (self.big_folder_floor as f64).max(avg_len / self.big_folder_divisor)
    }

    /// End of the last time bucket, exclusive.
    #[must_use]
    #[allow(clippy::cast_possible_wrap)]
    pub const fn horizon_days(&self) -> i64 {
        self.bucket_width_days.saturating_mul(BUCKET_COUNT as i64)
    }
}

/// Builder for analysis configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the sent folder label.
    #[must_use]
    pub fn sent_folder(mut self, label: impl Into<String>) -> Self {
        self.config.sent_folder = label.into();
        self
    }

    /// Sets the inbox label.
    #[must_use]
    pub fn inbox_folder(mut self, label: impl Into<String>) -> Self {
        self.config.inbox_folder = label.into();
        self
    }

    /// Sets the archive folder label.
    #[must_use]
    pub fn archive_folder(mut self, label: impl Into<String>) -> Self {
        self.config.archive_folder = label.into();
        self
    }

    /// Sets the unknown-name placeholder.
    #[must_use]
    pub fn unknown_sender(mut self, placeholder: impl Into<String>) -> Self {
        self.config.unknown_sender = placeholder.into();
        self
    }

    /// Sets epsilon.
    #[must_use]
    pub const fn epsilon(mut self, epsilon: f64) -> Self {
        self.config.epsilon = epsilon;
        self
    }

    /// Sets the per-message importance offset.
    #[must_use]
    pub const fn importance_offset(mut self, offset: f64) -> Self {
        self.config.importance_offset = offset;
        self
    }

    /// Sets the big-folder floor and divisor.
    #[must_use]
    pub const fn big_folder(mut self, floor: usize, divisor: f64) -> Self {
        self.config.big_folder_floor = floor;
        self.config.big_folder_divisor = divisor;
        self
    }

    /// Sets the frequent-filer thresholds.
    #[must_use]
    pub const fn frequent_filer(
        mut self,
        min_folders: usize,
        min_avg_len: f64,
        min_big_folders: usize,
    ) -> Self {
        self.config.frequent_filer_min_folders = min_folders;
        self.config.frequent_filer_min_avg_len = min_avg_len;
        self.config.frequent_filer_min_big_folders = min_big_folders;
        self
    }

    /// Sets the time bucket width in days.
    #[must_use]
    pub const fn bucket_width_days(mut self, days: i64) -> Self {
        self.config.bucket_width_days = days;
        self
    }

    /// Sets the temporal soundness threshold.
    #[must_use]
    pub const fn min_bucket_size(mut self, size: usize) -> Self {
        self.config.min_bucket_size = size;
        self
    }

    /// Sets the ranking length.
    #[must_use]
    pub const fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration fails validation.
    pub fn build(self) -> Result<AnalysisConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalysisConfig::new();
        assert_eq!(config.sent_folder, "sent_items");
        assert_eq!(config.archive_folder, "Archive");
        assert_eq!(config.epsilon, 1e-3);
        assert_eq!(config.horizon_days(), 180);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_is_case_insensitive() {
        let config = AnalysisConfig::new();
        assert!(config.is_unknown("<UNKNOWN>"));
        assert!(config.is_unknown("<unknown>"));
        assert!(!config.is_unknown("unknown"));
    }

    #[test]
    fn test_big_folder_threshold() {
        let config = AnalysisConfig::new();
        assert_eq!(config.big_folder_threshold(90.0), 50.0);
        assert_eq!(config.big_folder_threshold(300.0), 100.0);
    }

    #[test]
    fn test_partial_json_overrides() {
        let config =
            AnalysisConfig::from_json(r#"{ "sent_folder": "Sent Items", "top_k": 5 }"#).unwrap();
        assert_eq!(config.sent_folder, "Sent Items");
        assert_eq!(config.top_k, 5);
        assert_eq!(config.inbox_folder, "inbox");
    }

    #[test]
    fn test_invalid_json_values() {
        assert!(matches!(
            AnalysisConfig::from_json(r#"{ "epsilon": 0.0 }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json(r#"{ "bucket_width_days": 0 }"#),
            Err(Error::InvalidConfig(_))
        ));
        assert!(matches!(
            AnalysisConfig::from_json("{ not json"),
            Err(Error::Serde(_))
        ));
    }

    #[test]
    fn test_builder() {
        let config = AnalysisConfig::builder()
            .sent_folder("Sent")
            .big_folder(10, 2.0)
            .min_bucket_size(5)
            .build()
            .unwrap();
        assert_eq!(config.sent_folder, "Sent");
        assert_eq!(config.big_folder_floor, 10);
        assert_eq!(config.min_bucket_size, 5);

        assert!(AnalysisConfig::builder().big_folder(50, -1.0).build().is_err());
    }
}
