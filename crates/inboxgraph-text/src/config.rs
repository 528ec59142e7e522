//! Normalizer configuration types.

use serde::Deserialize;

use crate::error::{Error, Result};

/// Sign-off phrases recognised by the optional signature stage.
pub const DEFAULT_SIGNATURES: &[&str] = &[
    "best",
    "thanking you",
    "thanks",
    "yours sincerely",
    "sincerely",
    "warm regards",
    "regards",
    "best regards",
];

/// Text normalizer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// Tokens must be strictly longer than this.
    pub min_token_len: usize,
    /// Tokens must be strictly shorter than this.
    pub max_token_len: usize,
    /// Remove sign-off blocks ("regards," and what follows).
    pub strip_signatures: bool,
    /// Sign-off phrases used when `strip_signatures` is set.
    pub signatures: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            max_token_len: 20,
            strip_signatures: false,
            signatures: DEFAULT_SIGNATURES.iter().map(ToString::to_string).collect(),
        }
    }
}

impl NormalizerConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> NormalizerConfigBuilder {
        NormalizerConfigBuilder::new()
    }

    /// Returns true if a token of this length survives the length filter.
    #[must_use]
    pub const fn keeps_len(&self, len: usize) -> bool {
        self.min_token_len < len && len < self.max_token_len
    }

    /// Checks that the token bounds leave room for at least one length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if no token length can pass the filter.
    pub fn validate(&self) -> Result<()> {
        if self.max_token_len <= self.min_token_len + 1 {
            return Err(Error::InvalidConfig(format!(
                "empty token length window ({}, {})",
                self.min_token_len, self.max_token_len
            )));
        }
        Ok(())
    }
}

/// Builder for normalizer configuration.
#[derive(Debug, Clone, Default)]
pub struct NormalizerConfigBuilder {
    config: NormalizerConfig,
}

impl NormalizerConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the exclusive lower token length bound.
    #[must_use]
    pub const fn min_token_len(mut self, len: usize) -> Self {
        self.config.min_token_len = len;
        self
    }

    /// Sets the exclusive upper token length bound.
    #[must_use]
    pub const fn max_token_len(mut self, len: usize) -> Self {
        self.config.max_token_len = len;
        self
    }

    /// Enables or disables the signature stage.
    #[must_use]
    pub const fn strip_signatures(mut self, enabled: bool) -> Self {
        self.config.strip_signatures = enabled;
        self
    }

    /// Replaces the sign-off phrases.
    #[must_use]
    pub fn signatures<I, S>(mut self, signatures: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.signatures = signatures.into_iter().map(Into::into).collect();
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the token length window is empty.
    pub fn build(self) -> Result<NormalizerConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
