//! The cleaning pipeline.

use std::collections::HashSet;
use std::sync::LazyLock;

use tracing::{info, warn};

use crate::config::NormalizerConfig;
use crate::error::{Error, Result};
use crate::lemma::{LemmaOutcome, Lemmatized, Lemmatizer, PartOfSpeech, shorter_lemma};
use crate::patterns::{self, SignaturePatterns};

static PLAIN: LazyLock<TextNormalizer> = LazyLock::new(TextNormalizer::plain);

/// Turns raw message text into redacted, lemmatized tokens.
///
/// The pipeline is fixed; later stages rely on the tags emitted by earlier
/// ones (dates look for `<month>`, signatures look for `<meta>`).
pub struct TextNormalizer {
    config: NormalizerConfig,
    lemmatizer: Option<Box<dyn Lemmatizer>>,
    signatures: Vec<SignaturePatterns>,
}

impl std::fmt::Debug for TextNormalizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextNormalizer")
            .field("config", &self.config)
            .field("lemmatizer", &self.lemmatizer.is_some())
            .finish_non_exhaustive()
    }
}

impl TextNormalizer {
    /// Creates a normalizer.
    ///
    /// The lemmatizer is probed once; if it reports no data or fails on the
    /// probe word, the normalizer runs without it and tokens are only
    /// length-filtered.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or a sign-off phrase
    /// cannot be compiled.
    pub fn new(config: NormalizerConfig, lemmatizer: Option<Box<dyn Lemmatizer>>) -> Result<Self> {
        config.validate()?;

        let signatures = if config.strip_signatures {
            config
                .signatures
                .iter()
                .map(|phrase| {
                    SignaturePatterns::new(phrase)
                        .map_err(|e| Error::InvalidConfig(format!("signature {phrase:?}: {e}")))
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let lemmatizer = lemmatizer.filter(|lemmatizer| {
            let usable = lemmatizer.is_available()
                && lemmatizer.lemmatize("test_word", PartOfSpeech::Noun).is_ok();
            if !usable {
                info!("Lemmatizer unavailable, tokens will only be length-filtered");
            }
            usable
        });

        Ok(Self {
            config,
            lemmatizer,
            signatures,
        })
    }

    /// Default configuration, no lemmatizer.
    #[must_use]
    pub fn plain() -> Self {
        Self {
            config: NormalizerConfig::default(),
            lemmatizer: None,
            signatures: Vec::new(),
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Returns true if tokens are shortened by lemmatization.
    #[must_use]
    pub const fn has_lemmatizer(&self) -> bool {
        self.lemmatizer.is_some()
    }

    /// Cleans `text` into space-separated tokens. Never fails.
    #[must_use]
    pub fn clean(&self, text: &str) -> String {
        let redacted = self.redact(text);
        redacted
            .split_whitespace()
            .filter(|word| self.config.keeps_len(word.len()))
            .map(|word| self.shorten(word).word)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs every stage up to (not including) tokenization.
    #[must_use]
    pub fn redact(&self, text: &str) -> String {
        let text = text.to_lowercase();
        let text = patterns::ANGLE.replace_all(&text, |caps: &regex::Captures<'_>| {
            let found = &caps[0];
            if found.len() > 1 {
                found.to_string()
            } else {
                " ".to_string()
            }
        });
        let text: String = text
            .chars()
            .map(|c| if c.is_ascii() { c } else { ' ' })
            .collect();

        let text = patterns::HEADER.replace_all(&text, "<meta>");
        let text = patterns::ORIGINAL.replace_all(&text, " ");
        let text = patterns::DECORATION_TO_META.replace_all(&text, " ");
        let mut text = patterns::DECORATION_TO_END.replace_all(&text, " ").into_owned();
        for signature in &self.signatures {
            text = strip_signature(&text, signature);
        }

        let text = patterns::EMAIL.replace_all(&text, "<email>");
        let text = patterns::URL_HTTP.replace_all(&text, " <url> ");
        let text = patterns::URL_HTTPS.replace_all(&text, " <url> ");
        let text = patterns::URL_WWW.replace_all(&text, " <url> ");
        let text = patterns::WEEKDAY.replace_all(&text, "${1}<weekday>${3} ");
        let text = patterns::WEEKEND.replace_all(&text, "${1}<weekend>${3} ");
        let text = patterns::MONTH.replace_all(&text, "${1}<month>${3} ");
        let text = patterns::TIME.replace_all(&text, " <time> ");
        let text = patterns::DATE.replace_all(&text, " <date> ");
        let text = patterns::MONEY.replace_all(&text, " <money> ");
        let text = patterns::NUMBER.replace_all(&text, "${1} <number> ${2}");
        let text = patterns::NON_TOKEN.replace_all(&text, " ");
        let text = patterns::RUNS.replace_all(&text, " ");
        patterns::STRAY_HYPHEN.replace_all(&text, " ").into_owned()
    }

    /// Shortens one token by lemmatization, best effort.
    #[must_use]
    pub fn shorten(&self, word: &str) -> Lemmatized {
        let Some(lemmatizer) = self.lemmatizer.as_deref() else {
            return Lemmatized::kept(word, LemmaOutcome::Unavailable);
        };
        let result = shorter_lemma(lemmatizer, word);
        if let LemmaOutcome::Failed(err) = &result.outcome {
            warn!("Lemmatization failed for word {word:?}: {err}");
        }
        result
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::plain()
    }
}

fn strip_signature(text: &str, signature: &SignaturePatterns) -> String {
    let text = signature.to_meta.replace_all(text, " ");
    signature.to_end.replace_all(&text, " ").into_owned()
}

/// Cleans `text` with the default configuration and no lemmatizer.
#[must_use]
pub fn clean(text: &str) -> String {
    PLAIN.clean(text)
}

/// Drops every token found in `stop`.
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn remove_stopwords(text: &str, stop: &HashSet<String>) -> String {
    text.split_whitespace()
        .filter(|word| !stop.contains(*word))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes sign-off blocks ("regards," and what follows it) from `text`.
///
/// Expects text already lowercased with header lines turned into `<meta>`;
/// a block runs up to the next `<meta>` or, failing that, to the end.
///
/// # Errors
///
/// Returns an error if a phrase cannot be compiled into a pattern.
pub fn remove_signature<S: AsRef<str>>(text: &str, signatures: &[S]) -> Result<String> {
    let mut text = text.to_string();
    for phrase in signatures {
        let phrase = phrase.as_ref();
        let patterns = SignaturePatterns::new(phrase)
            .map_err(|e| Error::InvalidConfig(format!("signature {phrase:?}: {e}")))?;
        text = strip_signature(&text, &patterns);
    }
    Ok(text)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::LemmaError;
    use crate::lemma::{Lexicon, Morphy};

    fn tokens(text: &str) -> Vec<String> {
        text.split_whitespace().map(ToString::to_string).collect()
    }

    #[test]
    fn test_redacts_everything_in_sentence() {
        let out = clean("Call me at 5pm on Monday, 12/03/2021, cost $20, visit http://x.com");
        let toks = tokens(&out);
        for tag in ["<time>", "<weekday>", "<date>", "<money>", "<url>"] {
            assert!(toks.iter().any(|t| t == tag), "missing {tag} in {out:?}");
        }
        assert!(!out.chars().any(|c| c.is_ascii_digit()));
        assert!(!out.contains("http"));
        assert!(!out.contains("x.com"));
        assert_eq!(out, "call <time> <weekday> <date> cost <money> visit <url>");
    }

    #[test]
    fn test_header_lines_become_meta() {
        let out = clean("From: Alice Smith\nTo: bob\nSubject: lunch plans\nsounds great");
        assert_eq!(out, "<meta> <meta> <meta> sounds great");
    }

    #[test]
    fn test_from_requires_space() {
        let out = clean("from:nobody\nhello there");
        assert_eq!(out, "from nobody hello there");
    }

    #[test]
    fn test_original_message_separator() {
        let out = clean("thanks -----Original Message----- bye now");
        assert_eq!(out, "thanks bye now");
    }

    #[test]
    fn test_decoration_line_strips_quote_until_meta() {
        let out = clean("see below\n*******\nquoted junk here\nFrom: carol\nnew text");
        assert_eq!(out, "see below new text");
    }

    #[test]
    fn test_decoration_line_strips_to_end() {
        let out = clean("real content\n________\nlegal disclaimer text");
        assert_eq!(out, "real content");
    }

    #[test]
    fn test_email_redaction() {
        let out = clean("write to jane.doe@example.com today");
        assert_eq!(out, "write <email> today");
    }

    #[test]
    fn test_angle_brackets_around_address() {
        let out = clean("Jane <jane@example.com>");
        assert_eq!(out, "jane <email>");
    }

    #[test]
    fn test_www_and_https() {
        let out = clean("see www.example.com and https://secure.example.com/path");
        assert_eq!(out, "see <url> and <url>");
    }

    #[test]
    fn test_weekend_and_month() {
        let out = clean("party on saturday in june");
        assert_eq!(out, "party <weekend> <month>");
    }

    #[test]
    fn test_month_day_becomes_date() {
        let out = clean("due january 5th please");
        assert_eq!(out, "due <date> please");
    }

    #[test]
    fn test_name_inside_word_not_redacted() {
        let out = clean("monitor the fridge");
        assert_eq!(out, "monitor the fridge");
    }

    #[test]
    fn test_clock_time_with_minutes() {
        let out = clean("meet at 10:30 am sharp");
        assert_eq!(out, "meet <time> sharp");
    }

    #[test]
    fn test_rupees() {
        let out = clean("paid rs. 500 already");
        assert_eq!(out, "paid <money> already");
    }

    #[test]
    fn test_bare_numbers() {
        let out = clean("room 42 floor 7");
        assert_eq!(out, "room <number> floor <number>");
    }

    #[test]
    fn test_digits_glued_to_names() {
        let out = clean("Report due 12jan2021 please");
        assert_eq!(out, "report due <number> <month> <number> <number> please");
        assert_eq!(clean(&out), out);

        assert_eq!(clean("meet 5june"), "meet <number> <month>");
        assert_eq!(clean("back 2dec"), "back <number> <month>");
        assert_eq!(clean("call 3mon"), "call <number> <weekday>");
    }

    #[test]
    fn test_adjacent_names_of_one_kind() {
        // The first name consumes the boundary the second one needs.
        assert_eq!(clean("open Mon-Fri"), "open <weekday> fri");
        assert_eq!(clean("monday tuesday"), "<weekday> tuesday");
        assert_eq!(clean("monday june"), "<weekday> <month>");
    }

    #[test]
    fn test_non_ascii_replaced() {
        assert_eq!(clean("café olé"), "caf");
        assert_eq!(clean("naïve résumé"), "sum");
    }

    #[test]
    fn test_hyphen_cleanup() {
        assert_eq!(clean("well-known fact"), "well-known fact");
        assert_eq!(clean("dash --- here"), "dash here");
        assert_eq!(clean("trailing- hyphen"), "trailing hyphen");
    }

    #[test]
    fn test_length_filter() {
        let out = clean("a an the supercalifragilisticexpialidocious word");
        assert_eq!(out, "the word");
    }

    #[test]
    fn test_tags_are_stable_on_second_pass() {
        let once = clean("Call me at 5pm on Monday, cost $20, mail bob@x.org");
        let twice = clean(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_lemmatizer_shortens_tokens() {
        let lexicon = Lexicon::from_words(["meeting", "report"], ["schedule"]);
        let normalizer =
            TextNormalizer::new(NormalizerConfig::default(), Some(Box::new(Morphy::new(lexicon))))
                .unwrap();
        assert!(normalizer.has_lemmatizer());
        assert_eq!(
            normalizer.clean("scheduled meetings and reports"),
            "schedule meeting and report"
        );
    }

    #[test]
    fn test_empty_lexicon_degrades_to_filtering() {
        let normalizer =
            TextNormalizer::new(NormalizerConfig::default(), Some(Box::new(Morphy::default())))
                .unwrap();
        assert!(!normalizer.has_lemmatizer());
        assert_eq!(normalizer.clean("scheduled meetings"), "scheduled meetings");
        assert_eq!(normalizer.shorten("meetings").outcome, LemmaOutcome::Unavailable);
    }

    struct Flaky;

    impl Lemmatizer for Flaky {
        fn lemmatize(&self, word: &str, _pos: PartOfSpeech) -> std::result::Result<String, LemmaError> {
            if word.starts_with('x') {
                Err(LemmaError::Unsupported(word.to_string()))
            } else {
                Ok(word.trim_end_matches('s').to_string())
            }
        }
    }

    #[test]
    fn test_lemma_failure_keeps_word() {
        let normalizer =
            TextNormalizer::new(NormalizerConfig::default(), Some(Box::new(Flaky))).unwrap();
        assert_eq!(normalizer.clean("xrays cats"), "xrays cat");
        assert!(normalizer.shorten("xrays").is_failure());
    }

    #[test]
    fn test_failing_probe_disables_lemmatizer() {
        struct Broken;
        impl Lemmatizer for Broken {
            fn lemmatize(&self, word: &str, _pos: PartOfSpeech) -> std::result::Result<String, LemmaError> {
                Err(LemmaError::Unsupported(word.to_string()))
            }
        }
        let normalizer =
            TextNormalizer::new(NormalizerConfig::default(), Some(Box::new(Broken))).unwrap();
        assert!(!normalizer.has_lemmatizer());
        assert_eq!(normalizer.clean("cats"), "cats");
    }

    #[test]
    fn test_signature_stage() {
        let config = NormalizerConfig::builder().strip_signatures(true).build().unwrap();
        let normalizer = TextNormalizer::new(config, None).unwrap();
        let out = normalizer.clean("see you there\nRegards,\nJohn Smith\nCEO Widgets");
        assert_eq!(out, "see you there");

        let plain = clean("see you there\nRegards,\nJohn Smith");
        assert_eq!(plain, "see you there regards john smith");
    }

    #[test]
    fn test_remove_signature_stops_at_meta() {
        let out = remove_signature("hi\nthanks,\njoe\n<meta>\nolder mail", &["thanks"]).unwrap();
        assert_eq!(out, "hi\n \nolder mail");
    }

    #[test]
    fn test_remove_stopwords() {
        let stop: HashSet<String> = ["the", "and"].iter().map(ToString::to_string).collect();
        assert_eq!(
            remove_stopwords("the cat and the  dog", &stop),
            "cat dog"
        );
    }
}
