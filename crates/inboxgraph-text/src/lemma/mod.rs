//! Lemmatization.
//!
//! The normalizer only needs one thing from a lemmatizer: a base form for a
//! word under noun or verb rules. [`Lemmatizer`] is that seam; [`Morphy`] is
//! the built-in implementation (WordNet-style suffix detachment checked
//! against a [`Lexicon`]).

mod lexicon;
mod morphy;

pub use lexicon::Lexicon;
pub use morphy::Morphy;

use crate::error::LemmaError;

/// Part of speech used to select detachment rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PartOfSpeech {
    /// Noun rules (plural detachment).
    Noun,
    /// Verb rules (inflection detachment).
    Verb,
}

impl PartOfSpeech {
    /// Parses the one-letter WordNet tag (`n`, `v`).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "n" => Some(Self::Noun),
            "v" => Some(Self::Verb),
            _ => None,
        }
    }

    /// Returns the one-letter WordNet tag.
    #[must_use]
    pub const fn as_tag(self) -> &'static str {
        match self {
            Self::Noun => "n",
            Self::Verb => "v",
        }
    }
}

/// Produces base forms of words.
pub trait Lemmatizer: Send + Sync {
    /// Returns the lemma of `word` under `pos` rules, or the word itself when
    /// no lemma is known.
    ///
    /// # Errors
    ///
    /// Returns a [`LemmaError`] if the word cannot be processed.
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> Result<String, LemmaError>;

    /// Returns false when the lemmatizer has no data to work with.
    fn is_available(&self) -> bool {
        true
    }
}

/// How a token came out of the shortening step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LemmaOutcome {
    /// A strictly shorter lemma replaced the token.
    Shortened(PartOfSpeech),
    /// No shorter lemma exists.
    Unchanged,
    /// The lemmatizer failed; the token was kept.
    Failed(LemmaError),
    /// No lemmatizer is configured; the token was kept.
    Unavailable,
}

/// Best-effort lemmatization result: the word to emit plus how it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lemmatized {
    /// Word to emit.
    pub word: String,
    /// How the word was produced.
    pub outcome: LemmaOutcome,
}

impl Lemmatized {
    /// Keeps `word` as is.
    #[must_use]
    pub fn kept(word: &str, outcome: LemmaOutcome) -> Self {
        Self {
            word: word.to_string(),
            outcome,
        }
    }

    /// Returns true if the lemmatizer failed on this word.
    #[must_use]
    pub const fn is_failure(&self) -> bool {
        matches!(self.outcome, LemmaOutcome::Failed(_))
    }
}

/// Tries noun then verb rules and keeps the first strictly shorter form.
///
/// Any error aborts the attempt and keeps the original word.
#[must_use]
pub fn shorter_lemma(lemmatizer: &dyn Lemmatizer, word: &str) -> Lemmatized {
    for pos in [PartOfSpeech::Noun, PartOfSpeech::Verb] {
        match lemmatizer.lemmatize(word, pos) {
            Ok(lemma) if lemma.len() < word.len() => {
                return Lemmatized {
                    word: lemma,
                    outcome: LemmaOutcome::Shortened(pos),
                };
            }
            Ok(_) => {}
            Err(err) => return Lemmatized::kept(word, LemmaOutcome::Failed(err)),
        }
    }
    Lemmatized::kept(word, LemmaOutcome::Unchanged)
}
