//! Known lemmas per part of speech.

use std::collections::HashSet;
use std::io::BufRead;

use super::PartOfSpeech;
use crate::error::{Error, Result};

/// Set of valid lemmas for nouns and verbs.
///
/// Candidate forms produced by suffix rules are only accepted when the
/// lexicon knows them.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    nouns: HashSet<String>,
    verbs: HashSet<String>,
}

impl Lexicon {
    /// Creates an empty lexicon.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a lexicon from word lists.
    #[must_use]
    pub fn from_words<N, V>(nouns: N, verbs: V) -> Self
    where
        N: IntoIterator,
        N::Item: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        let mut lexicon = Self::new();
        for noun in nouns {
            lexicon.insert(PartOfSpeech::Noun, noun);
        }
        for verb in verbs {
            lexicon.insert(PartOfSpeech::Verb, verb);
        }
        lexicon
    }

    /// Adds a lemma (lowercased).
    pub fn insert(&mut self, pos: PartOfSpeech, word: impl Into<String>) {
        let word = word.into().to_lowercase();
        self.set_mut(pos).insert(word);
    }

    /// Returns true if `word` is a known lemma for `pos`.
    #[must_use]
    pub fn contains(&self, pos: PartOfSpeech, word: &str) -> bool {
        self.set(pos).contains(word)
    }

    /// Number of lemmas known for `pos`.
    #[must_use]
    pub fn len(&self, pos: PartOfSpeech) -> usize {
        self.set(pos).len()
    }

    /// Returns true if no lemma is known at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nouns.is_empty() && self.verbs.is_empty()
    }

    /// Loads lemmas from a WordNet `index.<pos>` file.
    ///
    /// Lines starting with a space are license text and are skipped. Every
    /// other line starts with `lemma pos ...`; underscores in the lemma join
    /// collocations and are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails or a line lacks the part-of-speech
    /// field.
    pub fn add_wordnet_index<R: BufRead>(&mut self, reader: R, pos: PartOfSpeech) -> Result<usize> {
        let mut added = 0;
        for (number, line) in reader.lines().enumerate() {
            let line = line?;
            if line.is_empty() || line.starts_with(' ') {
                continue;
            }

            let mut fields = line.split_whitespace();
            let (Some(lemma), Some(tag)) = (fields.next(), fields.next()) else {
                return Err(Error::Lexicon {
                    line: number + 1,
                    message: "expected `lemma pos ...`".to_string(),
                });
            };
            if PartOfSpeech::from_tag(tag).is_some_and(|found| found != pos) {
                return Err(Error::Lexicon {
                    line: number + 1,
                    message: format!("entry tagged {tag:?} in {} index", pos.as_tag()),
                });
            }

            self.insert(pos, lemma);
            added += 1;
        }
        Ok(added)
    }

    /// Creates a lexicon from a WordNet `index.<pos>` file.
    ///
    /// # Errors
    ///
    /// See [`Lexicon::add_wordnet_index`].
    pub fn from_wordnet_index<R: BufRead>(reader: R, pos: PartOfSpeech) -> Result<Self> {
        let mut lexicon = Self::new();
        lexicon.add_wordnet_index(reader, pos)?;
        Ok(lexicon)
    }

    const fn set(&self, pos: PartOfSpeech) -> &HashSet<String> {
        match pos {
            PartOfSpeech::Noun => &self.nouns,
            PartOfSpeech::Verb => &self.verbs,
        }
    }

    const fn set_mut(&mut self, pos: PartOfSpeech) -> &mut HashSet<String> {
        match pos {
            PartOfSpeech::Noun => &mut self.nouns,
            PartOfSpeech::Verb => &mut self.verbs,
        }
    }
}
