//! WordNet-style morphological lemmatizer.

use std::collections::HashSet;

use super::{Lemmatizer, Lexicon, PartOfSpeech};
use crate::error::LemmaError;

const NOUN_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ses", "s"),
    ("ves", "f"),
    ("xes", "x"),
    ("zes", "z"),
    ("ches", "ch"),
    ("shes", "sh"),
    ("men", "man"),
    ("ies", "y"),
];

const VERB_RULES: &[(&str, &str)] = &[
    ("s", ""),
    ("ies", "y"),
    ("es", "e"),
    ("es", ""),
    ("ed", "e"),
    ("ed", ""),
    ("ing", "e"),
    ("ing", ""),
];

const NOUN_EXCEPTIONS: &[(&str, &[&str])] = &[
    ("analyses", &["analysis"]),
    ("children", &["child"]),
    ("criteria", &["criterion"]),
    ("data", &["datum"]),
    ("feet", &["foot"]),
    ("geese", &["goose"]),
    ("mice", &["mouse"]),
    ("people", &["person"]),
    ("teeth", &["tooth"]),
];

const VERB_EXCEPTIONS: &[(&str, &[&str])] = &[
    ("are", &["be"]),
    ("began", &["begin"]),
    ("begun", &["begin"]),
    ("been", &["be"]),
    ("bought", &["buy"]),
    ("brought", &["bring"]),
    ("came", &["come"]),
    ("did", &["do"]),
    ("does", &["do"]),
    ("done", &["do"]),
    ("felt", &["feel"]),
    ("found", &["find"]),
    ("gave", &["give"]),
    ("given", &["give"]),
    ("gone", &["go"]),
    ("got", &["get"]),
    ("had", &["have"]),
    ("has", &["have"]),
    ("held", &["hold"]),
    ("kept", &["keep"]),
    ("knew", &["know"]),
    ("known", &["know"]),
    ("left", &["leave"]),
    ("made", &["make"]),
    ("met", &["meet"]),
    ("paid", &["pay"]),
    ("ran", &["run"]),
    ("running", &["run"]),
    ("said", &["say"]),
    ("saw", &["see"]),
    ("seen", &["see"]),
    ("sent", &["send"]),
    ("sold", &["sell"]),
    ("spoke", &["speak"]),
    ("spoken", &["speak"]),
    ("taken", &["take"]),
    ("thought", &["think"]),
    ("told", &["tell"]),
    ("took", &["take"]),
    ("was", &["be"]),
    ("went", &["go"]),
    ("were", &["be"]),
    ("wrote", &["write"]),
    ("written", &["write"]),
];

/// Lemmatizer applying WordNet detachment rules filtered by a [`Lexicon`].
///
/// For a word, the candidate forms are the word itself plus every form the
/// suffix rules produce (or its irregular forms, when listed). Candidates
/// unknown to the lexicon are discarded; the shortest survivor is the lemma.
/// With no survivor the word is returned unchanged.
#[derive(Debug, Clone, Default)]
pub struct Morphy {
    lexicon: Lexicon,
}

impl Morphy {
    /// Creates a lemmatizer over `lexicon`.
    #[must_use]
    pub const fn new(lexicon: Lexicon) -> Self {
        Self { lexicon }
    }

    /// Returns the lexicon.
    #[must_use]
    pub const fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// All lexicon-approved base forms of `word`, in discovery order.
    #[must_use]
    pub fn base_forms(&self, word: &str, pos: PartOfSpeech) -> Vec<String> {
        let (rules, exceptions) = match pos {
            PartOfSpeech::Noun => (NOUN_RULES, NOUN_EXCEPTIONS),
            PartOfSpeech::Verb => (VERB_RULES, VERB_EXCEPTIONS),
        };

        if let Some((_, irregular)) = exceptions.iter().find(|(form, _)| *form == word) {
            let candidates = std::iter::once(word.to_string())
                .chain(irregular.iter().map(ToString::to_string));
            return self.known(pos, candidates);
        }

        let mut forms = apply_rules(rules, &[word.to_string()]);
        let found = self.known(pos, std::iter::once(word.to_string()).chain(forms.clone()));
        if !found.is_empty() {
            return found;
        }

        // Keep detaching until something is known or nothing matches.
        while !forms.is_empty() {
            forms = apply_rules(rules, &forms);
            let found = self.known(pos, forms.iter().cloned());
            if !found.is_empty() {
                return found;
            }
        }
        Vec::new()
    }

    fn known(&self, pos: PartOfSpeech, candidates: impl IntoIterator<Item = String>) -> Vec<String> {
        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .filter(|form| self.lexicon.contains(pos, form) && seen.insert(form.clone()))
            .collect()
    }
}

fn apply_rules(rules: &[(&str, &str)], forms: &[String]) -> Vec<String> {
    forms
        .iter()
        .flat_map(|form| {
            rules.iter().filter_map(move |(old, new)| {
                form.strip_suffix(old).map(|stem| format!("{stem}{new}"))
            })
        })
        .filter(|form| !form.is_empty())
        .collect()
}

impl Lemmatizer for Morphy {
    fn lemmatize(&self, word: &str, pos: PartOfSpeech) -> Result<String, LemmaError> {
        if word.is_empty() {
            return Err(LemmaError::EmptyWord);
        }
        if word.chars().any(char::is_whitespace) {
            return Err(LemmaError::Unsupported(word.to_string()));
        }

        let forms = self.base_forms(word, pos);
        Ok(forms
            .into_iter()
            .min_by_key(String::len)
            .unwrap_or_else(|| word.to_string()))
    }

    fn is_available(&self) -> bool {
        !self.lexicon.is_empty()
    }
}
