//! # inboxgraph-text
//!
//! Email text normalization for topic modeling.
//!
//! ## Features
//!
//! - **Redaction**: header lines, quoted replies, addresses, links, weekdays,
//!   months, clock times, dates, money and numbers become tags such as
//!   `<meta>`, `<email>`, `<url>`, `<time>`, `<date>`, `<money>`
//! - **Token filtering**: only tokens of 3 to 19 characters survive
//! - **Lemmatization**: tokens are shortened to their noun or verb lemma
//!   when a [`Lemmatizer`] with data is configured
//! - **Stop words and sign-offs**: optional removal stages
//!
//! ## Quick Start
//!
//! ```ignore
//! use inboxgraph_text::{clean, Lexicon, Morphy, NormalizerConfig, PartOfSpeech, TextNormalizer};
//!
//! // Redaction and filtering only
//! let tokens = clean("Call me at 5pm on Monday, cost $20");
//! assert_eq!(tokens, "call <time> <weekday> cost <money>");
//!
//! // With a WordNet lexicon
//! let nouns = std::io::BufReader::new(std::fs::File::open("dict/index.noun")?);
//! let lexicon = Lexicon::from_wordnet_index(nouns, PartOfSpeech::Noun)?;
//! let normalizer = TextNormalizer::new(
//!     NormalizerConfig::default(),
//!     Some(Box::new(Morphy::new(lexicon))),
//! )?;
//! println!("{}", normalizer.clean("Meetings were rescheduled"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod normalize;

pub mod lemma;
pub mod patterns;

pub use config::{DEFAULT_SIGNATURES, NormalizerConfig, NormalizerConfigBuilder};
pub use error::{Error, LemmaError, Result};
pub use lemma::{LemmaOutcome, Lemmatized, Lemmatizer, Lexicon, Morphy, PartOfSpeech};
pub use normalize::{TextNormalizer, clean, remove_signature, remove_stopwords};
