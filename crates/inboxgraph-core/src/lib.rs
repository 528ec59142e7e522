//! # inboxgraph-core
//!
//! Social and organizational structure of one user's archived mailbox.
//!
//! This crate provides:
//! - Message table loading and body normalization
//! - **User identification** - the most frequent sent-folder sender
//! - **Correspondent index** - who the user writes to, copies and hears from
//! - **Importance scoring** - per correspondent and per message
//! - **Folder analysis** - custom and big folders, frequent filers, top folders
//! - **Time buckets** - three consecutive day-offset bands
//! - **Document vectors** - TF-IDF weighted embeddings and paragraph vectors
//!   from pluggable vector-space models
//!
//! ## Quick Start
//!
//! ```ignore
//! use inboxgraph_core::{AnalysisConfig, EmailNetwork, MessageTable};
//!
//! let table = MessageTable::from_json_str(&std::fs::read_to_string("mailbox.json")?)?;
//! let mut network = EmailNetwork::new(table, AnalysisConfig::default())?;
//!
//! println!("user: {}", network.user());
//! println!("top correspondents: {:?}", network.top_correspondents());
//! println!("top folders: {:?}", network.make_three_important_folders()?);
//! println!("sound: {}", network.make_three_time_periods().is_sound());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod config;
pub mod correspondents;
mod error;
pub mod folders;
pub mod importance;
mod network;
pub mod table;
pub mod temporal;
pub mod vectors;

pub use config::{AnalysisConfig, AnalysisConfigBuilder, BUCKET_COUNT};
pub use correspondents::{CorrespondentIndex, CorrespondentMap, identify_user, top_correspondents};
pub use error::{Error, Result};
pub use folders::{FolderStats, is_frequent_filer, three_important_folders};
pub use importance::{ImportanceField, ImportanceScores, ScoreOrigin, read_reply_fraction};
pub use network::EmailNetwork;
pub use table::{FolderKind, Message, MessageTable};
pub use temporal::{TimeBuckets, is_temporally_sound};
pub use vectors::{
    DenseMatrix, DocumentVectors, ParagraphEmbedder, SparseMatrix, TfidfOutput, TfidfTransform,
    WordEmbeddings,
};
