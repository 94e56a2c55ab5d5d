//! Error types for the quiz core.
//!
//! Library code returns these typed errors so callers can tell a missing or
//! corrupt record apart from a bad selection without string matching. The
//! CLI wraps them in `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::Category;
use crate::store::RecordKey;

/// Failures reading or writing persisted records.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing storage could not be read or written.
    #[error("failed to access record '{key}': {source}")]
    Io {
        key: RecordKey,
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error("failed to serialize record '{key}': {source}")]
    Serialize {
        key: RecordKey,
        #[source]
        source: serde_json::Error,
    },

    /// A stored record exists but does not parse.
    #[error("record '{key}' is corrupt: {source}")]
    Corrupt {
        key: RecordKey,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Returns `true` if the record exists but could not be decoded.
    pub fn is_corrupt(&self) -> bool {
        matches!(self, StoreError::Corrupt { .. })
    }
}

/// Failures loading a question bank.
#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to read question bank {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse question bank: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("unknown category '{name}' in {context}")]
    UnknownCategory { name: String, context: String },

    #[error("no profile defined for category '{0}'")]
    MissingProfile(Category),

    #[error("question bank has no questions")]
    Empty,

    #[error("question {0} has no options")]
    NoOptions(u32),

    #[error("question id {0} is used more than once")]
    DuplicateQuestionId(u32),

    #[error("question {question_id} option {letter} has a non-finite weight for '{category}'")]
    NonFiniteWeight {
        question_id: u32,
        letter: String,
        category: Category,
    },
}

/// Failures driving a quiz forward.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The selected option does not exist on the current question.
    #[error("question {question_id} has {count} options, cannot select option {index}")]
    OptionOutOfRange {
        question_id: u32,
        index: usize,
        count: usize,
    },

    /// `next` was requested before anything was selected.
    #[error("question {0} needs at least one selection before moving on")]
    NoSelection(u32),

    /// Every question has already been answered.
    #[error("the quiz is already finished")]
    Finished,
}
