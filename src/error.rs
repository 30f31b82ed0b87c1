use std::path::PathBuf;

use thiserror::Error;

/// Reasons a quiz cannot be loaded or mounted.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz has no questions")]
    NoQuestions,

    #[error("quiz is missing an id")]
    MissingId,

    #[error("quiz is missing a title")]
    MissingTitle,

    #[error("question {question} has {found} options, expected {expected}")]
    OptionCount {
        question: usize,
        found: usize,
        expected: usize,
    },

    #[error("question {question} marks option {index} as correct, but only 0..{options} exist")]
    AnswerOutOfRange {
        question: usize,
        index: usize,
        options: usize,
    },

    #[error("time limit must be a positive number of minutes")]
    ZeroTimeLimit,

    #[error("no bundled quiz named '{0}'")]
    UnknownBundled(String),

    #[error("malformed quiz json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A ledger write that names a question or option the quiz does not have.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AnswerError {
    #[error("question {index} is out of range (quiz has {len})")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("option {index} is out of range (question has {len})")]
    OptionOutOfRange { index: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("stored attempt has an unreadable timestamp: {0}")]
    Timestamp(String),

    #[error("stored attempt has an unknown ending: {0}")]
    Ending(String),
}
