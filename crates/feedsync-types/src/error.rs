use thiserror::Error;

/// Errors produced by type construction and parsing.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid column letters: {0:?}")]
    InvalidColumn(String),

    #[error("invalid cell reference: {0:?}")]
    InvalidCell(String),

    #[error("invalid sheet range: {0:?}")]
    InvalidRange(String),

    #[error("unknown sync type: {0:?}")]
    UnknownSyncType(String),

    #[error("{sync_type} sync needs {expected} destination column(s), got {actual}")]
    ColumnCountMismatch {
        sync_type: String,
        expected: usize,
        actual: usize,
    },

    #[error("duplicate key in dataset: {0}")]
    DuplicateKey(String),

    #[error("row has a blank key")]
    BlankKey,
}
