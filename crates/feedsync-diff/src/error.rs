//! Error types for the diff crate.

use feedsync_types::{Field, TypeError};

/// Errors that can occur while planning destination writes.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DiffError {
    /// A difference record lost its destination position. This means the
    /// index bookkeeping upstream is corrupt; nothing may be written.
    #[error("difference record for {sku} ({field}) carries no destination index")]
    MissingIndex { sku: String, field: Field },

    /// The strategy has no destination column for a compared field.
    #[error("no destination column mapped for field {0}")]
    UnmappedField(Field),

    #[error("type error: {0}")]
    Type(#[from] TypeError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
