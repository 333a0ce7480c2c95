use feedsync_types::{Column, Field, TypeError};

/// Errors from destination sheet operations.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// None of the read ranges starts with the `id` header.
    #[error("no 'id' column found within the sheet")]
    MissingKeyColumn,

    /// A destination column carries an unexpected header.
    #[error("column {column} has header {found:?}, expected \"{expected}\"")]
    HeaderMismatch {
        column: Column,
        expected: Field,
        found: String,
    },

    /// The store accepted a batch but reported no updated rows.
    #[error("sheet reported no updated rows for the {field} batch")]
    WriteRejected { field: Field },

    #[error(transparent)]
    Type(#[from] TypeError),

    /// Serialization failure of a file-backed sheet.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for sheet operations.
pub type SheetResult<T> = Result<T, SheetError>;
