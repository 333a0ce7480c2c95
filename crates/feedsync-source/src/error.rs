use feedsync_types::SyncType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("export is missing required column {column:?} for {sync_type} sync")]
    MissingColumn { column: String, sync_type: SyncType },

    #[error("HTTP error fetching export: {0}")]
    Http(#[from] reqwest::Error),

    #[error("malformed export: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SourceError {
    /// Returns `true` if the export was readable but lacked a required column.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, Self::MissingColumn { .. })
    }
}

pub type SourceResult<T> = Result<T, SourceError>;
