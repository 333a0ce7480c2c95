use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("source error: {0}")]
    Source(#[from] feedsync_source::SourceError),

    #[error("sheet error: {0}")]
    Sheet(#[from] feedsync_sheet::SheetError),

    #[error("diff error: {0}")]
    Diff(#[from] feedsync_diff::DiffError),

    #[error("journal error: {0}")]
    Journal(#[from] walkdir::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SyncResult<T> = Result<T, SyncError>;
