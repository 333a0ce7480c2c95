use feedsync_types::{SyncStrategy, SyncType};

use crate::journal::ChangeJournal;

/// Everything a single run needs, passed explicitly to [`run_sync`].
///
/// [`run_sync`]: crate::pipeline::run_sync
#[derive(Clone, Debug)]
pub struct SyncContext {
    pub strategy: SyncStrategy,
    /// Last sheet row to read. `None` falls back to the default range.
    pub sheet_rows: Option<usize>,
    pub journal: Option<ChangeJournal>,
    /// Plan writes without applying them.
    pub dry_run: bool,
}

impl SyncContext {
    pub fn new(strategy: SyncStrategy) -> Self {
        Self {
            strategy,
            sheet_rows: None,
            journal: None,
            dry_run: false,
        }
    }

    pub fn with_sheet_rows(mut self, rows: usize) -> Self {
        self.sheet_rows = Some(rows);
        self
    }

    pub fn with_journal(mut self, journal: ChangeJournal) -> Self {
        self.journal = Some(journal);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn sync_type(&self) -> SyncType {
        self.strategy.sync_type
    }
}
