use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use feedsync_diff::CellWrite;
use feedsync_types::SheetRange;
use tracing::debug;

use crate::error::SheetResult;
use crate::store::{Grid, SheetStore, UpdateSummary, ValueRange};

/// Sheet persisted as a JSON array of rows.
///
/// Every call reads the file; updates are written to a sibling temporary
/// file and renamed over the original.
pub struct JsonFileSheet {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileSheet {
    /// Open an existing sheet file.
    pub fn open(path: impl Into<PathBuf>) -> SheetResult<Self> {
        let sheet = Self::at(path.into());
        sheet.load()?;
        Ok(sheet)
    }

    /// Create (or truncate) a sheet file holding `grid`.
    pub fn create(path: impl Into<PathBuf>, grid: &Grid) -> SheetResult<Self> {
        let sheet = Self::at(path.into());
        sheet.store(grid)?;
        Ok(sheet)
    }

    fn at(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole grid from disk.
    pub fn load(&self) -> SheetResult<Grid> {
        let bytes = fs::read(&self.path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    fn store(&self, grid: &Grid) -> SheetResult<()> {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".tmp");
        let staging = PathBuf::from(staging);

        fs::write(&staging, serde_json::to_vec_pretty(grid)?)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

impl SheetStore for JsonFileSheet {
    fn batch_get(&self, ranges: &[SheetRange]) -> SheetResult<Vec<ValueRange>> {
        let grid = self.load()?;
        Ok(ranges.iter().map(|range| grid.read(range)).collect())
    }

    fn batch_update(&self, writes: &[CellWrite]) -> SheetResult<UpdateSummary> {
        let _guard = self.write_lock.lock().expect("lock poisoned");
        let mut grid = self.load()?;
        let summary = grid.apply(writes)?;
        self.store(&grid)?;
        debug!(
            path = %self.path.display(),
            cells = summary.updated_cells,
            rows = summary.updated_rows,
            "updated sheet file"
        );
        Ok(summary)
    }
}
