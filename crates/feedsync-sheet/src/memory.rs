use std::sync::RwLock;

use feedsync_diff::CellWrite;
use feedsync_types::{CellRef, SheetRange};
use tracing::debug;

use crate::error::SheetResult;
use crate::store::{Grid, SheetStore, UpdateSummary, ValueRange};

/// In-memory sheet.
///
/// Intended for tests, dry runs and embedding. The grid is held behind a
/// `RwLock` for safe concurrent access.
pub struct InMemorySheet {
    grid: RwLock<Grid>,
}

impl InMemorySheet {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self::with_grid(Grid::new())
    }

    pub fn with_grid(grid: Grid) -> Self {
        Self {
            grid: RwLock::new(grid),
        }
    }

    /// Create a sheet from row-major values, header row first.
    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self::with_grid(Grid::from_rows(rows))
    }

    /// Current value of a cell; missing cells read as `None`.
    pub fn cell(&self, cell: &CellRef) -> Option<String> {
        let (row, column) = cell.position();
        self.grid
            .read()
            .expect("lock poisoned")
            .get(row, column)
            .map(str::to_string)
    }

    /// A copy of the whole grid.
    pub fn snapshot(&self) -> Grid {
        self.grid.read().expect("lock poisoned").clone()
    }
}

impl Default for InMemorySheet {
    fn default() -> Self {
        Self::new()
    }
}

impl SheetStore for InMemorySheet {
    fn batch_get(&self, ranges: &[SheetRange]) -> SheetResult<Vec<ValueRange>> {
        let grid = self.grid.read().expect("lock poisoned");
        Ok(ranges.iter().map(|range| grid.read(range)).collect())
    }

    fn batch_update(&self, writes: &[CellWrite]) -> SheetResult<UpdateSummary> {
        let mut grid = self.grid.write().expect("lock poisoned");
        let summary = grid.apply(writes)?;
        debug!(
            cells = summary.updated_cells,
            rows = summary.updated_rows,
            "updated in-memory sheet"
        );
        Ok(summary)
    }
}
