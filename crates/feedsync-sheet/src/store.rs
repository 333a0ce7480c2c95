use std::collections::BTreeSet;

use feedsync_diff::CellWrite;
use feedsync_types::{SheetRange, TypeError};
use serde::{Deserialize, Serialize};

use crate::error::SheetResult;

/// The values read from one range, row-major.
///
/// Trailing empty cells of a row and trailing empty rows are trimmed, so a
/// column whose last value sits on row 120 of a 500-row range yields 120
/// rows.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub range: SheetRange,
    pub values: Vec<Vec<String>>,
}

impl ValueRange {
    /// The first cell of the given zero-based row, if present.
    pub fn first_cell(&self, row: usize) -> Option<&str> {
        self.values
            .get(row)
            .and_then(|cells| cells.first())
            .map(String::as_str)
    }

    /// The header cell of the range.
    pub fn header(&self) -> Option<&str> {
        self.first_cell(0)
    }
}

/// Counts reported back by a batch update.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateSummary {
    pub updated_cells: usize,
    pub updated_rows: usize,
}

impl UpdateSummary {
    /// Add the counts of another update to this one.
    pub fn merge(&mut self, other: UpdateSummary) {
        self.updated_cells += other.updated_cells;
        self.updated_rows += other.updated_rows;
    }
}

/// A spreadsheet that can be read by ranges and updated by cells.
///
/// Implementations must:
/// - return one [`ValueRange`] per requested range, in request order,
/// - trim trailing empty cells and rows from read values,
/// - apply every write of a batch or none of them.
pub trait SheetStore: Send + Sync {
    /// Read several rectangular ranges at once.
    fn batch_get(&self, ranges: &[SheetRange]) -> SheetResult<Vec<ValueRange>>;

    /// Write raw values into individual cells.
    fn batch_update(&self, writes: &[CellWrite]) -> SheetResult<UpdateSummary>;
}

/// A dense, growable grid of cell values.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<String>>,
}

impl Grid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator,
        C::Item: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        }
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    /// Value at a zero-based position; missing cells read as `None`.
    pub fn get(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .map(String::as_str)
    }

    /// Store `value` at a zero-based position, growing the grid as needed.
    pub fn set(&mut self, row: usize, column: usize, value: impl Into<String>) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, Vec::new);
        }
        let cells = &mut self.rows[row];
        if cells.len() <= column {
            cells.resize(column + 1, String::new());
        }
        cells[column] = value.into();
    }

    /// Read `range` with trailing empty cells and rows trimmed.
    pub fn read(&self, range: &SheetRange) -> ValueRange {
        let first_column = range.start.column.index();
        let mut values: Vec<Vec<String>> = (range.start.row..=range.end.row)
            .map(|row| {
                let mut cells: Vec<String> = (0..range.width())
                    .map(|offset| {
                        self.get(row - 1, first_column + offset)
                            .unwrap_or("")
                            .to_string()
                    })
                    .collect();
                while cells.last().is_some_and(|cell| cell.is_empty()) {
                    cells.pop();
                }
                cells
            })
            .collect();
        while values.last().is_some_and(|row| row.is_empty()) {
            values.pop();
        }
        ValueRange {
            range: range.clone(),
            values,
        }
    }

    /// Apply all writes, rejecting the batch if any target is invalid.
    pub fn apply(&mut self, writes: &[CellWrite]) -> Result<UpdateSummary, TypeError> {
        if let Some(bad) = writes.iter().find(|write| write.cell.row == 0) {
            return Err(TypeError::InvalidCell(bad.cell.to_string()));
        }

        let mut rows = BTreeSet::new();
        for write in writes {
            let (row, column) = write.cell.position();
            self.set(row, column, write.value.as_str());
            rows.insert(row);
        }
        Ok(UpdateSummary {
            updated_cells: writes.len(),
            updated_rows: rows.len(),
        })
    }
}
