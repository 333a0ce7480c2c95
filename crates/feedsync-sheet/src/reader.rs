//! Destination reader: turns sheet ranges into the destination dataset.
//!
//! The key column is `A`, headed `id`. A data row is valid when its id cell
//! is non-empty; its position inside the range (header at 0) becomes the
//! row's `FB_index`. Every mapped column must be headed by its field name.

use feedsync_types::{Column, Dataset, Row, SheetRange, SyncStrategy, DEFAULT_RANGE};
use tracing::{debug, warn};

use crate::error::{SheetError, SheetResult};
use crate::store::{SheetStore, ValueRange};

/// Header of the key column.
pub const KEY_HEADER: &str = "id";

/// Row bound used when none is configured; the height of [`DEFAULT_RANGE`].
pub const DEFAULT_ROW_BOUND: usize = 20;

/// The column holding destination keys.
pub fn key_column() -> Column {
    Column::from_index(0)
}

/// Range covering `from..=to` down to `max_row`.
///
/// Without a row bound the range falls back to [`DEFAULT_ROW_BOUND`] rows
/// and a warning is logged.
pub fn sheet_range(from: &Column, to: Option<&Column>, max_row: Option<usize>) -> SheetRange {
    let to = to.unwrap_or(from);
    match max_row {
        Some(max_row) => SheetRange::span(from, to, max_row),
        None => {
            warn!(
                default = DEFAULT_RANGE,
                "no row bound configured, reading {DEFAULT_ROW_BOUND} rows"
            );
            SheetRange::span(from, to, DEFAULT_ROW_BOUND)
        }
    }
}

/// The ranges read for `strategy`: the key column, then one per field.
pub fn destination_ranges(strategy: &SyncStrategy, max_row: Option<usize>) -> Vec<SheetRange> {
    let rows = Some(max_row.unwrap_or_else(|| sheet_range(&key_column(), None, None).end.row));
    std::iter::once(key_column())
        .chain(strategy.columns.iter().cloned())
        .map(|column| sheet_range(&column, None, rows))
        .collect()
}

/// Positions of the valid rows in the key column.
fn valid_rows(key: &ValueRange) -> Vec<usize> {
    (1..key.values.len())
        .filter(|&index| {
            let valid = key.first_cell(index).is_some_and(|id| !id.trim().is_empty());
            if !valid {
                debug!(index, "skipping destination row without id");
            }
            valid
        })
        .collect()
}

/// Read the destination dataset for `strategy`.
///
/// Returns an empty dataset if the key column holds no valid row. Fails
/// with [`SheetError::MissingKeyColumn`] if the key column is not headed
/// `id`, and with [`SheetError::HeaderMismatch`] if a mapped column is not
/// headed by its field name.
pub fn read_destination(
    store: &dyn SheetStore,
    strategy: &SyncStrategy,
    max_row: Option<usize>,
) -> SheetResult<Dataset> {
    let ranges = store.batch_get(&destination_ranges(strategy, max_row))?;
    let (key, columns) = ranges.split_first().ok_or(SheetError::MissingKeyColumn)?;
    if key.header() != Some(KEY_HEADER) {
        return Err(SheetError::MissingKeyColumn);
    }

    for ((field, column), range) in strategy.field_columns().zip(columns) {
        let found = range.header().unwrap_or("");
        if found != field.name() {
            return Err(SheetError::HeaderMismatch {
                column: column.clone(),
                expected: field,
                found: found.to_string(),
            });
        }
    }

    let indices = valid_rows(key);
    if indices.is_empty() {
        warn!(sync_type = %strategy.sync_type, "no valid rows found in the sheet");
        return Ok(Dataset::new());
    }

    let rows = indices.into_iter().map(|index| {
        let mut row = Row::new(key.first_cell(index).unwrap_or("").trim()).with_index(index);
        for (field, range) in strategy.fields.iter().zip(columns) {
            row.set_dest(*field, range.first_cell(index).unwrap_or(""));
        }
        row
    });

    let (dataset, report) = Dataset::build(rows);
    if !report.is_clean() {
        warn!(
            duplicates = report.duplicates.len(),
            "dropped destination rows with repeated ids"
        );
    }
    debug!(sync_type = %strategy.sync_type, rows = dataset.len(), "read destination");
    Ok(dataset)
}
