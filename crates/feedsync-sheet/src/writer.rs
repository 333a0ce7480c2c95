use feedsync_diff::{WriteBatch, WritePlan};
use tracing::{error, info};

use crate::error::{SheetError, SheetResult};
use crate::store::{SheetStore, UpdateSummary};

/// Send one field batch to the sheet.
///
/// A non-empty batch for which the store reports no updated rows fails with
/// [`SheetError::WriteRejected`].
pub fn write_batch(store: &dyn SheetStore, batch: &WriteBatch) -> SheetResult<UpdateSummary> {
    if batch.writes.is_empty() {
        return Ok(UpdateSummary::default());
    }

    let summary = store.batch_update(&batch.writes)?;
    if summary.updated_rows == 0 {
        error!(field = %batch.field, column = %batch.column, "sheet rejected the batch");
        return Err(SheetError::WriteRejected { field: batch.field });
    }

    info!(
        field = %batch.field,
        column = %batch.column,
        cells = summary.updated_cells,
        "wrote batch"
    );
    Ok(summary)
}

/// Apply every batch of `plan` in order, stopping at the first failure.
pub fn apply_plan(store: &dyn SheetStore, plan: &WritePlan) -> SheetResult<UpdateSummary> {
    let mut total = UpdateSummary::default();
    for batch in &plan.batches {
        total.merge(write_batch(store, batch)?);
    }
    Ok(total)
}
