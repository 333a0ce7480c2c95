//! Map difference records back to destination cells.
//!
//! The destination index of a row is its zero-based position inside the
//! sheet range, with the header at position 0. The sheet row number of a
//! record is therefore `index + HEADER_OFFSET`.

use feedsync_types::{CellRef, Column, Field, Sku, SyncStrategy};
use serde::Serialize;
use tracing::{debug, error};

use crate::differ::DiffSet;
use crate::error::{DiffError, DiffResult};
use crate::normalize::scrub_placeholder;

/// Offset from a destination index to its one-based sheet row.
pub const HEADER_OFFSET: usize = 1;

/// A single point update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CellWrite {
    pub cell: CellRef,
    pub value: String,
    pub field: Field,
    pub sku: Sku,
    /// The value the destination held before the write.
    pub previous: String,
}

/// All writes targeting one destination column.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WriteBatch {
    pub field: Field,
    pub column: Column,
    pub writes: Vec<CellWrite>,
}

/// Ordered set of point writes, grouped per field in column-mapping order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WritePlan {
    pub batches: Vec<WriteBatch>,
}

impl WritePlan {
    /// Returns `true` if there is nothing to write.
    pub fn is_empty(&self) -> bool {
        self.batches.iter().all(|b| b.writes.is_empty())
    }

    /// Total number of point writes.
    pub fn len(&self) -> usize {
        self.batches.iter().map(|b| b.writes.len()).sum()
    }

    /// All writes in plan order.
    pub fn writes(&self) -> impl Iterator<Item = &CellWrite> {
        self.batches.iter().flat_map(|b| b.writes.iter())
    }

    pub fn batch(&self, field: Field) -> Option<&WriteBatch> {
        self.batches.iter().find(|b| b.field == field)
    }
}

/// The sheet cell of destination index `index` in `column`.
pub fn cell_for(column: &Column, index: usize) -> CellRef {
    column.cell(index + HEADER_OFFSET)
}

/// Build the write plan for `diff`.
///
/// Only changed fields are written. A record without a destination index
/// aborts planning with [`DiffError::MissingIndex`].
pub fn plan_writes(diff: &DiffSet, strategy: &SyncStrategy) -> DiffResult<WritePlan> {
    let mut plan = WritePlan::default();

    for &field in &strategy.fields {
        let column = strategy
            .column_for(field)
            .ok_or(DiffError::UnmappedField(field))?;

        let mut writes = Vec::new();
        for record in diff.iter().filter(|r| r.is_changed(field)) {
            let index = record.index().ok_or_else(|| {
                error!(sku = %record.sku(), %field, "difference record has no destination index");
                DiffError::MissingIndex {
                    sku: record.sku().to_string(),
                    field,
                }
            })?;

            writes.push(CellWrite {
                cell: cell_for(column, index),
                value: scrub_placeholder(record.row.source(field).unwrap_or("")).to_string(),
                field,
                sku: record.sku().clone(),
                previous: record.row.dest(field).unwrap_or("").to_string(),
            });
        }

        if !writes.is_empty() {
            plan.batches.push(WriteBatch {
                field,
                column: column.clone(),
                writes,
            });
        }
    }

    debug!(
        sync_type = %strategy.sync_type,
        writes = plan.len(),
        batches = plan.batches.len(),
        "planned destination writes"
    );
    Ok(plan)
}
