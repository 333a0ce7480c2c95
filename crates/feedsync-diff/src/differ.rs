//! Per-sync-type change detection on an aligned view.
//!
//! Each compared field of each row is normalized on both sides and then
//! compared with the strategy's [`Comparison`] policy:
//!
//! - `Quantity`: integer inequality. A missing or unparseable source counts
//!   as zero; an unparseable destination excludes the row.
//! - `Exact`: string inequality after blank-fill.
//! - `Similarity`: character similarity ratio strictly below the threshold.
//!
//! A row is a difference if any of its fields changed. For two-field sync
//! types this is the outer union of the per-field difference sets; unchanged
//! sibling values are carried along in the record.

use feedsync_types::{Comparison, Dataset, Field, Row, Sku, SyncStrategy, SyncType};
use serde::Serialize;
use tracing::{debug, warn};

use crate::normalize::{normalize, Normalized, ParseFailure, Side};
use crate::similarity::similarity_ratio;

/// One row that needs at least one destination cell updated.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffRecord {
    /// The aligned row with normalized `FB_<field>` / `P_<field>` values.
    pub row: Row,
    /// Fields whose values differ, in strategy order.
    pub changed: Vec<Field>,
}

impl DiffRecord {
    pub fn sku(&self) -> &Sku {
        self.row.sku()
    }

    pub fn index(&self) -> Option<usize> {
        self.row.index()
    }

    pub fn is_changed(&self, field: Field) -> bool {
        self.changed.contains(&field)
    }
}

/// A field that could not be compared.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SkippedField {
    pub sku: Sku,
    pub field: Field,
    pub reason: ParseFailure,
}

/// All differences found for one sync type.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DiffSet {
    pub sync_type: SyncType,
    pub records: Vec<DiffRecord>,
    pub skipped: Vec<SkippedField>,
}

impl DiffSet {
    pub fn new(sync_type: SyncType) -> Self {
        Self {
            sync_type,
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Returns `true` if nothing needs to be written.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of differing rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of rows in which `field` changed.
    pub fn changed_count(&self, field: Field) -> usize {
        self.records.iter().filter(|r| r.is_changed(field)).count()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, DiffRecord> {
        self.records.iter()
    }

    pub fn get(&self, sku: &Sku) -> Option<&DiffRecord> {
        self.records.iter().find(|r| r.sku() == sku)
    }
}

enum FieldOutcome {
    Same,
    Changed,
    Skipped(ParseFailure),
}

/// Detect the rows of `aligned` whose destination and source disagree.
pub fn detect_differences(aligned: &Dataset, strategy: &SyncStrategy) -> DiffSet {
    let mut diff = DiffSet::new(strategy.sync_type);

    for row in aligned {
        let mut record = row.clone();
        let mut changed = Vec::new();
        let mut skipped = false;

        for &field in &strategy.fields {
            let dest = normalize(field, Side::Destination, row.dest(field));
            let source = normalize(field, Side::Source, row.source(field));

            match compare(&dest, &source, strategy.comparison) {
                FieldOutcome::Same => {}
                FieldOutcome::Changed => changed.push(field),
                FieldOutcome::Skipped(reason) => {
                    warn!(sku = %row.sku(), %field, %reason, "value excluded from comparison");
                    diff.skipped.push(SkippedField {
                        sku: row.sku().clone(),
                        field,
                        reason,
                    });
                    skipped = true;
                    continue;
                }
            }

            if let Some(value) = dest.to_cell_value() {
                record.set_dest(field, value);
            }
            if let Some(value) = source.to_cell_value() {
                record.set_source(field, value);
            }
        }

        // Quantity rows with an unreadable destination are dropped entirely.
        if skipped && strategy.comparison == Comparison::Quantity {
            continue;
        }
        if !changed.is_empty() {
            diff.records.push(DiffRecord {
                row: record,
                changed,
            });
        }
    }

    debug!(
        sync_type = %strategy.sync_type,
        rows = aligned.len(),
        differences = diff.len(),
        skipped = diff.skipped.len(),
        "detected differences"
    );
    diff
}

fn compare(dest: &Normalized, source: &Normalized, comparison: Comparison) -> FieldOutcome {
    match (dest, source) {
        (Normalized::Invalid(reason), _) | (_, Normalized::Invalid(reason)) => {
            FieldOutcome::Skipped(reason.clone())
        }
        (Normalized::Quantity(a), Normalized::Quantity(b)) => outcome(a != b),
        (Normalized::Text(a), Normalized::Text(b)) => match comparison {
            Comparison::Similarity { threshold } => outcome(similarity_ratio(a, b) < threshold),
            Comparison::Exact | Comparison::Quantity => outcome(a != b),
        },
        // Mixed kinds only arise from a misconfigured strategy.
        (a, b) => outcome(a.to_cell_value() != b.to_cell_value()),
    }
}

fn outcome(changed: bool) -> FieldOutcome {
    if changed {
        FieldOutcome::Changed
    } else {
        FieldOutcome::Same
    }
}
