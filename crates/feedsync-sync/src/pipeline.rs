//! One reconciliation run for one sync type.

use feedsync_diff::{align, classify_keys, detect_differences, plan_writes, SkippedField, WritePlan};
use feedsync_sheet::{read_destination, write_batch, SheetStore};
use feedsync_source::{load_source, SourceProvider};
use feedsync_types::SyncType;
use serde::Serialize;
use tracing::{error, info, warn};

use crate::context::SyncContext;
use crate::error::SyncResult;

/// How a run ended.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SyncOutcome {
    /// Destination and source already agree.
    NoChanges,
    /// Dry run: writes were planned but not applied.
    Planned,
    /// All planned writes were applied.
    Written,
    /// The source could not be used for this sync type.
    Aborted { reason: String },
}

/// Summary of a run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SyncReport {
    pub sync_type: SyncType,
    pub destination_rows: usize,
    pub source_rows: usize,
    /// Source keys missing from the destination.
    pub new_items: usize,
    /// Destination keys missing from the source.
    pub removed_items: usize,
    pub differences: usize,
    pub skipped: Vec<SkippedField>,
    pub plan: WritePlan,
    pub updated_cells: usize,
    pub outcome: SyncOutcome,
}

impl SyncReport {
    fn new(sync_type: SyncType) -> Self {
        Self {
            sync_type,
            destination_rows: 0,
            source_rows: 0,
            new_items: 0,
            removed_items: 0,
            differences: 0,
            skipped: Vec::new(),
            plan: WritePlan::default(),
            updated_cells: 0,
            outcome: SyncOutcome::NoChanges,
        }
    }
}

/// Reconcile `sheet` with the export from `provider` for the context's sync
/// type.
///
/// A source lacking a required column ends the run with
/// [`SyncOutcome::Aborted`]; other failures are returned as errors. An empty
/// source or destination ends the run with [`SyncOutcome::NoChanges`] before
/// anything is planned. Batches already written before a failing batch stay
/// written. Journal failures are logged and do not stop the run.
pub fn run_sync(
    ctx: &SyncContext,
    sheet: &dyn SheetStore,
    provider: &dyn SourceProvider,
) -> SyncResult<SyncReport> {
    let strategy = &ctx.strategy;
    let mut report = SyncReport::new(strategy.sync_type);

    if let Some(journal) = &ctx.journal {
        if let Err(err) = journal.clean_stale() {
            warn!(dir = %journal.dir().display(), %err, "could not clean journal folder");
        }
    }

    let destination = read_destination(sheet, strategy, ctx.sheet_rows)?;
    report.destination_rows = destination.len();
    if destination.is_empty() {
        warn!(sync_type = %strategy.sync_type, "empty destination data");
    }

    let source = match load_source(provider, strategy) {
        Ok(dataset) => dataset,
        Err(err) if err.is_schema_error() => {
            error!(sync_type = %strategy.sync_type, %err, "aborting sync");
            report.outcome = SyncOutcome::Aborted {
                reason: err.to_string(),
            };
            return Ok(report);
        }
        Err(err) => return Err(err.into()),
    };
    report.source_rows = source.len();
    if source.is_empty() {
        warn!(location = %provider.location(), "empty source export, nothing to sync");
        return Ok(report);
    }
    if destination.is_empty() {
        return Ok(report);
    }

    let keys = classify_keys(&destination, &source);
    report.new_items = keys.new.len();
    report.removed_items = keys.removed.len();
    if !keys.new.is_empty() || !keys.removed.is_empty() {
        info!(new = keys.new.len(), removed = keys.removed.len(), "key sets differ");
    }

    let aligned = align(&destination, &source);
    let diff = detect_differences(&aligned, strategy);
    report.differences = diff.len();
    report.skipped = diff.skipped.clone();
    report.plan = plan_writes(&diff, strategy)?;

    if report.plan.is_empty() {
        info!(sync_type = %strategy.sync_type, "nothing to update");
        return Ok(report);
    }

    if ctx.dry_run {
        info!(writes = report.plan.len(), "dry run, leaving the sheet untouched");
        report.outcome = SyncOutcome::Planned;
        return Ok(report);
    }

    for batch in &report.plan.batches {
        let summary = write_batch(sheet, batch)?;
        report.updated_cells += summary.updated_cells;
        if let Some(journal) = &ctx.journal {
            if let Err(err) = journal.record(batch) {
                warn!(
                    dir = %journal.dir().display(),
                    field = %batch.field,
                    %err,
                    "could not record changes"
                );
            }
        }
    }
    report.outcome = SyncOutcome::Written;
    info!(
        sync_type = %strategy.sync_type,
        cells = report.updated_cells,
        "sync finished"
    );
    Ok(report)
}
