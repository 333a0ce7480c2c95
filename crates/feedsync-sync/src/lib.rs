//! Sync pipeline for feedsync.
//!
//! [`run_sync`] performs one reconciliation run for one sync type: it reads
//! the destination sheet, loads the source export, detects differences,
//! plans cell writes and, unless in dry-run mode, applies them batch by
//! batch while recording each batch in the [`ChangeJournal`].
//!
//! # Key Types
//!
//! - [`SyncContext`] -- explicit per-run configuration
//! - [`SyncReport`] / [`SyncOutcome`] -- what a run found and did
//! - [`ChangeJournal`] -- daily log of applied changes

pub mod context;
pub mod error;
pub mod journal;
pub mod pipeline;

pub use context::SyncContext;
pub use error::{SyncError, SyncResult};
pub use journal::{ChangeJournal, JOURNAL_DATE_FORMAT};
pub use pipeline::{run_sync, SyncOutcome, SyncReport};
