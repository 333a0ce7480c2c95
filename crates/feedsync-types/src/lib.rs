//! Foundation types for feedsync.
//!
//! Every other feedsync crate depends on `feedsync-types`. It defines the
//! tabular model both sides of a sync are expressed in, the per-type
//! strategy record, and sheet coordinates.
//!
//! # Key Types
//!
//! - [`Sku`] / [`Row`] -- Keyed row of named string values
//! - [`Dataset`] -- Ordered, uniquely keyed rows
//! - [`SyncType`] / [`SyncStrategy`] -- What a run compares and where it writes
//! - [`Column`] / [`CellRef`] / [`SheetRange`] -- A1 notation

pub mod cell;
pub mod dataset;
pub mod error;
pub mod row;
pub mod sync;

pub use cell::{CellRef, Column, SheetRange, DEFAULT_RANGE};
pub use dataset::{Dataset, KeyReport};
pub use error::TypeError;
pub use row::{Row, Sku, DEST_PREFIX, SOURCE_PREFIX};
pub use sync::{
    Comparison, Field, SyncStrategy, SyncType, ATTRIBUTES_EXPORT_COLUMN,
    DESCRIPTION_EXPORT_COLUMN, PRICE_EXPORT_COLUMN, SKU_EXPORT_COLUMN, STOCK_EXPORT_PREFIX,
    TEXT_SIMILARITY_THRESHOLD, TITLE_EXPORT_COLUMN,
};
