//! Reconciliation engine for feedsync.
//!
//! Aligns a destination dataset (the sheet) with a source dataset (the
//! backend export) by key, detects the rows whose values disagree under the
//! sync type's normalization and comparison rules, and turns those rows into
//! a minimal set of point writes.
//!
//! # Key Types
//!
//! - [`align`] -- Left join by key, destination order and indices preserved
//! - [`DiffSet`] / [`DiffRecord`] -- Rows with at least one changed field
//! - [`WritePlan`] / [`CellWrite`] -- Destination cell updates
//! - [`KeyClassification`] -- New, removed and common keys

pub mod align;
pub mod differ;
pub mod error;
pub mod normalize;
pub mod planner;
pub mod reconcile;
pub mod similarity;

pub use align::align;
pub use differ::{detect_differences, DiffRecord, DiffSet, SkippedField};
pub use error::{DiffError, DiffResult};
pub use normalize::{
    extract_attribute, format_price, normalize, parse_quantity, scrub_placeholder,
    split_attributes, Attributes, Normalized, ParseFailure, Side,
};
pub use planner::{cell_for, plan_writes, CellWrite, WriteBatch, WritePlan, HEADER_OFFSET};
pub use reconcile::{add_new_items, classify_keys, delete_removed_items, KeyClassification};
pub use similarity::similarity_ratio;
