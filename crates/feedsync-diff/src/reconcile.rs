//! Key-level reconciliation: which products are new, which were removed.
//!
//! These are explicit steps separate from change detection. Both follow the
//! same empty-input rules as [`align`](crate::align::align): an empty
//! destination yields an empty result, an empty source leaves the
//! destination unchanged.

use std::collections::HashSet;

use feedsync_types::{Dataset, Row, Sku, DEST_PREFIX, SOURCE_PREFIX};
use serde::Serialize;
use tracing::debug;

/// Keys sorted into new, removed and common.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct KeyClassification {
    /// In the source but not in the destination (source order).
    pub new: Vec<Sku>,
    /// In the destination but not in the source (destination order).
    pub removed: Vec<Sku>,
    /// In both (destination order).
    pub common: Vec<Sku>,
}

/// Sort the keys of both datasets into new, removed and common.
pub fn classify_keys(destination: &Dataset, source: &Dataset) -> KeyClassification {
    let dest_keys: HashSet<&Sku> = destination.keys().collect();
    let source_keys: HashSet<&Sku> = source.keys().collect();

    let mut classification = KeyClassification::default();
    for sku in destination.keys() {
        if source_keys.contains(sku) {
            classification.common.push(sku.clone());
        } else {
            classification.removed.push(sku.clone());
        }
    }
    classification.new = source
        .keys()
        .filter(|sku| !dest_keys.contains(sku))
        .cloned()
        .collect();

    debug!(
        new = classification.new.len(),
        removed = classification.removed.len(),
        common = classification.common.len(),
        "classified keys"
    );
    classification
}

/// Append the source-only rows to the destination.
///
/// New rows are reshaped into destination form (`P_<field>` becomes
/// `FB_<field>`), carry no destination index, and every row is filled with
/// empty strings for the columns it lacks.
pub fn add_new_items(destination: &Dataset, source: &Dataset) -> Dataset {
    if destination.is_empty() {
        return Dataset::new();
    }
    if source.is_empty() {
        return destination.clone();
    }

    let new_rows: Vec<Row> = source
        .iter()
        .filter(|row| !destination.contains(row.sku()))
        .map(to_destination_shape)
        .collect();
    if new_rows.is_empty() {
        return destination.clone();
    }

    let mut merged = destination.clone();
    for row in new_rows {
        // Keys are unique in `source` and absent from `destination`.
        if let Err(err) = merged.push(row) {
            debug!(%err, "skipping new row");
        }
    }
    merged.fill_missing("");
    merged
}

/// Drop destination rows whose key no longer exists in the source.
pub fn delete_removed_items(destination: &Dataset, source: &Dataset) -> Dataset {
    if destination.is_empty() {
        return Dataset::new();
    }
    if source.is_empty() {
        return destination.clone();
    }

    let source_keys: HashSet<&Sku> = source.keys().collect();
    let mut kept = destination.clone();
    kept.retain(|row| source_keys.contains(row.sku()));
    kept
}

fn to_destination_shape(row: &Row) -> Row {
    let mut reshaped = Row::new(row.sku().clone());
    for (name, value) in row.values() {
        match name.strip_prefix(SOURCE_PREFIX) {
            Some(field) => reshaped.set(format!("{DEST_PREFIX}{field}"), value),
            None => reshaped.set(name, value),
        }
    }
    reshaped
}
