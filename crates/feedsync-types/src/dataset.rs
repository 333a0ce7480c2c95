//! Ordered, uniquely keyed collections of rows.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::row::{Row, Sku};

/// Rows that were rejected while building a [`Dataset`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyReport {
    /// Number of rows dropped because their key was blank.
    pub blank: usize,
    /// Keys that appeared more than once; only the first row was kept.
    pub duplicates: Vec<Sku>,
}

impl KeyReport {
    /// Returns `true` if no row was dropped.
    pub fn is_clean(&self) -> bool {
        self.blank == 0 && self.duplicates.is_empty()
    }

    /// Total number of dropped rows.
    pub fn dropped(&self) -> usize {
        self.blank + self.duplicates.len()
    }
}

/// An ordered collection of rows keyed by [`Sku`].
///
/// Invariants:
/// - No row has a blank key.
/// - Every key appears at most once.
/// - `columns` lists every value name carried by any row, in first-seen order.
/// - `positions` maps every key to its row's position in `rows`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredDataset")]
pub struct Dataset {
    columns: Vec<String>,
    rows: Vec<Row>,
    #[serde(skip)]
    positions: HashMap<Sku, usize>,
}

#[derive(Deserialize)]
struct StoredDataset {
    #[serde(default)]
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl From<StoredDataset> for Dataset {
    fn from(stored: StoredDataset) -> Self {
        let mut dataset = Self::from_rows(stored.rows);
        for column in stored.columns {
            if !dataset.columns.contains(&column) {
                dataset.columns.push(column);
            }
        }
        dataset
    }
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a dataset, dropping blank and duplicate keys.
    pub fn build(rows: impl IntoIterator<Item = Row>) -> (Self, KeyReport) {
        let mut dataset = Self::new();
        let mut report = KeyReport::default();

        for row in rows {
            if row.sku().is_blank() {
                report.blank += 1;
                continue;
            }
            if dataset.contains(row.sku()) {
                report.duplicates.push(row.sku().clone());
                continue;
            }
            dataset.insert(row);
        }

        (dataset, report)
    }

    /// Like [`Dataset::build`] but discards the report.
    pub fn from_rows(rows: impl IntoIterator<Item = Row>) -> Self {
        Self::build(rows).0
    }

    /// Append a row, rejecting blank or already present keys.
    pub fn push(&mut self, row: Row) -> Result<(), TypeError> {
        if row.sku().is_blank() {
            return Err(TypeError::BlankKey);
        }
        if self.contains(row.sku()) {
            return Err(TypeError::DuplicateKey(row.sku().to_string()));
        }
        self.insert(row);
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Value names carried by the rows, in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn get(&self, sku: &Sku) -> Option<&Row> {
        self.positions.get(sku).map(|&at| &self.rows[at])
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.positions.contains_key(sku)
    }

    /// Keys in dataset order.
    pub fn keys(&self) -> impl Iterator<Item = &Sku> {
        self.rows.iter().map(Row::sku)
    }

    /// Map from key to row, for joins.
    pub fn index_by_key(&self) -> HashMap<&Sku, &Row> {
        self.rows.iter().map(|row| (row.sku(), row)).collect()
    }

    /// Give every row a value for every column, using `fill` where missing.
    pub fn fill_missing(&mut self, fill: &str) {
        for row in &mut self.rows {
            for column in &self.columns {
                if !row.contains(column) {
                    row.set(column.clone(), fill);
                }
            }
        }
    }

    /// Keep only the rows matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Row) -> bool) {
        self.rows.retain(keep);
        self.positions = self
            .rows
            .iter()
            .enumerate()
            .map(|(at, row)| (row.sku().clone(), at))
            .collect();
    }

    fn insert(&mut self, row: Row) {
        self.track_columns(&row);
        self.positions.insert(row.sku().clone(), self.rows.len());
        self.rows.push(row);
    }

    fn track_columns(&mut self, row: &Row) {
        for name in row.names() {
            if !self.columns.iter().any(|c| c == name) {
                self.columns.push(name.to_string());
            }
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl FromIterator<Row> for Dataset {
    fn from_iter<I: IntoIterator<Item = Row>>(iter: I) -> Self {
        Self::from_rows(iter)
    }
}
