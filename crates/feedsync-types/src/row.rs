//! Keyed rows, the unit every dataset is built from.
//!
//! A [`Row`] carries its [`Sku`], an optional destination position and a
//! flat map of named string values. Destination values live under
//! `FB_<field>`, source values under `P_<field>`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::sync::Field;

/// Prefix for values read from the destination sheet.
pub const DEST_PREFIX: &str = "FB_";

/// Prefix for values taken from the source export.
pub const SOURCE_PREFIX: &str = "P_";

/// Stable external product identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the key is empty or whitespace only.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Sku {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single keyed row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    sku: Sku,
    /// Zero-based position inside the destination range (header row = 0).
    #[serde(rename = "FB_index", skip_serializing_if = "Option::is_none", default)]
    index: Option<usize>,
    #[serde(flatten)]
    values: BTreeMap<String, String>,
}

impl Row {
    pub fn new(sku: impl Into<Sku>) -> Self {
        Self {
            sku: sku.into(),
            index: None,
            values: BTreeMap::new(),
        }
    }

    /// Builder-style setter for the destination position.
    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Builder-style setter for a named value.
    pub fn with_value(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn set_index(&mut self, index: Option<usize>) {
        self.index = index;
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// The destination-side value of `field`.
    pub fn dest(&self, field: Field) -> Option<&str> {
        self.get(&field.dest_key())
    }

    /// The source-side value of `field`.
    pub fn source(&self, field: Field) -> Option<&str> {
        self.get(&field.source_key())
    }

    pub fn set_dest(&mut self, field: Field, value: impl Into<String>) {
        self.set(field.dest_key(), value);
    }

    pub fn set_source(&mut self, field: Field, value: impl Into<String>) {
        self.set(field.source_key(), value);
    }

    /// Names of all values carried by this row, in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Iterate over `(name, value)` pairs.
    pub fn values(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy every value of `other` that this row does not carry yet.
    pub fn absorb(&mut self, other: &Row) {
        for (name, value) in &other.values {
            self.values
                .entry(name.clone())
                .or_insert_with(|| value.clone());
        }
    }
}
