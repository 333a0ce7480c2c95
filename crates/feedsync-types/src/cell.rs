//! Sheet coordinates in `Column+Row` (A1) notation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Default range used when no row bound is configured.
pub const DEFAULT_RANGE: &str = "A1:E20";

/// A sheet column identified by its letters (`A`, `E`, `AA`, ...).
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Column(String);

impl Column {
    /// Build a column from its zero-based index (`0` → `A`, `26` → `AA`).
    pub fn from_index(index: usize) -> Self {
        let mut letters = Vec::new();
        let mut n = index + 1;
        while n > 0 {
            let rem = (n - 1) % 26;
            letters.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        letters.reverse();
        Self(letters.into_iter().map(char::from).collect())
    }

    /// Zero-based column index.
    pub fn index(&self) -> usize {
        self.0
            .bytes()
            .fold(0usize, |acc, b| acc * 26 + usize::from(b - b'A' + 1))
            - 1
    }

    pub fn letters(&self) -> &str {
        &self.0
    }

    /// The cell of this column in the given one-based row.
    pub fn cell(&self, row: usize) -> CellRef {
        CellRef {
            column: self.clone(),
            row,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Column {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let letters = s.trim().to_ascii_uppercase();
        if letters.is_empty()
            || letters.len() > 3
            || !letters.bytes().all(|b| b.is_ascii_uppercase())
        {
            return Err(TypeError::InvalidColumn(s.to_string()));
        }
        Ok(Self(letters))
    }
}

impl TryFrom<String> for Column {
    type Error = TypeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Column> for String {
    fn from(column: Column) -> Self {
        column.0
    }
}

/// A single cell: column letters plus a one-based row number.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellRef {
    pub column: Column,
    pub row: usize,
}

impl CellRef {
    /// Zero-based `(row, column)` position in a grid.
    pub fn position(&self) -> (usize, usize) {
        (self.row - 1, self.column.index())
    }
}

impl fmt::Display for CellRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.row)
    }
}

impl FromStr for CellRef {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let split = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| TypeError::InvalidCell(s.to_string()))?;
        let (letters, digits) = s.split_at(split);
        let column = letters
            .parse::<Column>()
            .map_err(|_| TypeError::InvalidCell(s.to_string()))?;
        let row = digits
            .parse::<usize>()
            .ok()
            .filter(|row| *row > 0)
            .ok_or_else(|| TypeError::InvalidCell(s.to_string()))?;
        Ok(Self { column, row })
    }
}

/// A rectangular range such as `A1:E20`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetRange {
    pub start: CellRef,
    pub end: CellRef,
}

impl SheetRange {
    /// Single column from row 1 down to `max_row`, e.g. `E1:E500`.
    pub fn column(column: &Column, max_row: usize) -> Self {
        Self::span(column, column, max_row)
    }

    /// Columns `from..=to` from row 1 down to `max_row`, e.g. `A1:E500`.
    pub fn span(from: &Column, to: &Column, max_row: usize) -> Self {
        Self {
            start: from.cell(1),
            end: to.cell(max_row.max(1)),
        }
    }

    /// Number of rows covered.
    pub fn height(&self) -> usize {
        self.end.row + 1 - self.start.row
    }

    /// Number of columns covered.
    pub fn width(&self) -> usize {
        self.end.column.index() + 1 - self.start.column.index()
    }
}

impl fmt::Display for SheetRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start, self.end)
    }
}

impl FromStr for SheetRange {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (start, end) = s
            .split_once(':')
            .ok_or_else(|| TypeError::InvalidRange(s.to_string()))?;
        let start: CellRef = start.parse()?;
        let end: CellRef = end.parse()?;
        if end.row < start.row || end.column.index() < start.column.index() {
            return Err(TypeError::InvalidRange(s.to_string()));
        }
        Ok(Self { start, end })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn column_letters_and_indices() {
        assert_eq!(Column::from_index(0).to_string(), "A");
        assert_eq!(Column::from_index(4).to_string(), "E");
        assert_eq!(Column::from_index(25).to_string(), "Z");
        assert_eq!(Column::from_index(26).to_string(), "AA");
        assert_eq!("p".parse::<Column>().unwrap().index(), 15);
        assert_eq!("AB".parse::<Column>().unwrap().index(), 27);
    }

    #[test]
    fn invalid_columns_rejected() {
        assert!("".parse::<Column>().is_err());
        assert!("E5".parse::<Column>().is_err());
        assert!("ABCD".parse::<Column>().is_err());
    }

    #[test]
    fn cell_ref_display_and_parse() {
        let cell = Column::from_index(4).cell(5);
        assert_eq!(cell.to_string(), "E5");
        assert_eq!("E5".parse::<CellRef>().unwrap(), cell);
        assert_eq!(cell.position(), (4, 4));
        assert!("E0".parse::<CellRef>().is_err());
        assert!("5".parse::<CellRef>().is_err());
    }

    #[test]
    fn range_builders() {
        let e = Column::from_index(4);
        assert_eq!(SheetRange::column(&e, 500).to_string(), "E1:E500");
        let a = Column::from_index(0);
        let range = SheetRange::span(&a, &e, 20);
        assert_eq!(range.to_string(), DEFAULT_RANGE);
        assert_eq!(range.width(), 5);
        assert_eq!(range.height(), 20);
    }

    #[test]
    fn range_parse() {
        let range: SheetRange = "B1:C30".parse().unwrap();
        assert_eq!(range.start.column.letters(), "B");
        assert_eq!(range.end.row, 30);
        assert!("B1".parse::<SheetRange>().is_err());
        assert!("B10:B1".parse::<SheetRange>().is_err());
    }

    proptest! {
        #[test]
        fn column_index_roundtrip(index in 0usize..18_000) {
            prop_assert_eq!(Column::from_index(index).index(), index);
        }
    }
}
