//! Destination side of feedsync.
//!
//! The destination is a spreadsheet read by rectangular A1 ranges and
//! updated by individual cells.
//!
//! # Stores
//!
//! All backends implement the [`SheetStore`] trait:
//!
//! - [`InMemorySheet`] -- `RwLock`-guarded grid for tests and dry runs
//! - [`JsonFileSheet`] -- grid persisted as a JSON array of rows
//!
//! # Reading and writing
//!
//! - [`read_destination`] builds the destination dataset, checking the `id`
//!   key column and the header of every mapped column.
//! - [`write_batch`] and [`apply_plan`] send planned cell writes.

pub mod error;
pub mod file;
pub mod memory;
pub mod reader;
pub mod store;
pub mod writer;

pub use error::{SheetError, SheetResult};
pub use file::JsonFileSheet;
pub use memory::InMemorySheet;
pub use reader::{
    destination_ranges, key_column, read_destination, sheet_range, DEFAULT_ROW_BOUND, KEY_HEADER,
};
pub use store::{Grid, SheetStore, UpdateSummary, ValueRange};
pub use writer::{apply_plan, write_batch};
