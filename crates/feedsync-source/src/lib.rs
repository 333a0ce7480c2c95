//! Source side of feedsync.
//!
//! Fetches the backend's delimited export through a [`SourceProvider`] and
//! parses it into a normalized source [`Dataset`](feedsync_types::Dataset).

pub mod error;
pub mod export;
pub mod provider;

pub use error::{SourceError, SourceResult};
pub use export::{load_source, read_export, EXPORT_DELIMITER};
pub use provider::{provider_for, FileExport, HttpExport, InMemoryExport, SourceProvider};
