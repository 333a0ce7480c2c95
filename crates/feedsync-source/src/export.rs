//! Parser for the `;`-delimited backend export.
//!
//! The export must carry the key column plus the value columns of the sync
//! type's strategy. Values are normalized on the way in, so the resulting
//! dataset holds `P_<field>` values ready for comparison:
//!
//! - inventory: integer text, a trailing `.0` stripped,
//! - price: `"<amount> EUR"` with a decimal comma,
//! - text: as exported,
//! - attributes: the packed cell split into color and size. Rows with an
//!   empty packed cell are dropped.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use feedsync_diff::{format_price, parse_quantity, split_attributes};
use feedsync_types::{Dataset, Field, Row, SyncStrategy, SyncType, SKU_EXPORT_COLUMN};
use tracing::{debug, info, warn};

use crate::error::{SourceError, SourceResult};
use crate::provider::SourceProvider;

/// Field delimiter of the export.
pub const EXPORT_DELIMITER: u8 = b';';

/// Column positions of the required export columns.
struct Layout {
    sku: usize,
    values: Vec<usize>,
}

impl Layout {
    fn resolve(headers: &StringRecord, strategy: &SyncStrategy) -> SourceResult<Self> {
        let position = |column: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == column)
                .ok_or_else(|| SourceError::MissingColumn {
                    column: column.to_string(),
                    sync_type: strategy.sync_type,
                })
        };

        let sku = position(SKU_EXPORT_COLUMN)?;
        let values = strategy
            .export_columns
            .iter()
            .map(|column| position(column))
            .collect::<SourceResult<Vec<_>>>()?;
        Ok(Self { sku, values })
    }
}

/// Parse an export for `strategy`.
///
/// Returns [`SourceError::MissingColumn`] if a required column is absent.
/// Rows with a blank key and repeated keys are dropped.
pub fn read_export<R: Read>(reader: R, strategy: &SyncStrategy) -> SourceResult<Dataset> {
    let mut csv = ReaderBuilder::new()
        .delimiter(EXPORT_DELIMITER)
        .flexible(true)
        .from_reader(reader);

    let headers = csv.headers()?.clone();
    let layout = Layout::resolve(&headers, strategy)?;

    let mut rows = Vec::new();
    for record in csv.records() {
        let record = record?;
        if let Some(row) = parse_record(&record, &layout, strategy) {
            rows.push(row);
        }
    }

    let (dataset, report) = Dataset::build(rows);
    if !report.is_clean() {
        warn!(
            blank = report.blank,
            duplicates = report.duplicates.len(),
            "dropped export rows with unusable keys"
        );
    }
    Ok(dataset)
}

fn parse_record(record: &StringRecord, layout: &Layout, strategy: &SyncStrategy) -> Option<Row> {
    let cell = |position: usize| record.get(position).map(str::trim).filter(|v| !v.is_empty());

    let mut row = Row::new(record.get(layout.sku).unwrap_or("").trim());

    match strategy.sync_type {
        SyncType::Inventory => {
            if let Some(raw) = layout.values.first().and_then(|&p| cell(p)) {
                let value = parse_quantity(raw)
                    .map(|quantity| quantity.to_string())
                    .unwrap_or_else(|_| raw.to_string());
                row.set_source(Field::Inventory, value);
            }
        }
        SyncType::Price => {
            if let Some(raw) = layout.values.first().and_then(|&p| cell(p)) {
                match format_price(raw) {
                    Some(price) => row.set_source(Field::Price, price),
                    None => debug!(sku = %row.sku(), raw, "unparseable price"),
                }
            }
        }
        SyncType::Text => {
            for (&field, &position) in strategy.fields.iter().zip(&layout.values) {
                if let Some(text) = record.get(position).filter(|v| !v.trim().is_empty()) {
                    row.set_source(field, text);
                }
            }
        }
        SyncType::Attr => {
            let packed = layout.values.first().and_then(|&p| cell(p))?;
            let attributes = split_attributes(packed);
            for &field in &strategy.fields {
                if let Some(value) = attributes.get(field) {
                    row.set_source(field, value);
                }
            }
        }
    }

    Some(row)
}

/// Fetch the export from `provider` and parse it for `strategy`.
pub fn load_source(provider: &dyn SourceProvider, strategy: &SyncStrategy) -> SourceResult<Dataset> {
    let body = provider.fetch()?;
    let dataset = read_export(body.as_slice(), strategy)?;
    info!(
        location = %provider.location(),
        sync_type = %strategy.sync_type,
        rows = dataset.len(),
        "loaded source export"
    );
    Ok(dataset)
}
