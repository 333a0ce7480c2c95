//! Sync types and the strategy record each one selects.
//!
//! A [`SyncType`] is chosen once per run. Its [`SyncStrategy`] carries
//! everything the engine needs to know about that type: which fields are
//! compared, where they come from in the source export, which sheet
//! columns they land in, and how the two sides are compared.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::cell::Column;
use crate::error::TypeError;
use crate::row::{DEST_PREFIX, SOURCE_PREFIX};

/// Export column holding the product key.
pub const SKU_EXPORT_COLUMN: &str = "Variation.number";

/// Export column prefix for the physical stock of a warehouse.
pub const STOCK_EXPORT_PREFIX: &str = "VariationStock.physicalStock.";

pub const PRICE_EXPORT_COLUMN: &str = "VariationSalesPrice.price";
pub const TITLE_EXPORT_COLUMN: &str = "ItemDescription.Webshopname";
pub const DESCRIPTION_EXPORT_COLUMN: &str = "ItemDescription.description";

/// Export column packing all attributes as `type:value,type2:value2`.
pub const ATTRIBUTES_EXPORT_COLUMN: &str = "VariationAttributeValues.attributeValues";

/// Similarity ratio below which two texts count as different.
pub const TEXT_SIMILARITY_THRESHOLD: f32 = 0.9989;

/// A business field synchronized into the sheet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Inventory,
    Price,
    Title,
    Description,
    Color,
    Size,
}

impl Field {
    /// The sheet header name of this field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Price => "price",
            Self::Title => "title",
            Self::Description => "description",
            Self::Color => "color",
            Self::Size => "size",
        }
    }

    pub fn dest_key(self) -> String {
        format!("{DEST_PREFIX}{}", self.name())
    }

    pub fn source_key(self) -> String {
        format!("{SOURCE_PREFIX}{}", self.name())
    }

    /// Marker used for this field inside a packed attribute string.
    pub fn attribute_marker(self) -> Option<&'static str> {
        match self {
            Self::Color => Some("color_name"),
            Self::Size => Some("size_name"),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The four supported kinds of synchronization.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncType {
    Inventory,
    Price,
    Text,
    Attr,
}

impl SyncType {
    pub const ALL: [SyncType; 4] = [Self::Inventory, Self::Price, Self::Text, Self::Attr];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inventory => "inventory",
            Self::Price => "price",
            Self::Text => "text",
            Self::Attr => "attr",
        }
    }

    /// Fields compared and written by this sync type, in column order.
    pub fn fields(self) -> &'static [Field] {
        match self {
            Self::Inventory => &[Field::Inventory],
            Self::Price => &[Field::Price],
            Self::Text => &[Field::Title, Field::Description],
            Self::Attr => &[Field::Color, Field::Size],
        }
    }

    /// Default zero-based sheet column indices, one per field
    /// (inventory `E`, price `G`, text `B`/`C`, attributes `P`/`Q`).
    pub fn default_column_indices(self) -> &'static [usize] {
        match self {
            Self::Inventory => &[4],
            Self::Price => &[6],
            Self::Text => &[1, 2],
            Self::Attr => &[15, 16],
        }
    }

    /// Export value columns for this sync type (the key column excluded).
    ///
    /// The inventory column is suffixed with the warehouse name.
    pub fn export_columns(self, warehouse: &str) -> Vec<String> {
        match self {
            Self::Inventory => vec![format!("{STOCK_EXPORT_PREFIX}{warehouse}")],
            Self::Price => vec![PRICE_EXPORT_COLUMN.to_string()],
            Self::Text => vec![
                TITLE_EXPORT_COLUMN.to_string(),
                DESCRIPTION_EXPORT_COLUMN.to_string(),
            ],
            Self::Attr => vec![ATTRIBUTES_EXPORT_COLUMN.to_string()],
        }
    }

    pub fn comparison(self) -> Comparison {
        match self {
            Self::Inventory => Comparison::Quantity,
            Self::Price | Self::Attr => Comparison::Exact,
            Self::Text => Comparison::Similarity {
                threshold: TEXT_SIMILARITY_THRESHOLD,
            },
        }
    }
}

impl fmt::Display for SyncType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SyncType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inventory" | "stock" => Ok(Self::Inventory),
            "price" => Ok(Self::Price),
            "text" => Ok(Self::Text),
            "attr" | "attribute" => Ok(Self::Attr),
            other => Err(TypeError::UnknownSyncType(other.to_string())),
        }
    }
}

/// How destination and source values of a field are compared.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Comparison {
    /// Integer comparison; unparseable source values count as zero.
    Quantity,
    /// Plain string inequality.
    Exact,
    /// Character similarity ratio strictly below `threshold` means changed.
    Similarity { threshold: f32 },
}

/// Everything the engine needs to reconcile one sync type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SyncStrategy {
    pub sync_type: SyncType,
    pub fields: Vec<Field>,
    pub export_columns: Vec<String>,
    pub columns: Vec<Column>,
    pub comparison: Comparison,
}

impl SyncStrategy {
    /// Build the default strategy for `sync_type`.
    pub fn new(sync_type: SyncType, warehouse: &str) -> Self {
        let columns = sync_type
            .default_column_indices()
            .iter()
            .map(|&index| Column::from_index(index))
            .collect();
        Self {
            sync_type,
            fields: sync_type.fields().to_vec(),
            export_columns: sync_type.export_columns(warehouse),
            columns,
            comparison: sync_type.comparison(),
        }
    }

    /// Replace the destination columns, one per field.
    pub fn with_columns(mut self, columns: Vec<Column>) -> Result<Self, TypeError> {
        if columns.len() != self.fields.len() {
            return Err(TypeError::ColumnCountMismatch {
                sync_type: self.sync_type.to_string(),
                expected: self.fields.len(),
                actual: columns.len(),
            });
        }
        self.columns = columns;
        Ok(self)
    }

    /// Pairs of field and destination column, in column-mapping order.
    pub fn field_columns(&self) -> impl Iterator<Item = (Field, &Column)> {
        self.fields.iter().copied().zip(self.columns.iter())
    }

    pub fn column_for(&self, field: Field) -> Option<&Column> {
        self.field_columns()
            .find(|(f, _)| *f == field)
            .map(|(_, column)| column)
    }

    /// Finds the field whose sheet header is `header`.
    pub fn field_named(&self, header: &str) -> Option<Field> {
        self.fields.iter().copied().find(|f| f.name() == header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_columns_match_fields() {
        for sync_type in SyncType::ALL {
            let strategy = SyncStrategy::new(sync_type, "Main");
            assert_eq!(strategy.fields.len(), strategy.columns.len());
        }
    }

    #[test]
    fn inventory_export_column_carries_warehouse() {
        let strategy = SyncStrategy::new(SyncType::Inventory, "Lager1");
        assert_eq!(
            strategy.export_columns,
            vec!["VariationStock.physicalStock.Lager1".to_string()]
        );
    }

    #[test]
    fn text_strategy_layout() {
        let strategy = SyncStrategy::new(SyncType::Text, "");
        let pairs: Vec<_> = strategy
            .field_columns()
            .map(|(field, column)| (field, column.to_string()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                (Field::Title, "B".to_string()),
                (Field::Description, "C".to_string())
            ]
        );
        assert!(matches!(
            strategy.comparison,
            Comparison::Similarity { threshold } if threshold == TEXT_SIMILARITY_THRESHOLD
        ));
    }

    #[test]
    fn column_override_must_match_field_count() {
        let strategy = SyncStrategy::new(SyncType::Attr, "");
        let err = strategy
            .clone()
            .with_columns(vec!["R".parse().unwrap()])
            .unwrap_err();
        assert_eq!(
            err,
            TypeError::ColumnCountMismatch {
                sync_type: "attr".into(),
                expected: 2,
                actual: 1
            }
        );

        let moved = strategy
            .with_columns(vec!["R".parse().unwrap(), "S".parse().unwrap()])
            .unwrap();
        assert_eq!(moved.column_for(Field::Size).unwrap().to_string(), "S");
    }

    #[test]
    fn parse_sync_type_aliases() {
        assert_eq!("attribute".parse::<SyncType>().unwrap(), SyncType::Attr);
        assert_eq!("Inventory".parse::<SyncType>().unwrap(), SyncType::Inventory);
        assert!("colour".parse::<SyncType>().is_err());
    }

    #[test]
    fn field_keys() {
        assert_eq!(Field::Description.dest_key(), "FB_description");
        assert_eq!(Field::Color.source_key(), "P_color");
        assert_eq!(Field::Size.attribute_marker(), Some("size_name"));
        assert_eq!(Field::Price.attribute_marker(), None);
    }
}
