//! Type-specific value cleanup.
//!
//! Both sides of a sync are normalized independently before they are
//! compared:
//!
//! - quantities are parsed in two explicit stages (plain integer, then with
//!   a trailing all-zero fraction stripped),
//! - prices are rendered as `"<amount> EUR"` with a decimal comma,
//! - packed attribute strings are split into named attributes,
//! - texts are blank-filled.

use feedsync_types::Field;
use serde::Serialize;
use tracing::warn;

/// Placeholder that numeric-to-text conversions leave behind for missing
/// values. Never written to the destination.
pub const NAN_PLACEHOLDER: &str = "nan";

/// Currency suffix used by the catalog feed.
pub const CURRENCY_SUFFIX: &str = "EUR";

/// Why a quantity could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, thiserror::Error)]
pub enum ParseFailure {
    #[error("blank value")]
    Blank,
    #[error("quantity has a non-zero fraction: {0:?}")]
    Fractional(String),
    #[error("not a number: {0:?}")]
    NotNumeric(String),
}

/// Which dataset a value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Destination,
    Source,
}

/// A value ready for comparison.
#[derive(Clone, Debug, PartialEq)]
pub enum Normalized {
    Quantity(i64),
    Text(String),
    /// Excluded from comparison.
    Invalid(ParseFailure),
}

impl Normalized {
    /// The text written to a destination cell for this value.
    pub fn to_cell_value(&self) -> Option<String> {
        match self {
            Self::Quantity(n) => Some(n.to_string()),
            Self::Text(text) => Some(scrub_placeholder(text).to_string()),
            Self::Invalid(_) => None,
        }
    }
}

/// Parse an inventory quantity.
///
/// Stage one parses the trimmed value as an integer. Stage two strips a
/// trailing all-zero fraction (`"12.0"`, `"12.00"`) left behind by a
/// numeric-to-text round trip and parses again.
pub fn parse_quantity(raw: &str) -> Result<i64, ParseFailure> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ParseFailure::Blank);
    }
    parse_integer(trimmed).or_else(|_| parse_without_zero_fraction(trimmed))
}

fn parse_integer(value: &str) -> Result<i64, ParseFailure> {
    value
        .parse::<i64>()
        .map_err(|_| ParseFailure::NotNumeric(value.to_string()))
}

fn parse_without_zero_fraction(value: &str) -> Result<i64, ParseFailure> {
    let (whole, fraction) = value
        .split_once('.')
        .ok_or_else(|| ParseFailure::NotNumeric(value.to_string()))?;
    if fraction.is_empty() || !fraction.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ParseFailure::NotNumeric(value.to_string()));
    }
    if fraction.bytes().any(|b| b != b'0') {
        return Err(ParseFailure::Fractional(value.to_string()));
    }
    parse_integer(whole).map_err(|_| ParseFailure::NotNumeric(value.to_string()))
}

/// Source-side quantity: anything unparseable counts as zero stock.
///
/// A non-blank value coerced to zero is logged, since it will zero the
/// destination stock.
pub fn source_quantity(raw: Option<&str>) -> i64 {
    let Some(value) = raw else {
        return 0;
    };
    match parse_quantity(value) {
        Ok(quantity) => quantity,
        Err(ParseFailure::Blank) => 0,
        Err(err) => {
            warn!(value, %err, "source quantity counted as zero stock");
            0
        }
    }
}

/// Render a price as `"<amount> EUR"` with a decimal comma.
///
/// `25.70` becomes `25,7 EUR`; an integral amount written with a decimal
/// point keeps one fractional digit (`25.0` becomes `25,0 EUR`). Returns
/// `None` for blank or non-numeric input.
pub fn format_price(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let amount: f64 = trimmed
        .replace(',', ".")
        .parse()
        .ok()
        .filter(|value: &f64| value.is_finite())?;

    let mut rendered = amount.to_string();
    let had_point = trimmed.contains('.') || trimmed.contains(',');
    if amount.fract() == 0.0 && had_point && !rendered.contains('.') {
        rendered.push_str(".0");
    }
    Some(format!("{} {CURRENCY_SUFFIX}", rendered.replace('.', ",")))
}

/// The attributes packed into a single export cell.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Attributes {
    pub color: Option<String>,
    pub size: Option<String>,
}

impl Attributes {
    pub fn get(&self, field: Field) -> Option<&str> {
        match field {
            Field::Color => self.color.as_deref(),
            Field::Size => self.size.as_deref(),
            _ => None,
        }
    }
}

/// Find the value stored under `marker` in a packed `type:value,...` string.
///
/// Returns `None` if the marker is absent.
pub fn extract_attribute(packed: &str, marker: &str) -> Option<String> {
    let prefix = format!("{marker}:");
    packed
        .split(',')
        .map(str::trim)
        .find_map(|segment| segment.strip_prefix(prefix.as_str()))
        .map(|value| value.trim().to_string())
}

/// Split a packed attribute string into color and size.
pub fn split_attributes(packed: &str) -> Attributes {
    let lookup = |field: Field| {
        field
            .attribute_marker()
            .and_then(|marker| extract_attribute(packed, marker))
    };
    Attributes {
        color: lookup(Field::Color),
        size: lookup(Field::Size),
    }
}

/// Missing values become the empty string.
pub fn blank_fill(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

/// Replace the not-a-number placeholder with the empty string.
pub fn scrub_placeholder(value: &str) -> &str {
    if value.trim().eq_ignore_ascii_case(NAN_PLACEHOLDER) {
        ""
    } else {
        value
    }
}

/// Normalize one side's raw value of `field` for comparison.
pub fn normalize(field: Field, side: Side, raw: Option<&str>) -> Normalized {
    match (field, side) {
        (Field::Inventory, Side::Source) => Normalized::Quantity(source_quantity(raw)),
        (Field::Inventory, Side::Destination) => match raw.map(parse_quantity) {
            Some(Ok(quantity)) => Normalized::Quantity(quantity),
            Some(Err(failure)) => Normalized::Invalid(failure),
            None => Normalized::Invalid(ParseFailure::Blank),
        },
        _ => Normalized::Text(scrub_placeholder(blank_fill(raw)).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_quantities() {
        assert_eq!(parse_quantity("12"), Ok(12));
        assert_eq!(parse_quantity(" 7 "), Ok(7));
        assert_eq!(parse_quantity("-3"), Ok(-3));
    }

    #[test]
    fn zero_fraction_is_stripped() {
        assert_eq!(parse_quantity("12.0"), Ok(12));
        assert_eq!(parse_quantity("12.000"), Ok(12));
    }

    #[test]
    fn quantity_failures_are_typed() {
        assert_eq!(parse_quantity(""), Err(ParseFailure::Blank));
        assert_eq!(parse_quantity("  "), Err(ParseFailure::Blank));
        assert_eq!(
            parse_quantity("12.5"),
            Err(ParseFailure::Fractional("12.5".into()))
        );
        assert_eq!(
            parse_quantity("ten"),
            Err(ParseFailure::NotNumeric("ten".into()))
        );
        assert_eq!(
            parse_quantity("12."),
            Err(ParseFailure::NotNumeric("12.".into()))
        );
    }

    #[test]
    fn source_quantity_defaults_to_zero() {
        assert_eq!(source_quantity(None), 0);
        assert_eq!(source_quantity(Some("")), 0);
        assert_eq!(source_quantity(Some("n/a")), 0);
        assert_eq!(source_quantity(Some("15.0")), 15);
    }

    #[test]
    fn fractional_source_quantity_is_zero_stock() {
        assert_eq!(source_quantity(Some("12.5")), 0);
        assert_eq!(source_quantity(Some(" 12 ")), 12);
    }

    #[test]
    fn price_formatting() {
        assert_eq!(format_price("25.7").as_deref(), Some("25,7 EUR"));
        assert_eq!(format_price("25.70").as_deref(), Some("25,7 EUR"));
        assert_eq!(format_price("25.0").as_deref(), Some("25,0 EUR"));
        assert_eq!(format_price("25").as_deref(), Some("25 EUR"));
        assert_eq!(format_price("1.5").as_deref(), Some("1,5 EUR"));
        assert_eq!(format_price("18,7").as_deref(), Some("18,7 EUR"));
        assert_eq!(format_price(""), None);
        assert_eq!(format_price("free"), None);
    }

    #[test]
    fn split_both_attributes() {
        let attributes = split_attributes("color_name:red,size_name:M");
        assert_eq!(attributes.color.as_deref(), Some("red"));
        assert_eq!(attributes.size.as_deref(), Some("M"));
    }

    #[test]
    fn split_attributes_in_any_order() {
        let attributes = split_attributes("size_name:XL,color_name:olive-green");
        assert_eq!(attributes.get(Field::Color), Some("olive-green"));
        assert_eq!(attributes.get(Field::Size), Some("XL"));
    }

    #[test]
    fn absent_attribute_is_missing() {
        let attributes = split_attributes("color_name:red");
        assert_eq!(attributes.color.as_deref(), Some("red"));
        assert_eq!(attributes.size, None);

        assert_eq!(split_attributes(""), Attributes::default());
    }

    #[test]
    fn placeholder_scrubbing() {
        assert_eq!(scrub_placeholder("nan"), "");
        assert_eq!(scrub_placeholder("NaN"), "");
        assert_eq!(scrub_placeholder("banana"), "banana");
        assert_eq!(scrub_placeholder("12"), "12");
    }

    #[test]
    fn normalize_by_field_and_side() {
        assert_eq!(
            normalize(Field::Inventory, Side::Source, None),
            Normalized::Quantity(0)
        );
        assert_eq!(
            normalize(Field::Inventory, Side::Destination, Some("11.0")),
            Normalized::Quantity(11)
        );
        assert_eq!(
            normalize(Field::Inventory, Side::Destination, Some("")),
            Normalized::Invalid(ParseFailure::Blank)
        );
        assert_eq!(
            normalize(Field::Title, Side::Source, None),
            Normalized::Text(String::new())
        );
        assert_eq!(
            normalize(Field::Size, Side::Source, Some("nan")),
            Normalized::Text(String::new())
        );
    }

    #[test]
    fn cell_values() {
        assert_eq!(Normalized::Quantity(0).to_cell_value().as_deref(), Some("0"));
        assert_eq!(
            Normalized::Text("25,7 EUR".into()).to_cell_value().as_deref(),
            Some("25,7 EUR")
        );
        assert_eq!(
            Normalized::Invalid(ParseFailure::Blank).to_cell_value(),
            None
        );
    }
}
