//! Left join of destination and source rows by key.
//!
//! Every destination row survives in its original order together with its
//! destination index. Source values are attached where the key exists;
//! source-only keys are never introduced here (see
//! [`add_new_items`](crate::reconcile::add_new_items) for that).

use feedsync_types::Dataset;
use tracing::debug;

/// Join `source` onto `destination` by key.
///
/// - An empty destination yields an empty dataset.
/// - An empty source yields the destination unchanged.
pub fn align(destination: &Dataset, source: &Dataset) -> Dataset {
    if destination.is_empty() {
        return Dataset::new();
    }
    if source.is_empty() {
        return destination.clone();
    }

    let by_key = source.index_by_key();
    let mut matched = 0usize;

    let rows = destination.iter().map(|dest_row| {
        let mut joined = dest_row.clone();
        if let Some(source_row) = by_key.get(dest_row.sku()) {
            joined.absorb(source_row);
            matched += 1;
        }
        joined
    });
    let aligned = Dataset::from_rows(rows.collect::<Vec<_>>());

    debug!(
        destination = destination.len(),
        source = source.len(),
        matched,
        "aligned datasets"
    );
    aligned
}

#[cfg(test)]
mod tests {
    use super::*;
    use feedsync_types::{Field, Row, Sku};
    use proptest::prelude::*;

    fn dest(rows: &[(&str, &str)]) -> Dataset {
        Dataset::from_rows(rows.iter().enumerate().map(|(i, (sku, value))| {
            Row::new(*sku)
                .with_index(i + 1)
                .with_value(Field::Inventory.dest_key(), *value)
        }))
    }

    fn source(rows: &[(&str, &str)]) -> Dataset {
        Dataset::from_rows(
            rows.iter()
                .map(|(sku, value)| Row::new(*sku).with_value(Field::Inventory.source_key(), *value)),
        )
    }

    #[test]
    fn joins_matching_keys() {
        let aligned = align(
            &dest(&[("1234", "10"), ("1235", "11")]),
            &source(&[("1235", "99"), ("1234", "10")]),
        );

        assert_eq!(aligned.len(), 2);
        let row = aligned.get(&Sku::new("1235")).unwrap();
        assert_eq!(row.dest(Field::Inventory), Some("11"));
        assert_eq!(row.source(Field::Inventory), Some("99"));
        assert_eq!(row.index(), Some(2));
    }

    #[test]
    fn keeps_destination_order_and_unmatched_rows() {
        let aligned = align(
            &dest(&[("b", "1"), ("a", "2"), ("c", "3")]),
            &source(&[("a", "5")]),
        );
        let keys: Vec<_> = aligned.keys().map(Sku::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
        assert_eq!(aligned.get(&Sku::new("b")).unwrap().source(Field::Inventory), None);
    }

    #[test]
    fn source_only_keys_are_not_introduced() {
        let aligned = align(&dest(&[("a", "1")]), &source(&[("a", "1"), ("new", "4")]));
        assert_eq!(aligned.len(), 1);
        assert!(!aligned.contains(&Sku::new("new")));
    }

    #[test]
    fn empty_inputs() {
        let d = dest(&[("a", "1")]);
        assert_eq!(align(&d, &Dataset::new()), d);
        assert!(align(&Dataset::new(), &source(&[("a", "1")])).is_empty());
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        proptest::collection::vec(("[a-z0-9]{1,6}", "[0-9]{1,3}"), 0..20).prop_map(|pairs| {
            Dataset::from_rows(pairs.into_iter().enumerate().map(|(i, (sku, value))| {
                Row::new(sku)
                    .with_index(i + 1)
                    .with_value(Field::Inventory.dest_key(), value)
            }))
        })
    }

    proptest! {
        #[test]
        fn align_with_empty_source_is_identity(d in arb_dataset()) {
            prop_assert_eq!(align(&d, &Dataset::new()), d);
        }

        #[test]
        fn align_with_empty_destination_is_empty(d in arb_dataset()) {
            prop_assert!(align(&Dataset::new(), &d).is_empty());
        }

        #[test]
        fn align_preserves_destination_row_count(d in arb_dataset(), s in arb_dataset()) {
            prop_assert_eq!(align(&d, &s).len(), d.len());
        }
    }
}
