use std::fs;

use feedsync_sheet::{Grid, InMemorySheet, JsonFileSheet, SheetStore};
use feedsync_source::{FileExport, InMemoryExport};
use feedsync_sync::{run_sync, ChangeJournal, SyncContext, SyncOutcome};
use feedsync_types::{Field, SyncStrategy, SyncType};

fn inventory_sheet() -> InMemorySheet {
    InMemorySheet::from_rows(vec![
        vec!["id", "title", "", "", "inventory"],
        vec!["1234", "Shirt", "", "", "10"],
        vec!["1235", "Hat", "", "", "11"],
        vec!["", "", "", "", ""],
        vec!["1236", "Scarf", "", "", "2.0"],
        vec!["1237", "Socks", "", "", "many"],
    ])
}

const INVENTORY_EXPORT: &str = "Variation.number;Item.id;VariationStock.physicalStock.Main\n\
                                1234;1;10\n\
                                1235;2;99\n\
                                1236;3;2\n\
                                1237;4;5\n\
                                1240;5;7\n";

fn inventory_context() -> SyncContext {
    SyncContext::new(SyncStrategy::new(SyncType::Inventory, "Main")).with_sheet_rows(100)
}

#[test]
fn inventory_sync_writes_only_differences() {
    let sheet = inventory_sheet();
    let export = InMemoryExport::new(INVENTORY_EXPORT);

    let report = run_sync(&inventory_context(), &sheet, &export).unwrap();

    assert_eq!(report.outcome, SyncOutcome::Written);
    assert_eq!(report.destination_rows, 4);
    assert_eq!(report.new_items, 1);
    assert_eq!(report.differences, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].field, Field::Inventory);

    let write = report.plan.writes().next().unwrap();
    assert_eq!(write.cell.to_string(), "E3");
    assert_eq!(write.previous, "11");
    assert_eq!(write.value, "99");

    assert_eq!(sheet.cell(&"E3".parse().unwrap()).as_deref(), Some("99"));
    // Unparseable destination values are left alone.
    assert_eq!(sheet.cell(&"E6".parse().unwrap()).as_deref(), Some("many"));
    // Rows after the blank id row keep their position.
    assert_eq!(sheet.cell(&"E5".parse().unwrap()).as_deref(), Some("2.0"));
}

#[test]
fn second_run_finds_nothing() {
    let sheet = inventory_sheet();
    let export = InMemoryExport::new(INVENTORY_EXPORT);

    run_sync(&inventory_context(), &sheet, &export).unwrap();
    let rerun = run_sync(&inventory_context(), &sheet, &export).unwrap();

    assert_eq!(rerun.outcome, SyncOutcome::NoChanges);
    assert!(rerun.plan.is_empty());
}

#[test]
fn attribute_sync_against_file_sheet_with_journal() {
    let dir = tempfile::tempdir().unwrap();
    let mut header = vec![""; 17];
    header[0] = "id";
    header[15] = "color";
    header[16] = "size";
    let mut first = vec![""; 17];
    first[0] = "1";
    first[15] = "red";
    first[16] = "S";
    let mut second = vec![""; 17];
    second[0] = "2";
    second[15] = "blue";
    second[16] = "L";

    let sheet_path = dir.path().join("sheet.json");
    let sheet = JsonFileSheet::create(&sheet_path, &Grid::from_rows(vec![header, first, second]))
        .unwrap();

    let export_path = dir.path().join("export.csv");
    fs::write(
        &export_path,
        "Variation.number;VariationAttributeValues.attributeValues\n\
         1;color_name:red,size_name:M\n\
         2;color_name:blue,size_name:L\n",
    )
    .unwrap();

    let journal_dir = dir.path().join("log");
    let ctx = SyncContext::new(SyncStrategy::new(SyncType::Attr, ""))
        .with_sheet_rows(10)
        .with_journal(ChangeJournal::new(&journal_dir));

    let report = run_sync(&ctx, &sheet, &FileExport::new(&export_path)).unwrap();
    assert_eq!(report.outcome, SyncOutcome::Written);
    assert_eq!(report.plan.len(), 1);
    assert!(report.plan.batch(Field::Color).is_none());

    let reopened = JsonFileSheet::open(&sheet_path).unwrap();
    let ranges = reopened.batch_get(&["Q1:Q3".parse().unwrap()]).unwrap();
    assert_eq!(ranges[0].values, vec![vec!["size"], vec!["M"], vec!["L"]]);

    let entries: Vec<_> = fs::read_dir(&journal_dir).unwrap().collect();
    assert_eq!(entries.len(), 1);
    let journal = fs::read_to_string(entries[0].as_ref().unwrap().path()).unwrap();
    assert!(journal.contains("sync:size:"));
    assert!(journal.contains("1.S -> M"));
}

#[test]
fn text_sync_tolerates_nothing_but_identical_text() {
    let sheet = InMemorySheet::from_rows(vec![
        vec!["id", "title", "description"],
        vec!["1234", "Blue Shirt", "Soft cotton shirt"],
        vec!["1235", "Red Hat", "Wool hat"],
    ]);
    let export = InMemoryExport::new(
        "Variation.number;ItemDescription.Webshopname;ItemDescription.description\n\
         1234;Blue Shirt;Soft cotton shirt\n\
         1235;Red Hat;Wool hats\n",
    );
    let ctx = SyncContext::new(SyncStrategy::new(SyncType::Text, "")).with_sheet_rows(10);

    let report = run_sync(&ctx, &sheet, &export).unwrap();
    assert_eq!(report.differences, 1);
    assert_eq!(report.plan.len(), 1);
    assert_eq!(sheet.cell(&"C3".parse().unwrap()).as_deref(), Some("Wool hats"));
    assert_eq!(sheet.cell(&"B3".parse().unwrap()).as_deref(), Some("Red Hat"));
}

#[test]
fn header_mismatch_is_an_error() {
    let sheet = InMemorySheet::from_rows(vec![vec!["id", "", "", "", "price"]]);
    let export = InMemoryExport::new(INVENTORY_EXPORT);
    assert!(run_sync(&inventory_context(), &sheet, &export).is_err());
}

#[test]
fn header_only_export_changes_nothing() {
    let sheet = inventory_sheet();
    let before = sheet.snapshot();
    let export =
        InMemoryExport::new("Variation.number;Item.id;VariationStock.physicalStock.Main\n");

    let report = run_sync(&inventory_context(), &sheet, &export).unwrap();

    assert_eq!(report.outcome, SyncOutcome::NoChanges);
    assert_eq!(report.source_rows, 0);
    assert!(report.plan.is_empty());
    assert_eq!(report.updated_cells, 0);
    assert_eq!(sheet.snapshot(), before);
    assert_eq!(sheet.cell(&"E2".parse().unwrap()).as_deref(), Some("10"));
}

#[test]
fn header_only_sheet_changes_nothing() {
    let sheet = InMemorySheet::from_rows(vec![vec!["id", "", "", "", "inventory"]]);
    let before = sheet.snapshot();
    let export = InMemoryExport::new(INVENTORY_EXPORT);

    let report = run_sync(&inventory_context(), &sheet, &export).unwrap();

    assert_eq!(report.outcome, SyncOutcome::NoChanges);
    assert_eq!(report.destination_rows, 0);
    assert_eq!(report.source_rows, 5);
    assert!(report.plan.is_empty());
    assert_eq!(sheet.snapshot(), before);
}
