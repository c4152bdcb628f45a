//! Property tests for reconciliation and token commit ordering.

use drivesync_core::{reconcile, FileRecord, RecordStore, StoreConfig};
use drivesync_engine::SyncError;
use drivesync_protocol::DeltaItem;
use drivesync_testkit::prelude::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn sorted(mut records: Vec<FileRecord>) -> Vec<FileRecord> {
    records.sort_by(|a, b| a.file_id().cmp(b.file_id()));
    records
}

fn snapshot(records: &[FileRecord]) -> Vec<(String, String, String)> {
    records
        .iter()
        .map(|r| {
            (
                r.file_id().to_string(),
                r.file_name().to_string(),
                r.date_modified().to_string(),
            )
        })
        .collect()
}

fn apply(records: &mut Vec<FileRecord>, items: &[DeltaItem]) {
    reconcile(records, TRACKED_FOLDER, items);
}

proptest! {
    #[test]
    fn replay_is_idempotent_on_record_set(batch in delta_batch_strategy(20)) {
        let mut once = Vec::new();
        apply(&mut once, &batch);

        let mut twice = once.clone();
        apply(&mut twice, &batch);

        prop_assert_eq!(sorted(once), sorted(twice));
    }

    #[test]
    fn unknown_delete_is_noop(batch in delta_batch_strategy(20)) {
        let mut records = Vec::new();
        apply(&mut records, &batch);
        let before = snapshot(&records);

        let report = reconcile(
            &mut records,
            TRACKED_FOLDER,
            &[DeltaItem::deleted("UNKNOWN", TRACKED_FOLDER, FIXED_TIME)],
        );

        let after = snapshot(&records);
        prop_assert_eq!(before, after);
        prop_assert_eq!(report.deleted, 0);
        prop_assert!(records.iter().all(|r| !r.is_new()));
    }

    #[test]
    fn ids_stay_unique(pages in delta_pages_strategy(5, 10)) {
        let mut records = Vec::new();
        for page in &pages {
            apply(&mut records, &page.items);
            let ids: HashSet<_> = records.iter().map(|r| r.file_id()).collect();
            prop_assert_eq!(ids.len(), records.len());
        }
    }

    #[test]
    fn new_marks_only_touched_records(
        prefix in delta_batch_strategy(15),
        batch in delta_batch_strategy(15),
    ) {
        let mut records = Vec::new();
        apply(&mut records, &prefix);
        apply(&mut records, &batch);

        let touched: HashSet<_> = batch
            .iter()
            .filter(|i| i.is_child_of(TRACKED_FOLDER) && !i.is_delete && i.file_name.is_some())
            .map(|i| i.file_id.as_str())
            .collect();

        for record in &records {
            prop_assert_eq!(record.is_new(), touched.contains(record.file_id()));
        }
    }

    #[test]
    fn out_of_scope_items_change_nothing(batch in delta_batch_strategy(20)) {
        let foreign: Vec<DeltaItem> = batch
            .into_iter()
            .map(|mut item| {
                item.parent_id = Some("ELSEWHERE".to_string());
                item
            })
            .collect();

        let mut records = vec![FileRecord::new("A", "a.txt", false, FIXED_TIME, true)];
        let report = reconcile(&mut records, TRACKED_FOLDER, &foreign);

        prop_assert_eq!(report.changed(), 0);
        prop_assert_eq!(report.skipped, foreign.len());
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].file_name(), "a.txt");
    }

    #[test]
    fn token_follows_persistence(
        pages in delta_pages_strategy(6, 6),
        failures in prop::collection::vec(any::<bool>(), 6),
    ) {
        let fixture = DriverFixture::new();
        let mut committed: Option<String> = None;

        for (page, fail) in pages.iter().zip(failures) {
            fixture.source.push_page(page.clone());
            fixture.fail_saves(fail);

            let result = fixture.driver.sync();
            prop_assert_eq!(
                fixture.source.requested_tokens().last().cloned().flatten(),
                committed.clone()
            );

            match result {
                Ok(report) => {
                    prop_assert!(!fail);
                    committed = Some(report.committed_token);
                }
                Err(SyncError::Persistence(_)) => prop_assert!(fail),
                Err(other) => prop_assert!(false, "unexpected error: {}", other),
            }
            prop_assert_eq!(fixture.driver.sync_token(), committed.clone());

            fixture.fail_saves(false);
            let persisted = RecordStore::with_backends(
                Box::new(fixture.archive.clone()),
                Box::new(fixture.settings.clone()),
                &StoreConfig::default(),
            )
            .unwrap();
            prop_assert_eq!(persisted.sync_token().map(str::to_string), committed.clone());
            if !fail {
                let driver_records = fixture.driver.records();
                prop_assert_eq!(persisted.records(), driver_records.as_slice());
            }
        }
    }
}

#[test]
fn first_sync_scenario() {
    let fixture = DriverFixture::new();
    fixture
        .source
        .push_page(page("T1", vec![file_item("A", "doc.txt")]));

    fixture.driver.sync().unwrap();

    let records = fixture.driver.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_name(), "doc.txt");
    assert!(records[0].is_new());
    assert_eq!(fixture.driver.sync_token().as_deref(), Some("T1"));
}

#[test]
fn foreign_folder_scenario() {
    let fixture = DriverFixture::new();
    fixture
        .source
        .push_page(page("T1", vec![file_item("A", "doc.txt")]));
    fixture.driver.sync().unwrap();

    fixture.source.push_page(page(
        "T2",
        vec![DeltaItem::file("X", "x.txt", "G", FIXED_TIME)],
    ));
    fixture.driver.sync().unwrap();

    let records = fixture.driver.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].file_id(), "A");
    assert_eq!(fixture.driver.sync_token().as_deref(), Some("T2"));
}
