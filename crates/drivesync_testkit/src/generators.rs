//! Property-based test generators using proptest.
//!
//! IDs are drawn from a small pool so generated batches revisit the same
//! items, and parents are mostly the tracked folder.

use crate::fixtures::TRACKED_FOLDER;
use drivesync_protocol::{DeltaItem, DeltaPage};
use proptest::prelude::*;

/// Strategy for item IDs from a small pool.
pub fn file_id_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(vec!["A", "B", "C", "D", "E", "G"]).prop_map(str::to_string)
}

/// Strategy for display names.
pub fn file_name_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9 _-]{1,16}(\\.txt)?").expect("Invalid regex")
}

/// Strategy for display timestamps.
pub fn timestamp_strategy() -> impl Strategy<Value = String> {
    (1u32..=12, 1u32..=28, 0u32..24, 0u32..60, 0u32..60).prop_map(|(mo, d, h, mi, s)| {
        format!("2016-{:02}-{:02} {:02}:{:02}:{:02}", mo, d, h, mi, s)
    })
}

/// Strategy for parent IDs: the tracked folder, another folder, or none.
pub fn parent_strategy() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        8 => Just(Some(TRACKED_FOLDER.to_string())),
        1 => Just(Some("OTHER".to_string())),
        1 => Just(None),
    ]
}

/// Strategy for a single delta item of any kind, including name-less updates.
pub fn delta_item_strategy() -> impl Strategy<Value = DeltaItem> {
    (
        file_id_strategy(),
        prop::option::weighted(0.9, file_name_strategy()),
        parent_strategy(),
        any::<bool>(),
        prop::bool::weighted(0.3),
        timestamp_strategy(),
    )
        .prop_map(|(file_id, file_name, parent_id, is_folder, is_delete, ts)| DeltaItem {
            file_id,
            file_name: if is_delete { None } else { file_name },
            parent_id,
            is_folder,
            is_delete,
            last_modified: ts,
        })
}

/// Strategy for a batch of up to `max_len` items.
pub fn delta_batch_strategy(max_len: usize) -> impl Strategy<Value = Vec<DeltaItem>> {
    prop::collection::vec(delta_item_strategy(), 0..=max_len)
}

/// Strategy for a sequence of final pages with tokens `T1`, `T2`, ...
pub fn delta_pages_strategy(
    max_pages: usize,
    max_items: usize,
) -> impl Strategy<Value = Vec<DeltaPage>> {
    prop::collection::vec(delta_batch_strategy(max_items), 1..=max_pages).prop_map(|batches| {
        batches
            .into_iter()
            .enumerate()
            .map(|(i, items)| DeltaPage::new(format!("T{}", i + 1), items))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::strategy::ValueTree;
    use proptest::test_runner::TestRunner;

    #[test]
    fn deletes_carry_no_name() {
        let mut runner = TestRunner::default();
        for _ in 0..100 {
            let item = delta_item_strategy()
                .new_tree(&mut runner)
                .unwrap()
                .current();
            if item.is_delete {
                assert!(item.file_name.is_none());
            }
        }
    }

    #[test]
    fn pages_are_numbered() {
        let mut runner = TestRunner::default();
        let pages = delta_pages_strategy(4, 3)
            .new_tree(&mut runner)
            .unwrap()
            .current();
        for (i, page) in pages.iter().enumerate() {
            assert_eq!(page.next_token, format!("T{}", i + 1));
            assert!(!page.has_more);
        }
    }
}
