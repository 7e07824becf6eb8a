//! Generated tables checking the row-merge invariants end to end.

mod common;

use std::collections::HashMap;

use common::{KEY_HEADER, TestWorkspace, read_rows};
use proptest::prelude::*;
use ru_locfix::patch::{PatchConfig, patch_target};

const VALUE_COLUMN: usize = 2;

fn key_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        Just("K1".to_string()),
        Just(" K2".to_string()),
        Just("K3".to_string()),
        Just("K4".to_string()),
    ]
}

fn cell_strategy() -> impl Strategy<Value = String> {
    "[a-zа-я ,\"]{0,6}"
}

fn reference_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec((key_strategy(), cell_strategy()), 0..8)
}

fn target_strategy() -> impl Strategy<Value = Vec<(String, String, String)>> {
    prop::collection::vec((key_strategy(), cell_strategy(), cell_strategy()), 1..12)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn merge_touches_only_the_russian_column_and_is_idempotent(
        reference_rows in reference_strategy(),
        target_rows in target_strategy(),
    ) {
        let ws = TestWorkspace::new();
        let mut reference = vec![vec![KEY_HEADER.to_string(), "russian".to_string()]];
        reference.extend(reference_rows.iter().map(|(k, v)| vec![k.clone(), v.clone()]));
        let mut target = vec![vec![
            KEY_HEADER.to_string(),
            "english".to_string(),
            "russian".to_string(),
        ]];
        target.extend(
            target_rows
                .iter()
                .map(|(k, en, ru)| vec![k.clone(), en.clone(), ru.clone()]),
        );
        let reference_path = ws.write_rows("ref.csv", &reference);
        let target_path = ws.write_rows("loc.csv", &target);

        let mut expected_map: HashMap<String, String> = HashMap::new();
        for (key, value) in &reference_rows {
            if !key.trim().is_empty() {
                expected_map.insert(key.trim().to_string(), value.clone());
            }
        }

        let config = PatchConfig::new(&target_path, &reference_path);
        let first = patch_target(&config).expect("first run");
        let patched = read_rows(&target_path);

        prop_assert_eq!(patched.len(), target.len());
        let mut expected_missing = 0usize;
        for (before, after) in target.iter().zip(patched.iter()).skip(1) {
            prop_assert_eq!(after.len(), before.len());
            prop_assert_eq!(&after[0], &before[0]);
            prop_assert_eq!(&after[1], &before[1]);
            let key = before[0].trim();
            match expected_map.get(key) {
                Some(value) if !value.is_empty() => prop_assert_eq!(&after[VALUE_COLUMN], value),
                _ => prop_assert_eq!(&after[VALUE_COLUMN], &before[VALUE_COLUMN]),
            }
            if !key.is_empty() && !expected_map.contains_key(key) {
                expected_missing += 1;
            }
        }
        prop_assert_eq!(first.missing_keys, expected_missing);

        let second = patch_target(&config).expect("second run");
        prop_assert_eq!(second.changed_rows, 0);
        prop_assert_eq!(second.missing_keys, first.missing_keys);
        prop_assert_eq!(read_rows(&target_path), patched);
    }
}
