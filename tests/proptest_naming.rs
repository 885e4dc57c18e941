//! Property-based tests for cache-key derivation.

use std::collections::BTreeMap;

use memostore::prelude::*;
use proptest::prelude::*;

fn arg_value() -> impl Strategy<Value = ArgValue> {
    prop_oneof![
        any::<bool>().prop_map(ArgValue::from),
        any::<i64>().prop_map(ArgValue::from),
        "[a-z0-9]{0,12}".prop_map(ArgValue::from),
        proptest::collection::vec(any::<i64>(), 0..4).prop_map(ArgValue::from),
    ]
}

fn arg_entries() -> impl Strategy<Value = Vec<(String, ArgValue)>> {
    proptest::collection::btree_map("[a-z][a-z_]{0,9}", arg_value(), 0..6)
        .prop_map(|map| map.into_iter().collect())
}

fn named(base: &str) -> Namer {
    let mut namer = Namer::new();
    namer.configure_name(base);
    namer
}

proptest! {
    #[test]
    fn derivation_is_deterministic(base in "[a-z]{1,12}", entries in arg_entries()) {
        let namer = named(&base);
        let args: BTreeMap<String, ArgValue> = entries.into_iter().collect();

        prop_assert_eq!(
            namer.name_for_args(&args).unwrap(),
            namer.name_for_args(&args).unwrap()
        );
    }

    #[test]
    fn insertion_order_never_changes_the_key(base in "[a-z]{1,12}", entries in arg_entries()) {
        let namer = named(&base);

        let forward: BTreeMap<String, ArgValue> = entries.iter().cloned().collect();
        let backward: BTreeMap<String, ArgValue> = entries.into_iter().rev().collect();

        prop_assert_eq!(
            namer.name_for_args(&forward).unwrap(),
            namer.name_for_args(&backward).unwrap()
        );
    }

    #[test]
    fn keys_never_exceed_the_configured_maximum(
        base in "[a-z]{1,12}",
        entries in arg_entries(),
        max_length in 16usize..200,
    ) {
        let namer = named(&base).with_max_length(max_length);
        let args: BTreeMap<String, ArgValue> = entries.into_iter().collect();

        let name = namer.name_for_args(&args).unwrap();
        prop_assert!(name.len() <= max_length);
    }

    #[test]
    fn abbreviated_keys_end_in_a_fixed_width_digest(
        base in "[a-z]{1,12}",
        entries in arg_entries(),
    ) {
        // Generous length cap so no generated key degrades away its suffix.
        let namer = named(&base).with_abbreviation(true).with_max_length(4096);
        let args: BTreeMap<String, ArgValue> = entries.into_iter().collect();

        let name = namer.name_for_args(&args).unwrap();
        let suffix = name.rsplit('.').next().unwrap();
        prop_assert_eq!(suffix.len(), 4);
        prop_assert!(suffix.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn keys_always_start_with_the_base_name(
        base in "[a-z]{1,12}",
        entries in arg_entries(),
    ) {
        // Short bases keep their prefix even through length degradation.
        let namer = named(&base);
        let args: BTreeMap<String, ArgValue> = entries.into_iter().collect();

        let name = namer.name_for_args(&args).unwrap();
        prop_assert!(name.starts_with(&base));
    }
}
