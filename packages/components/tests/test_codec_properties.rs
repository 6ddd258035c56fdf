use folio_components::{decode, encode, migrate, read_version, PropertyBag, Registry};
use proptest::prelude::*;

fn value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        any::<String>(),
        "[a-z \n\r\t\"'<>&%;#=]{0,24}",
        "(标题|✦|🧧|%7B|%%|\\\\|\n\n){0,6}",
    ]
}

fn props() -> impl Strategy<Value = PropertyBag> {
    prop::collection::btree_map(prop_oneof!["[a-zA-Z_]{1,10}", any::<String>()], value(), 0..8)
}

fn versioned_props() -> impl Strategy<Value = PropertyBag> {
    let version = prop_oneof![
        Just(String::new()),
        (0u32..6).prop_map(|v| v.to_string()),
        "-?[0-9]{1,3}(\\.[0-9])?",
        any::<String>(),
    ];
    (props(), prop::option::of(version)).prop_map(|(mut bag, version)| {
        if let Some(v) = version {
            bag.insert("_v".to_string(), v);
        }
        bag
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn encoded_values_decode_unchanged(values in props()) {
        let encoded = encode(&values);
        prop_assert!(encoded.bytes().all(|b| b.is_ascii_alphanumeric() || b"-_.~%".contains(&b)));
        prop_assert_eq!(decode(&encoded), Some(values));
    }

    #[test]
    fn encoded_values_survive_attribute_escaping(values in props()) {
        let encoded = encode(&values);
        let escaped = folio_parser::escape_attr(&encoded);
        prop_assert_eq!(decode(&escaped), Some(values));
    }

    #[test]
    fn decode_never_panics(raw in any::<String>()) {
        let _ = decode(&raw);
    }

    #[test]
    fn migration_is_idempotent(props in versioned_props(), target in 0u32..5) {
        for def in Registry::builtin().list() {
            let once = migrate(&def.id, &props, target);
            prop_assert_eq!(read_version(&once), i64::from(target));
            prop_assert_eq!(migrate(&def.id, &once, target), once);
        }
    }

    #[test]
    fn unknown_keys_survive_migration(props in versioned_props()) {
        let migrated = migrate("titlebarH2", &props, 1);
        for (key, value) in props.iter().filter(|(k, _)| k.as_str() != "_v") {
            prop_assert_eq!(migrated.get(key), Some(value));
        }
    }
}
