//! Property-based tests for the key operations.

use jsonkv_engine::{Database, StoreConfig};
use proptest::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;

fn open_temp() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let db = Database::open(StoreConfig::new(dir.path().join("db.json")).with_sync(false)).unwrap();
    (dir, db)
}

/// Non-null JSON values, nested a few levels deep
fn json_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        (-1.0e9f64..1.0e9).prop_map(Value::from),
        "[a-z0-9 ]{0,12}".prop_map(Value::from),
    ];
    leaf.prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn set_then_get_returns_same_value(key in "[a-zA-Z0-9:_.-]{1,16}", value in json_value()) {
        let (_dir, db) = open_temp();
        db.set(&key, value.clone()).unwrap();
        prop_assert_eq!(db.get(&key).unwrap(), value);
    }

    #[test]
    fn integer_adds_sum(a in -1_000_000i64..1_000_000, b in -1_000_000i64..1_000_000) {
        let (_dir, db) = open_temp();
        db.add("n", a).unwrap();
        db.add("n", b).unwrap();
        prop_assert_eq!(db.get("n").unwrap(), json!(a + b));
    }

    #[test]
    fn add_then_subtract_restores(start in -1_000i64..1_000, delta in -1_000i64..1_000) {
        let (_dir, db) = open_temp();
        db.set("n", start).unwrap();
        db.add("n", delta).unwrap();
        db.subtract("n", delta).unwrap();
        prop_assert_eq!(db.get("n").unwrap(), json!(start));
    }

    #[test]
    fn search_partitions_keys(keys in prop::collection::btree_set("[ab]{1,4}", 1..8)) {
        let (_dir, db) = open_temp();
        for k in &keys {
            db.set(k, 1).unwrap();
        }
        let with_a = db.starts_with("a").unwrap().len();
        let with_b = db.starts_with("b").unwrap().len();
        prop_assert_eq!(with_a + with_b, keys.len());
        prop_assert_eq!(db.includes("").unwrap().len(), keys.len());
    }
}
