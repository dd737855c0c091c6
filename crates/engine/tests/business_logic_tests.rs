//! End-to-end behaviour of the store through the public API, including
//! persistence across handles and the on-disk format.

use jsonkv_core::{render_value, Entry, Error, ValueKind};
use jsonkv_engine::{Database, StoreConfig};
use serde_json::{json, Value};
use std::fs;
use tempfile::TempDir;

fn config(dir: &TempDir) -> StoreConfig {
    StoreConfig::new(dir.path().join("db.json")).with_sync(false)
}

#[test]
fn test_set_then_get_returns_equal_value() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    let values = vec![
        json!("text"),
        json!(42),
        json!(-3.5),
        json!(true),
        json!(false),
        json!([1, "two", [3], {"four": 4}]),
        json!({"nested": {"deep": [null, 1]}}),
    ];

    for (i, v) in values.iter().enumerate() {
        let key = format!("k{}", i);
        db.set(&key, v.clone()).unwrap();
        assert_eq!(&db.get(&key).unwrap(), v);
    }
}

#[test]
fn test_add_twice_on_fresh_key() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.add("n", 7).unwrap();
    db.add("n", 35).unwrap();
    assert_eq!(db.get("n").unwrap(), json!(42));
}

#[test]
fn test_push_then_unpush() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.push("k", json!(["a", "b"])).unwrap();
    db.unpush("k", "a").unwrap();
    assert_eq!(db.get("k").unwrap(), json!(["b"]));
}

#[test]
fn test_delete_then_get() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("k", "v").unwrap();
    db.delete("k").unwrap();
    assert!(matches!(db.get("k"), Err(Error::KeyNotFound { .. })));
    assert!(matches!(db.delete("k"), Err(Error::KeyNotFound { .. })));
}

#[test]
fn test_clear_then_to_json() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("a", 1).unwrap();
    db.clear().unwrap();
    assert!(db.to_json().unwrap().is_empty());
    assert_eq!(fs::read_to_string(db.path()).unwrap(), "{}");
}

#[test]
fn test_backup_twice() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("v", 1).unwrap();
    let snapshot_doc = db.to_json().unwrap();

    let info = db.backup("snap").unwrap();
    db.set("v", 2).unwrap();
    assert!(matches!(db.backup("snap"), Err(Error::BackupExists { .. })));

    let on_disk: Value = serde_json::from_slice(&fs::read(&info.path).unwrap()).unwrap();
    assert_eq!(on_disk, Value::from(snapshot_doc));
}

#[test]
fn test_state_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    {
        let db = Database::open(config(&temp_dir)).unwrap();
        db.set("name", "alice").unwrap();
        db.push("tags", json!(["a"])).unwrap();
        db.add("visits", 3).unwrap();
    }

    let db = Database::open(config(&temp_dir)).unwrap();
    assert_eq!(db.get("name").unwrap(), json!("alice"));
    assert_eq!(db.get("tags").unwrap(), json!(["a"]));
    assert_eq!(db.get("visits").unwrap(), json!(3));
}

#[test]
fn test_independent_stores_in_one_process() {
    let temp_dir = TempDir::new().unwrap();
    let open = |name: &str| {
        Database::open(StoreConfig::new(temp_dir.path().join(name)).with_sync(false)).unwrap()
    };
    let a = open("a.json");
    let b = open("b.json");

    a.set("k", "from a").unwrap();
    b.set("k", "from b").unwrap();

    assert_eq!(a.get("k").unwrap(), json!("from a"));
    assert_eq!(b.get("k").unwrap(), json!("from b"));
}

#[test]
fn test_external_edits_are_seen() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("a", 1).unwrap();

    fs::write(db.path(), r#"{"a": 2, "b": null}"#).unwrap();

    assert_eq!(db.get("a").unwrap(), json!(2));
    assert_eq!(db.type_of("b").unwrap(), ValueKind::Null);
}

#[test]
fn test_externally_deleted_file_is_recreated() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("a", 1).unwrap();
    fs::remove_file(db.path()).unwrap();

    assert!(!db.has("a").unwrap());
    assert_eq!(fs::read_to_string(db.path()).unwrap(), "{}");
    db.set("b", 2).unwrap();
    assert_eq!(db.keys().unwrap(), vec!["b"]);
}

#[test]
fn test_corrupt_document_is_reported_not_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    fs::write(db.path(), "[1, 2, 3]").unwrap();

    assert!(matches!(db.set("a", 1), Err(Error::CorruptDocument { .. })));
    assert!(matches!(db.to_array(), Err(Error::CorruptDocument { .. })));
    assert_eq!(fs::read_to_string(db.path()).unwrap(), "[1, 2, 3]");
}

#[test]
fn test_file_is_pretty_printed() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("list", json!([1])).unwrap();
    assert_eq!(
        fs::read_to_string(db.path()).unwrap(),
        "{\n    \"list\": [\n        1\n    ]\n}"
    );
}

#[test]
fn test_get_is_type_stable_and_rendering_is_separate() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("obj", json!({"a": [1, 2]})).unwrap();
    db.set("num", 5).unwrap();

    let obj = db.get("obj").unwrap();
    assert!(obj.is_object());
    assert_eq!(render_value(&obj), "{\n    \"a\": [\n        1,\n        2\n    ]\n}");
    assert_eq!(render_value(&db.get("num").unwrap()), "5");
}

#[test]
fn test_search_results_serialize_as_pairs() {
    let temp_dir = TempDir::new().unwrap();
    let db = Database::open(config(&temp_dir)).unwrap();
    db.set("cfg.color", "red").unwrap();
    db.set("cfg.size", 3).unwrap();
    db.set("user", "x").unwrap();

    let found: Vec<Entry> = db.starts_with("cfg.").unwrap();
    assert_eq!(
        serde_json::to_value(&found).unwrap(),
        json!([{"cfg.color": "red"}, {"cfg.size": 3}])
    );
}

#[test]
fn test_config_file_drives_open() {
    let temp_dir = TempDir::new().unwrap();
    let cfg_path = temp_dir.path().join("jsonkv.toml");
    fs::write(&cfg_path, "path = \"data/store.json\"\nsync = false\n").unwrap();

    let db = Database::open(StoreConfig::from_file(&cfg_path).unwrap()).unwrap();
    db.set("k", 1).unwrap();

    assert!(temp_dir.path().join("data/store.json").exists());
}
