//! Document and Entry types
//!
//! A `Document` is the full JSON object held in the backing file: the whole
//! state of the store. It is always loaded and saved as one unit.
//!
//! Iteration order follows the order keys appear in the file (serde_json is
//! built with `preserve_order`), which keeps search results and `to_array`
//! output stable across calls.

use crate::error::{Error, Result};
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value};
use std::path::Path;

/// Indentation used for the backing file and snapshots.
pub const INDENT: &[u8] = b"    ";

/// The full key-value mapping persisted in one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    entries: Map<String, Value>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a document from raw file contents.
    ///
    /// The contents must be a single JSON object. `path` is only used for
    /// error reporting.
    pub fn parse(bytes: &[u8], path: &Path) -> Result<Self> {
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| Error::corrupt(path, e.to_string()))?;
        match value {
            Value::Object(entries) => Ok(Self { entries }),
            other => Err(Error::corrupt(
                path,
                format!(
                    "top-level value must be an object, got {}",
                    crate::value::ValueKind::of(&other)
                ),
            )),
        }
    }

    /// Serialize with 4-space indentation
    pub fn to_pretty_bytes(&self) -> Result<Vec<u8>> {
        pretty_bytes(&self.entries)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key presence. Falsy values (`0`, `false`, `""`) are present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Look up a value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Mutable lookup
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Insert or replace, returning the previous value
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    /// Remove an entry without disturbing the order of the others
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Iterate entries in document order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }

    /// Keys in document order
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// The document as a sequence of single-entry pairs
    pub fn to_entries(&self) -> Vec<Entry> {
        self.iter()
            .map(|(k, v)| Entry::new(k.clone(), v.clone()))
            .collect()
    }

    /// Entries whose key satisfies `pred`, in document order
    pub fn filter_keys<F>(&self, mut pred: F) -> Vec<Entry>
    where
        F: FnMut(&str) -> bool,
    {
        self.iter()
            .filter(|(k, _)| pred(k.as_str()))
            .map(|(k, v)| Entry::new(k.clone(), v.clone()))
            .collect()
    }

    /// Borrow the underlying JSON map
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.entries
    }

    /// Consume into the underlying JSON map
    pub fn into_map(self) -> Map<String, Value> {
        self.entries
    }
}

impl From<Map<String, Value>> for Document {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Object(doc.entries)
    }
}

/// One key/value pair of a document.
///
/// Serializes as a single-key object, `{"key": value}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    /// Entry key
    pub key: String,
    /// Entry value
    pub value: Value,
}

impl Entry {
    /// Create an entry
    pub fn new(key: impl Into<String>, value: Value) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.key, &self.value)?;
        map.end()
    }
}

/// Serialize any value with 4-space indentation.
pub fn pretty_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(INDENT);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| Error::invalid_value(format!("cannot serialize: {}", e)))?;
    Ok(buf)
}

/// Pretty-print a JSON value with 4-space indentation.
pub fn to_pretty_json(value: &Value) -> String {
    match pretty_bytes(value) {
        Ok(bytes) => String::from_utf8_lossy(&bytes).into_owned(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => Document::from(map),
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn parse_accepts_objects() {
        let d = Document::parse(br#"{"a": 1, "b": [true]}"#, Path::new("db.json")).unwrap();
        assert_eq!(d.len(), 2);
        assert_eq!(d.get("b"), Some(&json!([true])));
    }

    #[test]
    fn parse_accepts_empty_object() {
        let d = Document::parse(b"{}", Path::new("db.json")).unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn parse_rejects_invalid_json() {
        let err = Document::parse(b"{\"a\": ", Path::new("db.json")).unwrap_err();
        assert!(matches!(err, Error::CorruptDocument { .. }));
    }

    #[test]
    fn parse_rejects_non_objects() {
        let err = Document::parse(b"[1, 2, 3]", Path::new("db.json")).unwrap_err();
        match err {
            Error::CorruptDocument { reason, .. } => assert!(reason.contains("array")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn falsy_values_are_present() {
        let d = doc(json!({"zero": 0, "no": false, "empty": ""}));
        assert!(d.contains_key("zero"));
        assert!(d.contains_key("no"));
        assert!(d.contains_key("empty"));
        assert!(!d.contains_key("missing"));
    }

    #[test]
    fn remove_preserves_order() {
        let mut d = doc(json!({"a": 1, "b": 2, "c": 3, "d": 4}));
        d.remove("b");
        let keys: Vec<_> = d.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c", "d"]);
    }

    #[test]
    fn filter_keys_in_document_order() {
        let d = doc(json!({"user:2": "b", "post:1": "x", "user:1": "a"}));
        let users = d.filter_keys(|k| k.starts_with("user:"));
        assert_eq!(
            users,
            vec![Entry::new("user:2", json!("b")), Entry::new("user:1", json!("a"))]
        );
    }

    #[test]
    fn entry_serializes_as_single_key_object() {
        let e = Entry::new("k", json!([1, 2]));
        assert_eq!(serde_json::to_value(&e).unwrap(), json!({"k": [1, 2]}));
    }

    #[test]
    fn pretty_bytes_use_four_spaces() {
        let d = doc(json!({"a": {"b": 1}}));
        let text = String::from_utf8(d.to_pretty_bytes().unwrap()).unwrap();
        assert_eq!(text, "{\n    \"a\": {\n        \"b\": 1\n    }\n}");
    }

    #[test]
    fn empty_document_serializes_as_braces() {
        let text = String::from_utf8(Document::new().to_pretty_bytes().unwrap()).unwrap();
        assert_eq!(text, "{}");
    }
}
