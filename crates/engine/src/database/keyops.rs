//! Key operations
//!
//! Every operation validates its key, then runs as one critical section via
//! `Database::update` (mutations) or `Database::view` (reads). Presence is
//! always key containment: `0`, `false` and `""` are stored values like any
//! other.

use super::Database;
use jsonkv_core::{
    checked_add, checked_sub, require_number, validate_key, Document, Entry, Error, Result,
    Value, ValueKind,
};
use tracing::info;

impl Database {
    // ========== Single-key mutations ==========

    /// Insert or replace the value at `key`.
    ///
    /// # Errors
    ///
    /// * `InvalidKey` if `key` is empty
    /// * `InvalidValue` if `value` is JSON `null`
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<()> {
        validate_key(key)?;
        let value = value.into();
        if value.is_null() {
            return Err(Error::invalid_value("value must not be null"));
        }
        self.update(|doc| {
            doc.insert(key, value);
            Ok(())
        })
    }

    /// Add `amount` to the number at `key`, returning the new value.
    ///
    /// A missing key is created holding `amount`.
    ///
    /// # Errors
    ///
    /// * `InvalidValue` if `amount` is not a number
    /// * `TypeMismatch` if the stored value is not a number
    pub fn add(&self, key: &str, amount: impl Into<Value>) -> Result<Value> {
        validate_key(key)?;
        let amount = amount.into();
        let amount = require_number(&amount)?.clone();
        self.update(|doc| {
            let next = match doc.get(key) {
                None => Value::Number(amount),
                Some(Value::Number(current)) => Value::Number(checked_add(current, &amount)?),
                Some(other) => {
                    return Err(Error::type_mismatch(
                        key,
                        ValueKind::Number,
                        Some(ValueKind::of(other)),
                    ))
                }
            };
            doc.insert(key, next.clone());
            Ok(next)
        })
    }

    /// Subtract `amount` from the number at `key`, returning the new value.
    ///
    /// Unlike `add`, a missing key is an error rather than being created.
    ///
    /// # Errors
    ///
    /// * `InvalidValue` if `amount` is not a number
    /// * `KeyNotFound` if `key` is absent
    /// * `TypeMismatch` if the stored value is not a number
    pub fn subtract(&self, key: &str, amount: impl Into<Value>) -> Result<Value> {
        validate_key(key)?;
        let amount = amount.into();
        let amount = require_number(&amount)?.clone();
        self.update(|doc| {
            let next = match doc.get(key) {
                None => return Err(Error::key_not_found(key)),
                Some(Value::Number(current)) => Value::Number(checked_sub(current, &amount)?),
                Some(other) => {
                    return Err(Error::type_mismatch(
                        key,
                        ValueKind::Number,
                        Some(ValueKind::of(other)),
                    ))
                }
            };
            doc.insert(key, next.clone());
            Ok(next)
        })
    }

    /// Append every element of `values` to the array at `key`.
    ///
    /// A missing key is created holding `values`. Returns the new length.
    ///
    /// # Errors
    ///
    /// * `InvalidValue` if `values` is not an array
    /// * `TypeMismatch` if the stored value is not an array
    pub fn push(&self, key: &str, values: impl Into<Value>) -> Result<usize> {
        validate_key(key)?;
        let values = match values.into() {
            Value::Array(items) => items,
            other => {
                return Err(Error::invalid_value(format!(
                    "push expects an array, got {}",
                    ValueKind::of(&other)
                )))
            }
        };
        self.update(|doc| match doc.get_mut(key) {
            None => {
                let len = values.len();
                doc.insert(key, Value::Array(values));
                Ok(len)
            }
            Some(Value::Array(items)) => {
                items.extend(values);
                Ok(items.len())
            }
            Some(other) => Err(Error::type_mismatch(
                key,
                ValueKind::Array,
                Some(ValueKind::of(other)),
            )),
        })
    }

    /// Remove every element equal to `value` from the array at `key`.
    ///
    /// Equality is structural JSON equality. Returns how many elements were
    /// removed.
    ///
    /// # Errors
    ///
    /// * `TypeMismatch` if the key is absent or its value is not an array
    pub fn unpush(&self, key: &str, value: impl Into<Value>) -> Result<usize> {
        validate_key(key)?;
        let value = value.into();
        self.update(|doc| match doc.get_mut(key) {
            Some(Value::Array(items)) => {
                let before = items.len();
                items.retain(|item| *item != value);
                Ok(before - items.len())
            }
            other => Err(Error::type_mismatch(
                key,
                ValueKind::Array,
                other.map(|v| ValueKind::of(v)),
            )),
        })
    }

    /// Remove the entry at `key`, returning its value.
    ///
    /// # Errors
    ///
    /// * `KeyNotFound` if `key` is absent
    pub fn delete(&self, key: &str) -> Result<Value> {
        validate_key(key)?;
        self.update(|doc| doc.remove(key).ok_or_else(|| Error::key_not_found(key)))
    }

    /// Replace the whole document with `{}`.
    ///
    /// Does not read the current document, so it also resets a corrupt file.
    pub fn clear(&self) -> Result<()> {
        self.replace(&Document::new())?;
        info!(target: "jsonkv::db", path = %self.path().display(), "Cleared document");
        Ok(())
    }

    // ========== Single-key reads ==========

    /// The value stored at `key`.
    ///
    /// For display, pass the result to `jsonkv_core::render_value`.
    ///
    /// # Errors
    ///
    /// * `KeyNotFound` if `key` is absent
    pub fn get(&self, key: &str) -> Result<Value> {
        validate_key(key)?;
        self.view(|doc| doc.get(key).cloned().ok_or_else(|| Error::key_not_found(key)))
    }

    /// The value stored at `key`, or `None` if absent.
    pub fn fetch(&self, key: &str) -> Result<Option<Value>> {
        validate_key(key)?;
        self.view(|doc| Ok(doc.get(key).cloned()))
    }

    /// Kind of the value stored at `key`.
    ///
    /// # Errors
    ///
    /// * `KeyNotFound` if `key` is absent
    pub fn type_of(&self, key: &str) -> Result<ValueKind> {
        validate_key(key)?;
        self.view(|doc| {
            doc.get(key)
                .map(ValueKind::of)
                .ok_or_else(|| Error::key_not_found(key))
        })
    }

    /// True iff `key` is present, whatever its value.
    pub fn has(&self, key: &str) -> Result<bool> {
        validate_key(key)?;
        self.view(|doc| Ok(doc.contains_key(key)))
    }

    // ========== Whole-document reads ==========

    /// Entries whose key starts with `prefix`, in document order
    pub fn starts_with(&self, prefix: &str) -> Result<Vec<Entry>> {
        self.view(|doc| Ok(doc.filter_keys(|k| k.starts_with(prefix))))
    }

    /// Entries whose key ends with `suffix`, in document order
    pub fn ends_with(&self, suffix: &str) -> Result<Vec<Entry>> {
        self.view(|doc| Ok(doc.filter_keys(|k| k.ends_with(suffix))))
    }

    /// Entries whose key contains `needle`, in document order
    pub fn includes(&self, needle: &str) -> Result<Vec<Entry>> {
        self.view(|doc| Ok(doc.filter_keys(|k| k.contains(needle))))
    }

    /// The whole document
    pub fn to_json(&self) -> Result<Document> {
        self.view(|doc| Ok(doc.clone()))
    }

    /// The document as single-entry pairs, in document order
    pub fn to_array(&self) -> Result<Vec<Entry>> {
        self.view(|doc| Ok(doc.to_entries()))
    }

    /// All keys, in document order
    pub fn keys(&self) -> Result<Vec<String>> {
        self.view(|doc| Ok(doc.keys().cloned().collect()))
    }

    /// Number of entries
    pub fn len(&self) -> Result<usize> {
        self.view(|doc| Ok(doc.len()))
    }

    /// True if the document has no entries
    pub fn is_empty(&self) -> Result<bool> {
        self.view(|doc| Ok(doc.is_empty()))
    }
}
