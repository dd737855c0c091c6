//! jsonkv - single-file JSON document key-value store
//!
//! jsonkv keeps a flat mapping from string keys to JSON values in one file.
//! Every operation reads the whole document, applies its change and writes
//! the whole document back atomically (temp file + rename), under a
//! process-wide lock so concurrent callers never lose updates.
//!
//! # Quick Start
//!
//! ```ignore
//! use jsonkv::{Database, StoreConfig};
//! use serde_json::json;
//!
//! let db = Database::open(StoreConfig::new("db.json"))?;
//!
//! db.set("user:1", json!({"name": "Alice"}))?;
//! db.add("visits", 1)?;
//! db.push("tags", json!(["rust", "json"]))?;
//!
//! let users = db.starts_with("user:")?;
//! db.backup("before-migration")?;
//! ```
//!
//! # Architecture
//!
//! - `jsonkv-core`: document, entry and value types, errors
//! - `jsonkv-durability`: atomic file writes and snapshots
//! - `jsonkv-engine`: locking, key operations, backup/restore, config

pub use jsonkv_core::{render_value, Document, Entry, Error, Result, Value, ValueKind};
pub use jsonkv_durability::{snapshot_path, SnapshotInfo};
pub use jsonkv_engine::{Database, StoreConfig, CONFIG_FILE_NAME, DEFAULT_DOCUMENT_PATH};
