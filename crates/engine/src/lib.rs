//! Store engine for jsonkv
//!
//! This crate ties the lower layers together:
//! - Database: handle with open, critical sections and lock timeouts
//! - Key operations: set/get/add/subtract/push/unpush/delete/has/type_of,
//!   key searches and whole-document reads
//! - Backup and restore
//! - StoreConfig: construction-time configuration, optionally from TOML
//!
//! The engine is the only component that knows about locking. Every
//! operation is a full load-mutate-save (or load-read) cycle; nothing is
//! cached between calls.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;

pub use database::{
    Database, StoreConfig, CONFIG_FILE_NAME, DEFAULT_DOCUMENT_PATH, DEFAULT_LOCK_TIMEOUT_MS,
};
pub use jsonkv_durability::SnapshotInfo;
