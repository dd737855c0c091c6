//! Durability layer for jsonkv
//!
//! This crate handles everything that touches disk:
//!
//! - DocumentFile: atomic load/save of the backing file
//! - Snapshots: no-clobber backup files and reading them back
//! - Crash-safe write helpers (write, fsync, rename, directory fsync)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod atomic; // write-fsync-rename helpers
pub mod document_file; // Backing file load/save
pub mod snapshot; // Backup snapshots

pub use document_file::{DocumentFile, PendingWrite};
pub use snapshot::{read_snapshot, snapshot_path, write_snapshot, SnapshotInfo, SNAPSHOT_EXTENSION};
