//! Backup and restore
//!
//! `backup` copies the current document into a new snapshot file under the
//! shared lock, so the copy is a consistent point-in-time state. `restore`
//! replaces the live document with a snapshot under the exclusive lock.
//! Snapshot files are never written to after creation.

use super::Database;
use jsonkv_core::Result;
use jsonkv_durability::{read_snapshot, snapshot_path, write_snapshot, SnapshotInfo};
use std::path::PathBuf;
use tracing::info;

impl Database {
    /// Where `backup(name)` / `restore(name)` would put / look for `name`.
    pub fn snapshot_path(&self, name: &str) -> Result<PathBuf> {
        snapshot_path(name, self.backup_dir())
    }

    /// Write the current document to a new snapshot named `name`.
    ///
    /// `name` gets a `.json` extension and relative names are placed in the
    /// backup directory.
    ///
    /// # Errors
    ///
    /// * `BackupExists` if the snapshot file already exists (nothing is written)
    /// * `CorruptDocument` if the live document cannot be read
    pub fn backup(&self, name: &str) -> Result<SnapshotInfo> {
        let path = self.snapshot_path(name)?;
        let sync = self.config().sync;
        self.view(|doc| write_snapshot(doc, &path, sync))
    }

    /// Replace the live document with the snapshot named `name`.
    ///
    /// Returns the number of restored entries. The snapshot file itself is
    /// left as it is.
    ///
    /// # Errors
    ///
    /// * `BackupNotFound` if there is no such snapshot
    /// * `CorruptDocument` if the snapshot is not a JSON object
    pub fn restore(&self, name: &str) -> Result<usize> {
        let path = self.snapshot_path(name)?;
        let doc = read_snapshot(&path)?;
        self.replace(&doc)?;
        info!(
            target: "jsonkv::backup",
            snapshot = %path.display(),
            entries = doc.len(),
            "Restored document from snapshot"
        );
        Ok(doc.len())
    }
}
