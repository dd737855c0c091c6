//! Snapshot files (backups)
//!
//! A snapshot is a point-in-time copy of the document written to its own
//! file. Snapshots are never modified once written:
//! - `write_snapshot` refuses to overwrite an existing file
//! - the final name is created with a no-clobber link, so two writers racing
//!   for the same name cannot replace each other's snapshot
//!
//! ## Usage
//!
//! ```ignore
//! let path = snapshot_path("nightly", data_dir)?;   // data_dir/nightly.json
//! let info = write_snapshot(&doc, &path, true)?;
//! let restored = read_snapshot(&info.path)?;
//! ```

use crate::atomic::{publish_new, unique_temp_sibling, write_file};
use jsonkv_core::{Document, Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// File extension of snapshot files.
pub const SNAPSHOT_EXTENSION: &str = ".json";

/// Information about a written snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotInfo {
    /// Final snapshot path
    pub path: PathBuf,
    /// Number of entries captured
    pub entries: usize,
    /// File size in bytes
    pub size_bytes: u64,
}

/// Normalize a backup name to a `.json` path.
///
/// Trailing `.json` suffixes are stripped and exactly one is re-added, so
/// `"snap"`, `"snap.json"` and `"snap.json.json"` all name `snap.json`.
/// Relative names resolve against `base_dir`; absolute names are kept.
pub fn snapshot_path(name: &str, base_dir: &Path) -> Result<PathBuf> {
    let mut stem = name;
    while let Some(stripped) = stem.strip_suffix(SNAPSHOT_EXTENSION) {
        stem = stripped;
    }
    if stem.is_empty() || stem.ends_with('/') || stem.ends_with(std::path::MAIN_SEPARATOR) {
        return Err(Error::invalid_value(format!(
            "backup name '{}' has no file name",
            name
        )));
    }
    let file = PathBuf::from(format!("{}{}", stem, SNAPSHOT_EXTENSION));
    if file.is_absolute() {
        Ok(file)
    } else {
        Ok(base_dir.join(file))
    }
}

/// Write `doc` to a new snapshot file at `path`.
///
/// Fails with `BackupExists` without writing anything if `path` exists.
pub fn write_snapshot(doc: &Document, path: &Path, sync: bool) -> Result<SnapshotInfo> {
    if path.exists() {
        return Err(Error::BackupExists {
            path: path.to_path_buf(),
        });
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let bytes = doc.to_pretty_bytes()?;
    let temp = unique_temp_sibling(path, "snap");
    debug!(
        target: "jsonkv::backup",
        final_path = %path.display(),
        temp_path = %temp.display(),
        "Starting snapshot write"
    );

    if let Err(e) = write_file(&temp, &bytes, sync) {
        warn!(
            target: "jsonkv::backup",
            temp_path = %temp.display(),
            error = %e,
            "Write failed, cleaning up temp file"
        );
        let _ = fs::remove_file(&temp);
        return Err(Error::Io(e));
    }

    if !publish_new(&temp, path, sync)? {
        warn!(target: "jsonkv::backup", path = %path.display(), "Snapshot appeared while writing");
        return Err(Error::BackupExists {
            path: path.to_path_buf(),
        });
    }

    let info = SnapshotInfo {
        path: path.to_path_buf(),
        entries: doc.len(),
        size_bytes: bytes.len() as u64,
    };
    info!(
        target: "jsonkv::backup",
        path = %info.path.display(),
        entries = info.entries,
        size_bytes = info.size_bytes,
        "Snapshot written successfully"
    );
    Ok(info)
}

/// Read a snapshot file back into a document.
///
/// Fails with `BackupNotFound` if the file is missing and `CorruptDocument`
/// if it is not a JSON object.
pub fn read_snapshot(path: &Path) -> Result<Document> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::BackupNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(Error::Io(e)),
    };
    Document::parse(&bytes, path)
}
