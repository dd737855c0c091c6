//! Database struct and open logic
//!
//! A `Database` is a handle to one backing document. It holds no copy of the
//! document: every operation loads it, works on it, and (for mutations)
//! saves it back before returning.
//!
//! ## Critical sections
//!
//! 1. **Mutations** run under the exclusive lock: `load`, mutate, `save`.
//!    Concurrent mutations never interleave, so none is lost.
//! 2. **Reads** run under the shared lock and always see a complete document.
//!
//! Both wait at most `StoreConfig::lock_timeout` before failing with
//! `Error::Timeout`. Handles on the same path share a lock (see `registry`).
//!
//! ## Closure API
//!
//! `db.update(|doc| { ... })` runs an arbitrary mutation as one critical
//! section: the document is saved if the closure returns `Ok`, left
//! untouched if it returns `Err`. `db.view(|doc| ...)` is the read-only
//! counterpart. All key operations are built on these two.

mod backup;
pub mod config;
mod keyops;
mod registry;

pub use config::{StoreConfig, CONFIG_FILE_NAME, DEFAULT_DOCUMENT_PATH, DEFAULT_LOCK_TIMEOUT_MS};

use jsonkv_core::{Document, Error, Result};
use jsonkv_durability::DocumentFile;
use parking_lot::{RwLockReadGuard, RwLockWriteGuard};
use registry::DocumentLock;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Handle to a JSON document store.
///
/// `Database` is `Send + Sync`; share it with `Arc` or open several handles
/// on the same path, which coordinate through one process-wide lock.
///
/// # Example
///
/// ```ignore
/// use jsonkv_engine::{Database, StoreConfig};
///
/// let db = Database::open(StoreConfig::new("data/db.json"))?;
/// db.set("visits", 0)?;
/// db.add("visits", 1)?;
/// assert_eq!(db.get("visits")?, serde_json::json!(1));
/// ```
#[derive(Debug)]
pub struct Database {
    file: DocumentFile,
    lock: DocumentLock,
    config: StoreConfig,
    backup_dir: PathBuf,
}

impl Database {
    /// Open (creating if necessary) the document described by `config`.
    ///
    /// A missing backing file is created containing `{}`. The contents of an
    /// existing file are not validated here; a corrupt document is reported
    /// by the first operation that reads it (and `clear` can replace it).
    ///
    /// # Errors
    ///
    /// * `Config` if the path does not name a file
    /// * `Io` if the parent directory or the file cannot be created
    /// * `Timeout` if another handle holds the lock for too long
    pub fn open(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        let path = canonical_document_path(&config.path)?;
        let lock = registry::lock_for(&path);
        let file = DocumentFile::new(&path, config.sync);

        {
            let _guard = lock
                .try_write_for(config.lock_timeout())
                .ok_or(Error::Timeout {
                    operation: "write",
                    waited: config.lock_timeout(),
                })?;
            file.ensure_exists()?;
        }

        let backup_dir = match &config.backup_dir {
            Some(dir) => dir.clone(),
            None => path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from(".")),
        };

        info!(
            target: "jsonkv::db",
            path = %path.display(),
            lock_timeout_ms = config.lock_timeout_ms,
            sync = config.sync,
            "Opened document store"
        );

        Ok(Self {
            file,
            lock,
            config,
            backup_dir,
        })
    }

    /// Open the document at `path` with default settings.
    pub fn open_path(path: impl Into<PathBuf>) -> Result<Self> {
        Self::open(StoreConfig::new(path))
    }

    /// Canonical path of the backing document
    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Configuration this handle was opened with
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Directory relative backup names resolve against
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Run `f` as one mutation critical section.
    ///
    /// Loads the document under the exclusive lock, hands it to `f`, and
    /// saves it if `f` succeeds. On error nothing is written.
    pub fn update<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Document) -> Result<T>,
    {
        let _guard = self.write_lock()?;
        let mut doc = self.file.load()?;
        let out = f(&mut doc)?;
        self.file.save(&doc)?;
        Ok(out)
    }

    /// Run `f` against a consistent snapshot of the document.
    pub fn view<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Document) -> Result<T>,
    {
        let _guard = self.read_lock()?;
        let doc = self.file.load()?;
        f(&doc)
    }

    /// Replace the whole document without reading the current one.
    ///
    /// Used by `clear` and `restore`, which must work even when the current
    /// file is corrupt.
    pub(crate) fn replace(&self, doc: &Document) -> Result<()> {
        let _guard = self.write_lock()?;
        self.file.save(doc)
    }

    fn write_lock(&self) -> Result<RwLockWriteGuard<'_, ()>> {
        let timeout = self.config.lock_timeout();
        self.lock.try_write_for(timeout).ok_or_else(|| {
            debug!(target: "jsonkv::db", path = %self.path().display(), "Write lock timed out");
            Error::Timeout {
                operation: "write",
                waited: timeout,
            }
        })
    }

    fn read_lock(&self) -> Result<RwLockReadGuard<'_, ()>> {
        let timeout = self.config.lock_timeout();
        self.lock.try_read_for(timeout).ok_or_else(|| {
            debug!(target: "jsonkv::db", path = %self.path().display(), "Read lock timed out");
            Error::Timeout {
                operation: "read",
                waited: timeout,
            }
        })
    }
}

/// Absolute, symlink-free path for `path`, creating its parent directory.
///
/// Only the parent is canonicalized because the file may not exist yet.
fn canonical_document_path(path: &Path) -> Result<PathBuf> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&parent)?;
    let parent = parent.canonicalize()?;
    let name = path
        .file_name()
        .ok_or_else(|| Error::config(format!("'{}' does not name a file", path.display())))?;
    Ok(parent.join(name))
}
