//! The backing file of a store
//!
//! `DocumentFile` owns one path on disk and provides the two primitives the
//! engine is built from: `load` the whole document and `save` the whole
//! document. It performs no locking; callers serialize `load`/`save` pairs.
//!
//! ## Invariant
//!
//! The backing file always contains one complete JSON object. `save` writes
//! to a temp file of its own (`<name>.save-<pid>-<n>.tmp`), syncs it, and
//! renames it over the backing file, so a crash or a concurrent reader never
//! observes a half-written document. Two writers never share a temp file, so
//! even uncoordinated writers only ever publish their own complete document.
//! If any step fails the previous file is left untouched.
//!
//! A temp file orphaned by a crashed process is never read. It is not removed
//! automatically either, since nothing distinguishes it from the temp file of
//! a writer that is still running.

use crate::atomic::{publish_new, rename_into_place, unique_temp_sibling, write_file};
use jsonkv_core::{Document, Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Handle to the backing file of a store.
#[derive(Debug, Clone)]
pub struct DocumentFile {
    path: PathBuf,
    sync: bool,
}

impl DocumentFile {
    /// Create a handle. Nothing is touched on disk until the first call.
    ///
    /// With `sync` set, every save fsyncs the file and its directory.
    pub fn new(path: impl Into<PathBuf>, sync: bool) -> Self {
        Self {
            path: path.into(),
            sync,
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the backing file containing `{}` if it does not exist.
    ///
    /// Returns `true` if this call created it. Safe to race with other
    /// callers: only one of them publishes the file.
    pub fn ensure_exists(&self) -> Result<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let temp = unique_temp_sibling(&self.path, "init");
        write_file(&temp, b"{}", self.sync)?;
        let created = publish_new(&temp, &self.path, self.sync)?;
        if created {
            info!(target: "jsonkv::store", path = %self.path.display(), "Created empty document");
        }
        Ok(created)
    }

    /// Read and parse the whole document.
    ///
    /// A missing file is first created as `{}`. Contents that are not a JSON
    /// object fail with `CorruptDocument`.
    pub fn load(&self) -> Result<Document> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                self.ensure_exists()?;
                return Ok(Document::new());
            }
            Err(e) => return Err(Error::Io(e)),
        };
        let doc = Document::parse(&bytes, &self.path)?;
        debug!(
            target: "jsonkv::store",
            path = %self.path.display(),
            entries = doc.len(),
            bytes = bytes.len(),
            "Loaded document"
        );
        Ok(doc)
    }

    /// Atomically replace the backing file with `doc`.
    pub fn save(&self, doc: &Document) -> Result<()> {
        self.stage(doc)?.commit()
    }

    /// First half of `save`: write `doc` to a fresh temp file without
    /// touching the backing file.
    ///
    /// Dropping the returned `PendingWrite` without committing discards it.
    pub fn stage(&self, doc: &Document) -> Result<PendingWrite> {
        let bytes = doc.to_pretty_bytes()?;
        let temp = unique_temp_sibling(&self.path, "save");

        if let Err(e) = write_file(&temp, &bytes, self.sync) {
            warn!(
                target: "jsonkv::store",
                temp_path = %temp.display(),
                error = %e,
                "Write failed, cleaning up temp file"
            );
            let _ = fs::remove_file(&temp);
            return Err(Error::Io(e));
        }

        Ok(PendingWrite {
            temp,
            dest: self.path.clone(),
            sync: self.sync,
            entries: doc.len(),
            bytes: bytes.len(),
            done: false,
        })
    }
}

/// A fully written temp file waiting to be renamed over the backing file.
#[derive(Debug)]
#[must_use = "a staged write does nothing until committed"]
pub struct PendingWrite {
    temp: PathBuf,
    dest: PathBuf,
    sync: bool,
    entries: usize,
    bytes: usize,
    done: bool,
}

impl PendingWrite {
    /// Path of the staged temp file
    pub fn temp_path(&self) -> &Path {
        &self.temp
    }

    /// Rename the temp file over the backing file.
    pub fn commit(mut self) -> Result<()> {
        self.done = true;
        match rename_into_place(&self.temp, &self.dest, self.sync) {
            Ok(()) => {
                debug!(
                    target: "jsonkv::store",
                    path = %self.dest.display(),
                    entries = self.entries,
                    bytes = self.bytes,
                    "Saved document"
                );
                Ok(())
            }
            Err(e) => {
                warn!(
                    target: "jsonkv::store",
                    temp_path = %self.temp.display(),
                    error = %e,
                    "Rename failed, cleaning up temp file"
                );
                let _ = fs::remove_file(&self.temp);
                Err(Error::Io(e))
            }
        }
    }

    /// Throw the staged contents away.
    pub fn abort(mut self) {
        self.done = true;
        let _ = fs::remove_file(&self.temp);
    }
}

impl Drop for PendingWrite {
    fn drop(&mut self) {
        if !self.done {
            let _ = fs::remove_file(&self.temp);
        }
    }
}
