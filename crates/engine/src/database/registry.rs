//! Process-wide lock registry
//!
//! Every `Database` handle opened on the same document path shares one
//! `RwLock`, so independent handles in one process still serialize their
//! read-modify-write cycles against each other. Entries are weak and vanish
//! once the last handle for a path is dropped.
//!
//! Uses parking_lot::Mutex instead of std::sync::Mutex to avoid cascading
//! panics from mutex poisoning.

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};

/// Lock guarding one document
pub type DocumentLock = Arc<RwLock<()>>;

/// Global registry of document locks (canonical path -> weak lock)
static DOCUMENT_LOCKS: Lazy<Mutex<HashMap<PathBuf, Weak<RwLock<()>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Get the lock for `path`, creating it if no live handle holds one.
///
/// `path` must already be canonical so that aliases of one file map to one
/// lock.
pub fn lock_for(path: &Path) -> DocumentLock {
    let mut locks = DOCUMENT_LOCKS.lock();
    if let Some(lock) = locks.get(path).and_then(Weak::upgrade) {
        return lock;
    }
    locks.retain(|_, weak| weak.strong_count() > 0);
    let lock = Arc::new(RwLock::new(()));
    locks.insert(path.to_path_buf(), Arc::downgrade(&lock));
    lock
}
