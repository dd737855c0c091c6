//! Crash-safe file replacement helpers
//!
//! Every write in this crate follows write-fsync-rename:
//! 1. Write the full contents to a temp file next to the destination
//! 2. Sync the temp file
//! 3. Move it over (or link it to) the destination
//! 4. Sync the parent directory so the new name is durable
//!
//! The destination therefore always holds either the old contents or the new
//! contents, never a prefix of them.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// A temp path next to `path` that no other writer will pick:
/// `<name>.<tag>-<pid>-<n>.tmp`.
pub fn unique_temp_sibling(path: &Path, tag: &str) -> PathBuf {
    let n = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    with_suffix(path, &format!(".{}-{}-{}.tmp", tag, std::process::id(), n))
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("document"));
    name.push(suffix);
    path.with_file_name(name)
}

/// Create (or truncate) `path`, write `bytes` and optionally fsync.
pub fn write_file(path: &Path, bytes: &[u8], sync: bool) -> io::Result<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)?;
    file.write_all(bytes)?;
    if sync {
        file.sync_all()?;
    }
    Ok(())
}

/// Replace `dest` with `temp`.
pub fn rename_into_place(temp: &Path, dest: &Path, sync: bool) -> io::Result<()> {
    fs::rename(temp, dest)?;
    if sync {
        sync_parent_dir(dest)?;
    }
    Ok(())
}

/// Give `temp` the name `dest` only if `dest` does not exist yet.
///
/// Returns `Ok(false)` when `dest` already exists; `temp` is removed either
/// way. Uses a hard link, which fails atomically on an existing name.
///
/// Filesystems without hard links (vfat and exFAT report `EPERM`, others
/// `ENOTSUP`) fall back to an exists check plus rename. That narrows the
/// window in which a concurrent publisher could be clobbered but cannot close
/// it.
pub fn publish_new(temp: &Path, dest: &Path, sync: bool) -> io::Result<bool> {
    let linked = match fs::hard_link(temp, dest) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => Ok(false),
        Err(e) if links_unsupported(&e) => {
            debug!(target: "jsonkv::store", error = %e, "Hard link refused, publishing by rename");
            if dest.exists() {
                Ok(false)
            } else {
                fs::rename(temp, dest).map(|()| true)
            }
        }
        Err(e) => Err(e),
    };
    let _ = fs::remove_file(temp);
    let linked = linked?;
    if linked && sync {
        sync_parent_dir(dest)?;
    }
    Ok(linked)
}

/// `link(2)` failures that mean "this filesystem has no hard links" rather
/// than a real permission or I/O problem. `temp` was just written by us, so
/// `PermissionDenied` here comes from the filesystem, not from access bits.
pub(crate) fn links_unsupported(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::Unsupported | io::ErrorKind::PermissionDenied)
}

/// Fsync the directory containing `path`.
#[cfg(unix)]
pub fn sync_parent_dir(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => File::open(parent)?.sync_all(),
        _ => File::open(".")?.sync_all(),
    }
}

/// Directory handles can't be fsynced on this platform.
#[cfg(not(unix))]
pub fn sync_parent_dir(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unique_temp_siblings_differ() {
        let a = unique_temp_sibling(Path::new("db.json"), "init");
        let b = unique_temp_sibling(Path::new("db.json"), "init");
        assert_ne!(a, b);
        assert!(a.to_string_lossy().starts_with("db.json.init-"));
        assert!(a.to_string_lossy().ends_with(".tmp"));
    }

    #[test]
    fn link_refusals_that_mean_no_hard_links() {
        let eperm = io::Error::from(io::ErrorKind::PermissionDenied);
        let enotsup = io::Error::from(io::ErrorKind::Unsupported);
        let missing = io::Error::from(io::ErrorKind::NotFound);
        assert!(links_unsupported(&eperm));
        assert!(links_unsupported(&enotsup));
        assert!(!links_unsupported(&missing));
    }

    #[test]
    fn rename_replaces_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("db.json");
        let temp = unique_temp_sibling(&dest, "save");
        fs::write(&dest, "old").unwrap();
        write_file(&temp, b"new", true).unwrap();

        rename_into_place(&temp, &dest, true).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
        assert!(!temp.exists());
    }

    #[test]
    fn publish_new_refuses_existing_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("snap.json");
        fs::write(&dest, "original").unwrap();
        let temp = unique_temp_sibling(&dest, "snap");
        write_file(&temp, b"replacement", false).unwrap();

        assert!(!publish_new(&temp, &dest, false).unwrap());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "original");
        assert!(!temp.exists());
    }

    #[test]
    fn publish_new_creates_missing_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("snap.json");
        let temp = unique_temp_sibling(&dest, "snap");
        write_file(&temp, b"{}", true).unwrap();

        assert!(publish_new(&temp, &dest, true).unwrap());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "{}");
        assert!(!temp.exists());
    }
}
