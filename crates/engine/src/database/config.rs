//! Store configuration via `jsonkv.toml`
//!
//! A `StoreConfig` is passed to `Database::open`. It can be built in code or
//! loaded from a TOML file; relative paths inside a config file resolve
//! against the directory the file lives in.

use jsonkv_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = "jsonkv.toml";

/// Default backing file name.
pub const DEFAULT_DOCUMENT_PATH: &str = "db.json";

/// Default bound on lock acquisition, in milliseconds.
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Store configuration.
///
/// # Example
///
/// ```toml
/// # Backing document (default: "db.json")
/// path = "data/db.json"
///
/// # Max time to wait for the store lock before failing with Timeout
/// lock_timeout_ms = 5000
///
/// # fsync the document and its directory on every save
/// sync = true
///
/// # Where relative backup names go (default: next to the document)
/// # backup_dir = "backups"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the backing document.
    #[serde(default = "default_path")]
    pub path: PathBuf,
    /// Lock acquisition timeout in milliseconds.
    #[serde(default = "default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    /// fsync on every save.
    #[serde(default = "default_sync")]
    pub sync: bool,
    /// Directory for relative backup names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
}

fn default_path() -> PathBuf {
    PathBuf::from(DEFAULT_DOCUMENT_PATH)
}

fn default_lock_timeout_ms() -> u64 {
    DEFAULT_LOCK_TIMEOUT_MS
}

fn default_sync() -> bool {
    true
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_path(),
            lock_timeout_ms: default_lock_timeout_ms(),
            sync: default_sync(),
            backup_dir: None,
        }
    }
}

impl StoreConfig {
    /// Default configuration for the document at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Set the lock acquisition timeout.
    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout_ms = timeout.as_millis().min(u64::MAX as u128) as u64;
        self
    }

    /// Enable or disable fsync on save.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Set the directory relative backup names resolve against.
    pub fn with_backup_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(dir.into());
        self
    }

    /// Lock acquisition timeout.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the document path has no file name.
    pub fn validate(&self) -> Result<()> {
        let has_file_name = self
            .path
            .file_name()
            .map(|n| !n.is_empty())
            .unwrap_or(false);
        if !has_file_name {
            return Err(Error::config(format!(
                "document path '{}' does not name a file",
                self.path.display()
            )));
        }
        Ok(())
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# jsonkv store configuration
#
# Backing document (default: "db.json"), relative to this file
path = "db.json"

# Max time to wait for the store lock, in milliseconds (default: 5000)
lock_timeout_ms = 5000

# fsync the document and its directory on every save (default: true)
sync = true

# Directory for relative backup names (default: next to the document)
# backup_dir = "backups"
"#
    }

    /// Parse a config from TOML text. Paths are left as written.
    ///
    /// # Errors
    ///
    /// Returns `Config` if the text is not valid TOML for this struct.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: StoreConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// Relative `path` and `backup_dir` values resolve against the file's
    /// directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let mut config = Self::from_toml_str(&content).map_err(|e| match e {
            Error::Config { reason } => {
                Error::config(format!("{} ({})", reason, path.display()))
            }
            other => other,
        })?;
        if let Some(base) = path.parent() {
            config.path = resolve(base, &config.path);
            config.backup_dir = config.backup_dir.map(|dir| resolve(base, &dir));
        }
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    ///
    /// Returns `Ok(())` whether the file was created or already existed.
    pub fn write_default_if_missing(path: &Path) -> Result<()> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| {
                Error::config(format!(
                    "failed to write default config file '{}': {}",
                    path.display(),
                    e
                ))
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("failed to serialize config: {}", e)))?;
        std::fs::write(path, content).map_err(|e| {
            Error::config(format!(
                "failed to write config file '{}': {}",
                path.display(),
                e
            ))
        })
    }
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() || base.as_os_str().is_empty() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config() {
        let config = StoreConfig::default();
        assert_eq!(config.path, PathBuf::from("db.json"));
        assert_eq!(config.lock_timeout(), Duration::from_secs(5));
        assert!(config.sync);
        assert!(config.backup_dir.is_none());
    }

    #[test]
    fn builder_setters() {
        let config = StoreConfig::new("/tmp/x.json")
            .with_lock_timeout(Duration::from_millis(20))
            .with_sync(false)
            .with_backup_dir("/tmp/backups");
        assert_eq!(config.lock_timeout_ms, 20);
        assert!(!config.sync);
        assert_eq!(config.backup_dir, Some(PathBuf::from("/tmp/backups")));
    }

    #[test]
    fn default_toml_parses_to_default() {
        let config = StoreConfig::from_toml_str(StoreConfig::default_toml()).unwrap();
        assert_eq!(config, StoreConfig::default());
    }

    #[test]
    fn missing_fields_use_defaults() {
        let config = StoreConfig::from_toml_str("sync = false").unwrap();
        assert!(!config.sync);
        assert_eq!(config.path, PathBuf::from("db.json"));
        assert_eq!(config.lock_timeout_ms, DEFAULT_LOCK_TIMEOUT_MS);
    }

    #[test]
    fn invalid_toml_is_rejected() {
        let err = StoreConfig::from_toml_str("lock_timeout_ms = \"soon\"").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn directory_path_is_rejected() {
        let err = StoreConfig::new("/").validate().unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(StoreConfig::new("data/..").validate().is_err());
    }

    #[test]
    fn from_file_resolves_relative_paths() {
        let dir = TempDir::new().unwrap();
        let cfg_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&cfg_path, "path = \"store.json\"\nbackup_dir = \"bk\"\n").unwrap();

        let config = StoreConfig::from_file(&cfg_path).unwrap();

        assert_eq!(config.path, dir.path().join("store.json"));
        assert_eq!(config.backup_dir, Some(dir.path().join("bk")));
    }

    #[test]
    fn from_file_keeps_absolute_paths() {
        let dir = TempDir::new().unwrap();
        let cfg_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&cfg_path, "path = \"/var/lib/db.json\"\n").unwrap();
        let config = StoreConfig::from_file(&cfg_path).unwrap();
        assert_eq!(config.path, PathBuf::from("/var/lib/db.json"));
    }

    #[test]
    fn from_missing_file_fails() {
        let dir = TempDir::new().unwrap();
        let err = StoreConfig::from_file(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn write_default_if_missing_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let cfg_path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&cfg_path, "sync = false\n").unwrap();

        StoreConfig::write_default_if_missing(&cfg_path).unwrap();

        assert_eq!(std::fs::read_to_string(&cfg_path).unwrap(), "sync = false\n");
    }

    #[test]
    fn write_to_file_round_trips() {
        let dir = TempDir::new().unwrap();
        let cfg_path = dir.path().join(CONFIG_FILE_NAME);
        let config = StoreConfig::new(dir.path().join("db.json"))
            .with_lock_timeout(Duration::from_millis(750));

        config.write_to_file(&cfg_path).unwrap();

        assert_eq!(StoreConfig::from_file(&cfg_path).unwrap(), config);
    }
}
