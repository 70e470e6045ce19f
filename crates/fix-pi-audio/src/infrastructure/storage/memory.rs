//! In-memory [`ConfigStore`] for unit and integration tests.
//!
//! # Why an in-memory store?
//!
//! The real store edits `/boot/firmware/config.txt`, which:
//!
//! - Needs root to write.
//! - Would change how the test machine boots.
//! - Cannot easily be made to fail halfway through a write.
//!
//! `MemoryConfigStore` keeps every "file" in a `Mutex<BTreeMap<PathBuf, _>>`
//! and exposes switches that make individual operations fail, so error paths
//! in the manager can be driven from tests.
//!
//! # Usage in tests
//!
//! ```ignore
//! let store = Arc::new(MemoryConfigStore::new("/boot/firmware/config.txt", b"dtoverlay=vc4-kms-v3d\n"));
//! let manager = ConfigOverlayManager::new(store.clone(), clock, DirectivePair::default());
//!
//! store.fail_backups(true);
//! assert!(manager.fix().is_err());
//! assert_eq!(store.replace_count(), 0);
//! ```

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use bootcfg_core::BackupId;

use crate::application::overlay_manager::ConfigStore;

#[derive(Debug, Default)]
struct State {
    files: BTreeMap<PathBuf, Vec<u8>>,
    fail_backups: bool,
    fail_listing: bool,
    fail_backup_reads: bool,
    /// When set, `replace_config` stages this many bytes and then fails.
    fail_replace_after: Option<usize>,
    /// Bytes staged by the last torn replace; never visible as the config.
    staged: Vec<u8>,
    replaces: usize,
}

/// A config store that keeps every file in memory.
#[derive(Debug)]
pub struct MemoryConfigStore {
    config_path: PathBuf,
    backup_dir: PathBuf,
    state: Mutex<State>,
}

impl MemoryConfigStore {
    /// Creates a store whose config at `config_path` holds `contents`.
    pub fn new(config_path: impl Into<PathBuf>, contents: &[u8]) -> Self {
        let config_path = config_path.into();
        let backup_dir = config_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let mut state = State::default();
        state.files.insert(config_path.clone(), contents.to_vec());
        Self {
            config_path,
            backup_dir,
            state: Mutex::new(state),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Current config contents, lossily decoded.
    pub fn config_text(&self) -> String {
        self.state()
            .files
            .get(&self.config_path)
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }

    /// Deletes the config so reads fail with `NotFound`.
    pub fn remove_config(&self) {
        let path = self.config_path.clone();
        self.state().files.remove(&path);
    }

    /// Adds a file.  Relative names land in the backup directory.
    pub fn add_entry(&self, name: &str, contents: &[u8]) {
        let path = self.resolve_backup(name);
        self.state().files.insert(path, contents.to_vec());
    }

    /// Contents of the file at `path`, if any.
    pub fn backup(&self, path: &Path) -> Option<Vec<u8>> {
        self.state().files.get(path).cloned()
    }

    /// Number of well-formed backups of this config.
    pub fn backup_count(&self) -> usize {
        let config_name = self
            .config_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.list_entries()
            .unwrap_or_default()
            .iter()
            .filter(|name| BackupId::parse_for(name, &config_name).is_ok())
            .count()
    }

    /// Number of successful `replace_config` calls.
    pub fn replace_count(&self) -> usize {
        self.state().replaces
    }

    /// Makes every `write_backup` fail with `PermissionDenied`.
    pub fn fail_backups(&self, fail: bool) {
        self.state().fail_backups = fail;
    }

    /// Makes `list_entries` fail with `PermissionDenied`.
    pub fn fail_listing(&self, fail: bool) {
        self.state().fail_listing = fail;
    }

    /// Makes every `read_backup` of an existing file fail with
    /// `PermissionDenied`.
    pub fn fail_backup_reads(&self, fail: bool) {
        self.state().fail_backup_reads = fail;
    }

    /// Makes the next `replace_config` stage `bytes` bytes and then fail, as
    /// a disk filling up mid-write would.  The config is left untouched.
    pub fn fail_replace_after(&self, bytes: usize) {
        self.state().fail_replace_after = Some(bytes);
    }

    /// Bytes staged by the last failed replace.
    pub fn staged_bytes(&self) -> Vec<u8> {
        self.state().staged.clone()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn backup_dir(&self) -> PathBuf {
        self.backup_dir.clone()
    }

    fn read_config(&self) -> io::Result<Vec<u8>> {
        self.state()
            .files
            .get(&self.config_path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn replace_config(&self, contents: &[u8]) -> io::Result<()> {
        let mut state = self.state();
        if let Some(limit) = state.fail_replace_after.take() {
            state.staged = contents[..limit.min(contents.len())].to_vec();
            return Err(io::Error::new(io::ErrorKind::Other, "no space left on device"));
        }
        state.files.insert(self.config_path.clone(), contents.to_vec());
        state.replaces += 1;
        Ok(())
    }

    fn write_backup(&self, id: &BackupId, contents: &[u8]) -> io::Result<PathBuf> {
        let mut state = self.state();
        if state.fail_backups {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only file system"));
        }
        let path = self.backup_dir.join(id.file_name());
        if state.files.contains_key(&path) {
            return Err(io::Error::new(io::ErrorKind::AlreadyExists, "file exists"));
        }
        state.files.insert(path.clone(), contents.to_vec());
        Ok(path)
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        let state = self.state();
        if state.fail_listing {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        Ok(state
            .files
            .keys()
            .filter(|p| p.parent() == Some(self.backup_dir.as_path()))
            .filter_map(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .collect())
    }

    fn resolve_backup(&self, reference: &str) -> PathBuf {
        let candidate = Path::new(reference);
        if candidate.is_absolute() || candidate.components().count() > 1 {
            candidate.to_path_buf()
        } else {
            self.backup_dir.join(candidate)
        }
    }

    fn read_backup(&self, location: &Path) -> io::Result<Vec<u8>> {
        let state = self.state();
        let contents = state
            .files
            .get(location)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))?;
        if state.fail_backup_reads {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        Ok(contents.clone())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
