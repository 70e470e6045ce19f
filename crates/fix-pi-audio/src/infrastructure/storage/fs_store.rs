//! File-system [`ConfigStore`] for the real boot partition.
//!
//! Backups live next to the config file, named
//! `<config file name>.backup.<YYYYMMDDHHMMSS>`.
//!
//! # Atomic replacement
//!
//! [`FsConfigStore::replace_config`] never writes into the config file
//! directly.  It writes a temporary file in the same directory, flushes it to
//! disk, then renames it over the config.  A rename within one directory is
//! atomic, so a reader (or the firmware after a power cut) sees either the old
//! contents or the new ones, never a mix.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use bootcfg_core::BackupId;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::application::overlay_manager::ConfigStore;

/// Boot config on a local file system.
#[derive(Debug, Clone)]
pub struct FsConfigStore {
    config_path: PathBuf,
    backup_dir: PathBuf,
}

impl FsConfigStore {
    /// Creates a store for `config_path`; backups go in the same directory.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        let config_path = config_path.into();
        let backup_dir = match config_path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Self {
            config_path,
            backup_dir,
        }
    }
}

impl ConfigStore for FsConfigStore {
    fn config_path(&self) -> &Path {
        &self.config_path
    }

    fn backup_dir(&self) -> PathBuf {
        self.backup_dir.clone()
    }

    fn read_config(&self) -> io::Result<Vec<u8>> {
        fs::read(&self.config_path)
    }

    fn replace_config(&self, contents: &[u8]) -> io::Result<()> {
        let mut temp = NamedTempFile::new_in(&self.backup_dir)?;

        // Keep the mode of the file being replaced.  FAT boot partitions
        // reject chmod, which is harmless.
        if let Ok(meta) = fs::metadata(&self.config_path) {
            if let Err(e) = temp.as_file().set_permissions(meta.permissions()) {
                debug!(path = %temp.path().display(), err = %e, "could not copy config permissions");
            }
        }

        temp.write_all(contents)?;
        temp.as_file().sync_all()?;
        temp.persist(&self.config_path).map_err(|e| e.error)?;
        debug!(path = %self.config_path.display(), bytes = contents.len(), "config replaced");
        Ok(())
    }

    fn write_backup(&self, id: &BackupId, contents: &[u8]) -> io::Result<PathBuf> {
        let path = self.backup_dir.join(id.file_name());
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)?;

        let written = file.write_all(contents).and_then(|()| file.sync_all());
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&path) {
                warn!(path = %path.display(), err = %cleanup, "could not remove partial backup");
            }
            return Err(e);
        }
        Ok(path)
    }

    fn list_entries(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.backup_dir)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }
        Ok(names)
    }

    /// A bare file name is looked up in the backup directory; anything with
    /// a directory component is used as given.
    fn resolve_backup(&self, reference: &str) -> PathBuf {
        let candidate = Path::new(reference);
        if candidate.is_absolute() || candidate.components().count() > 1 {
            candidate.to_path_buf()
        } else {
            self.backup_dir.join(candidate)
        }
    }

    fn read_backup(&self, location: &Path) -> io::Result<Vec<u8>> {
        let meta = fs::metadata(location)?;
        if !meta.is_file() {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("{} is not a regular file", location.display()),
            ));
        }
        fs::read(location)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
