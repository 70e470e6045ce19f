//! ConfigOverlayManager: patches the boot config and manages its backups.
//!
//! The manager owns every read and write of the boot config.  It delegates the
//! actual I/O to a [`ConfigStore`] (the real file system in production, an
//! in-memory map in tests) and the current time to a [`Clock`], so each
//! operation can be exercised without root access.
//!
//! # Operations
//!
//! | Operation        | Mutates config? | Writes backup? | Needs confirmation?   |
//! |------------------|-----------------|----------------|-----------------------|
//! | [`fix`]          | if needed       | always, first  | no (asked by caller)  |
//! | [`list_backups`] | no              | no             | no                    |
//! | [`restore`]      | if confirmed    | no             | token must be `"yes"` |
//! | [`status`]       | no              | no             | no                    |
//!
//! Restoring does not back up the pre-restore state, so a restore cannot be
//! undone through this tool.
//!
//! Callers must not run two managers against the same file at once; nothing
//! here locks it.
//!
//! [`fix`]: ConfigOverlayManager::fix
//! [`list_backups`]: ConfigOverlayManager::list_backups
//! [`restore`]: ConfigOverlayManager::restore
//! [`status`]: ConfigOverlayManager::status

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use bootcfg_core::{
    inspect_audio, plan_fix, AudioStatus, BackupId, ConfigDocument, DirectivePair, FixOutcome,
};
use chrono::NaiveDateTime;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

/// The only confirmation token that lets [`ConfigOverlayManager::restore`] proceed.
pub const CONFIRM_TOKEN: &str = "yes";

/// How many consecutive seconds to try when a backup name is already taken.
const MAX_BACKUP_NAME_ATTEMPTS: usize = 60;

/// Error type for config overlay operations.
///
/// Every variant names the path that failed.  All of them are terminal for
/// the current invocation; nothing is retried.
#[derive(Debug, Error)]
pub enum OverlayError {
    /// The timestamped copy could not be made; the config was not touched.
    #[error("could not back up {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The requested backup does not resolve to an existing, readable
    /// regular file.
    #[error("backup not found: {path}")]
    NotFound { path: PathBuf },

    /// Replacing the config failed; it still holds its previous contents.
    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backup directory could not be read.
    #[error("could not list backups in {path}: {source}")]
    List {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A file exists but could not be read.
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The config is not UTF-8 text, so its lines cannot be patched.
    #[error("{path} is not valid UTF-8 text")]
    InvalidEncoding { path: PathBuf },
}

/// Storage port for the boot config and its backups.
///
/// Implementations: `FsConfigStore` (real files) and `MemoryConfigStore`
/// (tests).  Errors are plain [`io::Error`]s; the manager attaches paths.
pub trait ConfigStore: Send + Sync {
    /// Path of the live config file.
    fn config_path(&self) -> &Path;

    /// Directory that holds the backups.
    fn backup_dir(&self) -> PathBuf;

    /// Reads the full config contents.
    fn read_config(&self) -> io::Result<Vec<u8>>;

    /// Replaces the config contents atomically: on error the previous
    /// contents must still be in place.
    fn replace_config(&self, contents: &[u8]) -> io::Result<()>;

    /// Writes a new backup and returns its location.
    ///
    /// Must fail with [`io::ErrorKind::AlreadyExists`] rather than overwrite
    /// an existing backup.
    fn write_backup(&self, id: &BackupId, contents: &[u8]) -> io::Result<PathBuf>;

    /// File names of every entry in [`backup_dir`](Self::backup_dir).
    fn list_entries(&self) -> io::Result<Vec<String>>;

    /// Turns a backup name or operator-supplied path into a location.
    fn resolve_backup(&self, reference: &str) -> PathBuf;

    /// Reads a backup.  Must fail with [`io::ErrorKind::NotFound`] if the
    /// location is missing or not a regular file.
    fn read_backup(&self, location: &Path) -> io::Result<Vec<u8>>;
}

/// Time source for backup names.
pub trait Clock: Send + Sync {
    /// Current local wall-clock time.
    fn now(&self) -> NaiveDateTime;
}

/// What [`ConfigOverlayManager::fix`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixReport {
    /// Branch of the rule table taken.
    pub outcome: FixOutcome,
    /// Backup written before anything else.
    pub backup: BackupId,
    /// Where the backup was written.
    pub backup_path: PathBuf,
    /// Whether the config file was rewritten.
    pub changed: bool,
    /// Number of disable lines commented out.
    pub commented: usize,
    /// Number of duplicate active enable lines commented out.
    pub demoted_duplicates: usize,
}

/// Result of [`ConfigOverlayManager::restore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// The config now equals the backup byte-for-byte.
    Applied { from: PathBuf },
    /// The confirmation token was not `"yes"`; nothing changed.
    Cancelled,
}

/// Backups of one config file, oldest first.
///
/// Iterating is cheap and can be repeated; the listing is a snapshot taken
/// when [`ConfigOverlayManager::list_backups`] ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackupListing {
    dir: PathBuf,
    ids: Vec<BackupId>,
}

impl BackupListing {
    /// Iterates backups in chronological order.
    pub fn iter(&self) -> std::slice::Iter<'_, BackupId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Most recent backup.
    pub fn latest(&self) -> Option<&BackupId> {
        self.ids.last()
    }

    /// Backup at a 1-based position, as numbered in the restore menu.
    pub fn nth_from_one(&self, n: usize) -> Option<&BackupId> {
        n.checked_sub(1).and_then(|i| self.ids.get(i))
    }

    /// Full path of `id` inside the listed directory.
    pub fn path_of(&self, id: &BackupId) -> PathBuf {
        self.dir.join(id.file_name())
    }
}

impl<'a> IntoIterator for &'a BackupListing {
    type Item = &'a BackupId;
    type IntoIter = std::slice::Iter<'a, BackupId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter()
    }
}

/// Snapshot returned by [`ConfigOverlayManager::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusReport {
    pub config_path: PathBuf,
    #[serde(flatten)]
    pub audio: AudioStatus,
    pub backup_count: usize,
    pub latest_backup: Option<String>,
}

/// The config overlay use case.
pub struct ConfigOverlayManager {
    store: Arc<dyn ConfigStore>,
    clock: Arc<dyn Clock>,
    directives: DirectivePair,
}

impl ConfigOverlayManager {
    /// Creates a manager for the config behind `store`.
    pub fn new(
        store: Arc<dyn ConfigStore>,
        clock: Arc<dyn Clock>,
        directives: DirectivePair,
    ) -> Self {
        Self {
            store,
            clock,
            directives,
        }
    }

    /// Path of the managed config file.
    pub fn config_path(&self) -> &Path {
        self.store.config_path()
    }

    /// The directive pair this manager toggles.
    pub fn directives(&self) -> &DirectivePair {
        &self.directives
    }

    fn config_name(&self) -> String {
        self.config_path()
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.config_path().display().to_string())
    }

    /// Backs up the config, then comments out the disable directive and
    /// ensures the enable directive is present.
    ///
    /// A backup is written on every call, even when nothing needs changing.
    /// The config is only rewritten when the rule table changed something,
    /// so a second call is a no-op apart from its backup.
    ///
    /// # Errors
    ///
    /// - [`OverlayError::Backup`] if the config cannot be read or the copy
    ///   cannot be written; the config is untouched.
    /// - [`OverlayError::InvalidEncoding`] if the config is not UTF-8; the
    ///   backup exists, the config is untouched.
    /// - [`OverlayError::Write`] if the atomic replace fails; the config keeps
    ///   its previous contents.
    pub fn fix(&self) -> Result<FixReport, OverlayError> {
        let path = self.config_path().to_path_buf();
        let original = self.store.read_config().map_err(|source| OverlayError::Backup {
            path: path.clone(),
            source,
        })?;

        let (backup, backup_path) = self.write_backup(&original)?;
        info!(config = %path.display(), backup = %backup_path.display(), "backup created");

        let text = std::str::from_utf8(&original)
            .map_err(|_| OverlayError::InvalidEncoding { path: path.clone() })?;
        let plan = plan_fix(&ConfigDocument::parse(text), &self.directives);
        let changed = plan.changed();

        if changed {
            self.store
                .replace_config(plan.document.render().as_bytes())
                .map_err(|source| OverlayError::Write {
                    path: path.clone(),
                    source,
                })?;
        }

        info!(
            config = %path.display(),
            outcome = ?plan.outcome,
            changed,
            "overlay fix applied"
        );

        Ok(FixReport {
            outcome: plan.outcome,
            backup,
            backup_path,
            changed,
            commented: plan.commented.len(),
            demoted_duplicates: plan.demoted_duplicates.len(),
        })
    }

    /// Writes `contents` under a fresh timestamped name, stepping forward one
    /// second at a time if the name is taken.
    fn write_backup(&self, contents: &[u8]) -> Result<(BackupId, PathBuf), OverlayError> {
        let mut id = BackupId::new(self.config_name(), self.clock.now());
        for _ in 0..MAX_BACKUP_NAME_ATTEMPTS {
            match self.store.write_backup(&id, contents) {
                Ok(location) => return Ok((id, location)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    debug!(backup = %id, "backup name taken, trying next second");
                    id = id.next_second();
                }
                Err(source) => {
                    return Err(OverlayError::Backup {
                        path: self.store.backup_dir().join(id.file_name()),
                        source,
                    })
                }
            }
        }
        Err(OverlayError::Backup {
            path: self.store.backup_dir().join(id.file_name()),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                "no free backup name within a minute of now",
            ),
        })
    }

    /// Lists this config's backups, oldest first.
    ///
    /// Files that do not follow the naming scheme, or belong to another
    /// config file, are skipped.  An empty listing is not an error.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::List`] if the directory cannot be read.
    pub fn list_backups(&self) -> Result<BackupListing, OverlayError> {
        let dir = self.store.backup_dir();
        let entries = self.store.list_entries().map_err(|source| OverlayError::List {
            path: dir.clone(),
            source,
        })?;
        let config_name = self.config_name();
        let mut ids: Vec<BackupId> = entries
            .iter()
            .filter_map(|name| BackupId::parse_for(name, &config_name).ok())
            .collect();
        ids.sort();
        debug!(dir = %dir.display(), count = ids.len(), "listed backups");
        Ok(BackupListing { dir, ids })
    }

    /// Resolves `reference` and checks the backup can be read.
    ///
    /// The session calls this before asking for confirmation so the operator
    /// is never asked to confirm a restore that cannot happen.
    ///
    /// # Errors
    ///
    /// [`OverlayError::NotFound`] or [`OverlayError::Read`].
    pub fn locate_backup(&self, reference: &str) -> Result<PathBuf, OverlayError> {
        let location = self.store.resolve_backup(reference);
        self.read_backup(&location)?;
        Ok(location)
    }

    /// A backup that exists but cannot be read is reported as not found.
    fn read_backup(&self, location: &Path) -> Result<Vec<u8>, OverlayError> {
        self.store
            .read_backup(location)
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
                    debug!(backup = %location.display(), error = %source, "backup not readable");
                    OverlayError::NotFound {
                        path: location.to_path_buf(),
                    }
                }
                _ => OverlayError::Read {
                    path: location.to_path_buf(),
                    source,
                },
            })
    }

    /// Overwrites the config with a backup if `confirmation` is exactly `"yes"`.
    ///
    /// The backup is checked before the token, so a missing backup is always
    /// reported as [`OverlayError::NotFound`].  The pre-restore state is not
    /// backed up.
    ///
    /// # Errors
    ///
    /// [`OverlayError::NotFound`], [`OverlayError::Read`], or
    /// [`OverlayError::Write`] (config left as it was).
    pub fn restore(
        &self,
        reference: &str,
        confirmation: &str,
    ) -> Result<RestoreOutcome, OverlayError> {
        let location = self.store.resolve_backup(reference);
        let contents = self.read_backup(&location)?;

        if confirmation != CONFIRM_TOKEN {
            warn!(backup = %location.display(), "restore cancelled by operator");
            return Ok(RestoreOutcome::Cancelled);
        }

        let path = self.config_path().to_path_buf();
        self.store
            .replace_config(&contents)
            .map_err(|source| OverlayError::Write {
                path: path.clone(),
                source,
            })?;

        info!(config = %path.display(), backup = %location.display(), "backup restored");
        Ok(RestoreOutcome::Applied { from: location })
    }

    /// Reports the audio-related settings and the number of backups.
    ///
    /// # Errors
    ///
    /// [`OverlayError::Read`], [`OverlayError::InvalidEncoding`], or
    /// [`OverlayError::List`].
    pub fn status(&self) -> Result<StatusReport, OverlayError> {
        let path = self.config_path().to_path_buf();
        let bytes = self.store.read_config().map_err(|source| OverlayError::Read {
            path: path.clone(),
            source,
        })?;
        let text = std::str::from_utf8(&bytes)
            .map_err(|_| OverlayError::InvalidEncoding { path: path.clone() })?;
        let audio = inspect_audio(&ConfigDocument::parse(text), &self.directives);
        let backups = self.list_backups()?;

        Ok(StatusReport {
            config_path: path,
            audio,
            backup_count: backups.len(),
            latest_backup: backups.latest().map(BackupId::file_name),
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
