//! TOML settings for fix-pi-audio.
//!
//! Read from `/etc/fix-pi-audio/config.toml` unless `--settings` or
//! `FIX_PI_AUDIO_SETTINGS` points elsewhere.  The file is optional: a missing
//! file yields [`ToolSettings::default()`], and every key inside it is
//! optional too.
//!
//! ```toml
//! [boot]
//! config_path = "/boot/firmware/config.txt"
//! fallback_paths = ["/boot/config.txt"]
//!
//! [directives]
//! disable = "dtoverlay=vc4-kms-v3d"
//! enable = "dtoverlay=vc4-fkms-v3d"
//!
//! [logging]
//! level = "info"
//!
//! [reboot]
//! command = ["systemctl", "reboot"]
//! ```
//!
//! # Serde default values
//!
//! Fields annotated with `#[serde(default = "some_fn")]` use the return value
//! of `some_fn()` when the key is absent, so a settings file only needs the
//! keys it wants to change.

use std::path::{Path, PathBuf};

use bootcfg_core::domain::directive::{DEFAULT_DISABLE_DIRECTIVE, DEFAULT_ENABLE_DIRECTIVE};
use bootcfg_core::{DirectiveError, DirectivePair};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Settings file used when neither `--settings` nor the environment names one.
pub const DEFAULT_SETTINGS_PATH: &str = "/etc/fix-pi-audio/config.toml";

/// Error type for settings operations.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// A file system I/O error other than "not found".
    #[error("I/O error reading settings at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse settings at {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The settings could not be rendered back to TOML.
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// The `[directives]` section is unusable.
    #[error("invalid [directives] section: {0}")]
    Directive(#[from] DirectiveError),
}

// ── Settings schema types ─────────────────────────────────────────────────────

/// Top-level settings file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ToolSettings {
    #[serde(default)]
    pub boot: BootSettings,
    #[serde(default)]
    pub directives: DirectiveSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
    #[serde(default)]
    pub reboot: RebootSettings,
}

/// Where the boot config lives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BootSettings {
    /// Boot config to patch.
    #[serde(default = "default_config_path")]
    pub config_path: PathBuf,
    /// Tried in order when `config_path` does not exist.
    #[serde(default = "default_fallback_paths")]
    pub fallback_paths: Vec<PathBuf>,
}

/// The overlay pair toggled by `fix`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DirectiveSettings {
    /// Active lines containing this text are commented out.
    #[serde(default = "default_disable")]
    pub disable: String,
    /// Added unless already present.
    #[serde(default = "default_enable")]
    pub enable: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSettings {
    /// `tracing` level: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RebootSettings {
    /// Program and arguments run when the operator confirms a reboot.
    #[serde(default = "default_reboot_command")]
    pub command: Vec<String>,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_config_path() -> PathBuf {
    PathBuf::from("/boot/firmware/config.txt")
}
fn default_fallback_paths() -> Vec<PathBuf> {
    vec![PathBuf::from("/boot/config.txt")]
}
fn default_disable() -> String {
    DEFAULT_DISABLE_DIRECTIVE.to_string()
}
fn default_enable() -> String {
    DEFAULT_ENABLE_DIRECTIVE.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_reboot_command() -> Vec<String> {
    vec!["systemctl".to_string(), "reboot".to_string()]
}

impl Default for BootSettings {
    fn default() -> Self {
        Self {
            config_path: default_config_path(),
            fallback_paths: default_fallback_paths(),
        }
    }
}

impl Default for DirectiveSettings {
    fn default() -> Self {
        Self {
            disable: default_disable(),
            enable: default_enable(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for RebootSettings {
    fn default() -> Self {
        Self {
            command: default_reboot_command(),
        }
    }
}

impl ToolSettings {
    /// Validated directive pair from `[directives]`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::Directive`] for empty, commented, multi-line,
    /// or overlapping patterns.
    pub fn directive_pair(&self) -> Result<DirectivePair, SettingsError> {
        Ok(DirectivePair::new(
            &self.directives.disable,
            &self.directives.enable,
        )?)
    }

    /// Picks the boot config: `config_path` if it exists, else the first
    /// existing fallback, else `config_path` so errors name the primary.
    pub fn resolve_config_path(&self) -> PathBuf {
        self.resolve_config_path_with(Path::exists)
    }

    /// [`resolve_config_path`](Self::resolve_config_path) with an injectable
    /// existence check.
    pub fn resolve_config_path_with(&self, exists: impl Fn(&Path) -> bool) -> PathBuf {
        if exists(&self.boot.config_path) {
            return self.boot.config_path.clone();
        }
        self.boot
            .fallback_paths
            .iter()
            .find(|p| exists(p))
            .cloned()
            .unwrap_or_else(|| self.boot.config_path.clone())
    }

    /// Effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

/// Loads settings from `path`, returning defaults if the file does not exist.
///
/// # Errors
///
/// Returns [`SettingsError::Io`] for file-system errors other than "not
/// found", and [`SettingsError::Parse`] if the TOML is malformed.
pub fn load_settings(path: &Path) -> Result<ToolSettings, SettingsError> {
    match std::fs::read_to_string(path) {
        Ok(content) => toml::from_str(&content).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ToolSettings::default()),
        Err(source) => Err(SettingsError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ── Defaults ──────────────────────────────────────────────────────────────

    #[test]
    fn test_defaults_target_bookworm_boot_partition() {
        // Arrange / Act
        let settings = ToolSettings::default();

        // Assert
        assert_eq!(
            settings.boot.config_path,
            PathBuf::from("/boot/firmware/config.txt")
        );
        assert_eq!(
            settings.boot.fallback_paths,
            vec![PathBuf::from("/boot/config.txt")]
        );
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.reboot.command, vec!["systemctl", "reboot"]);
    }

    #[test]
    fn test_default_directive_pair_is_kms_to_fkms() {
        let pair = ToolSettings::default().directive_pair().unwrap();
        assert_eq!(pair, DirectivePair::default());
    }

    // ── Parsing ───────────────────────────────────────────────────────────────

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        // Arrange
        let text = "[logging]\nlevel = \"debug\"\n";

        // Act
        let settings: ToolSettings = toml::from_str(text).unwrap();

        // Assert
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.boot, BootSettings::default());
        assert_eq!(settings.directives, DirectiveSettings::default());
    }

    #[test]
    fn test_empty_file_is_all_defaults() {
        let settings: ToolSettings = toml::from_str("").unwrap();
        assert_eq!(settings, ToolSettings::default());
    }

    #[test]
    fn test_custom_directives_are_validated() {
        let text = "[directives]\ndisable = \"#dtoverlay=x\"\n";
        let settings: ToolSettings = toml::from_str(text).unwrap();
        assert!(matches!(
            settings.directive_pair(),
            Err(SettingsError::Directive(_))
        ));
    }

    #[test]
    fn test_settings_round_trip_through_toml() {
        let mut settings = ToolSettings::default();
        settings.reboot.command = vec!["/sbin/reboot".into()];

        let text = settings.to_toml().unwrap();
        let restored: ToolSettings = toml::from_str(&text).unwrap();

        assert_eq!(settings, restored);
    }

    // ── load_settings ─────────────────────────────────────────────────────────

    #[test]
    fn test_load_settings_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(settings, ToolSettings::default());
    }

    #[test]
    fn test_load_settings_malformed_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[boot\nconfig_path = 3").unwrap();

        let err = load_settings(&path).unwrap_err();

        assert!(matches!(err, SettingsError::Parse { .. }));
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_load_settings_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[boot]\nconfig_path = \"/tmp/config.txt\"\n").unwrap();

        let settings = load_settings(&path).unwrap();

        assert_eq!(settings.boot.config_path, PathBuf::from("/tmp/config.txt"));
    }

    // ── Config path resolution ────────────────────────────────────────────────

    #[test]
    fn test_resolve_prefers_primary_path() {
        let settings = ToolSettings::default();
        let path = settings.resolve_config_path_with(|_| true);
        assert_eq!(path, PathBuf::from("/boot/firmware/config.txt"));
    }

    #[test]
    fn test_resolve_falls_back_to_legacy_path() {
        let settings = ToolSettings::default();
        let path = settings.resolve_config_path_with(|p| p == Path::new("/boot/config.txt"));
        assert_eq!(path, PathBuf::from("/boot/config.txt"));
    }

    #[test]
    fn test_resolve_with_nothing_present_names_primary() {
        let settings = ToolSettings::default();
        let path = settings.resolve_config_path_with(|_| false);
        assert_eq!(path, PathBuf::from("/boot/firmware/config.txt"));
    }
}
