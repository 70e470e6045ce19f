//! fix-pi-audio: entry point.
//!
//! Switches a Raspberry Pi boot config from the full KMS graphics overlay to
//! the fake KMS overlay so the legacy audio devices show up, keeping a
//! timestamped backup of every version it replaces.
//!
//! # Usage
//!
//! ```text
//! fix-pi-audio [OPTIONS] [COMMAND]
//!
//! Commands:
//!   fix       Comment out the KMS overlay and enable FKMS
//!   list      List backups of the boot config
//!   restore   Restore a backup
//!   status    Show the audio-related boot settings
//!   settings  Print the effective settings as TOML
//!
//! With no command an interactive menu is shown:
//!   1) fix   2) restore   q) quit
//!
//! Options:
//!   --config   <PATH>   Boot config to edit
//!   --settings <PATH>   Settings file [default: /etc/fix-pi-audio/config.toml]
//!   --reboot   <WHEN>   ask | never | always [default: ask]
//!   --log-json          Emit logs as JSON on stderr
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                | Description                  |
//! |-------------------------|------------------------------|
//! | `FIX_PI_AUDIO_CONFIG`   | Same as `--config`           |
//! | `FIX_PI_AUDIO_SETTINGS` | Same as `--settings`         |
//! | `RUST_LOG`              | Overrides `[logging] level`  |
//!
//! # Exit status
//!
//! `0` when the command finished or the operator cancelled, `1` on any error.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use bootcfg_core::DisplayOverlay;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::{debug, info};

use fix_pi_audio::application::overlay_manager::{ConfigOverlayManager, StatusReport};
use fix_pi_audio::application::session::{
    RebootPolicy, Session, SessionOptions, SessionOutcome,
};
use fix_pi_audio::infrastructure::clock::SystemClock;
use fix_pi_audio::infrastructure::logging::{init_logging, LogFormat};
use fix_pi_audio::infrastructure::reboot::CommandRebooter;
use fix_pi_audio::infrastructure::settings::{load_settings, DEFAULT_SETTINGS_PATH};
use fix_pi_audio::infrastructure::storage::FsConfigStore;
use fix_pi_audio::infrastructure::terminal::TerminalPrompter;

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Raspberry Pi boot config fixer for announcement audio.
#[derive(Debug, Parser)]
#[command(
    name = "fix-pi-audio",
    about = "Switch the Raspberry Pi boot config to the FKMS overlay, with backups",
    version
)]
struct Cli {
    /// Boot config to edit.  Defaults to `[boot] config_path` from the
    /// settings file, falling back to `/boot/config.txt` on older images.
    #[arg(long, global = true, env = "FIX_PI_AUDIO_CONFIG")]
    config: Option<PathBuf>,

    /// Settings file.  A missing file means built-in defaults.
    #[arg(long, global = true, default_value = DEFAULT_SETTINGS_PATH, env = "FIX_PI_AUDIO_SETTINGS")]
    settings: PathBuf,

    /// Whether to reboot after a change is written.
    #[arg(long, global = true, value_enum, default_value_t = RebootArg::Ask)]
    reboot: RebootArg,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Back up the boot config, comment out the KMS overlay, and enable FKMS.
    Fix {
        /// Do not ask for confirmation before writing.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// List backups of the boot config, oldest first.
    List {
        #[arg(long)]
        json: bool,
    },
    /// Overwrite the boot config with a backup.
    Restore {
        /// Backup file name (from `list`) or path.
        backup: String,
        /// Restore without typing `yes`.
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Show the audio-related boot settings and backup count.
    Status {
        #[arg(long)]
        json: bool,
    },
    /// Print the effective settings as TOML.
    Settings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum RebootArg {
    Ask,
    Never,
    Always,
}

impl From<RebootArg> for RebootPolicy {
    fn from(arg: RebootArg) -> Self {
        match arg {
            RebootArg::Ask => RebootPolicy::Ask,
            RebootArg::Never => RebootPolicy::Never,
            RebootArg::Always => RebootPolicy::Always,
        }
    }
}

/// One row of `list --json`.
#[derive(Debug, Serialize)]
struct BackupEntry {
    name: String,
    path: PathBuf,
    created: String,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let settings = load_settings(&cli.settings)
        .with_context(|| format!("loading settings from {}", cli.settings.display()))?;

    let format = if cli.log_json {
        LogFormat::Json
    } else {
        LogFormat::Text
    };
    init_logging(&settings.logging.level, format)?;

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| settings.resolve_config_path());
    let directives = settings.directive_pair()?;
    debug!(config = %config_path.display(), settings = %cli.settings.display(), "starting");

    let manager = ConfigOverlayManager::new(
        Arc::new(FsConfigStore::new(config_path)),
        Arc::new(SystemClock),
        directives,
    );
    let rebooter = Arc::new(CommandRebooter::new(settings.reboot.command.clone()));
    let session_with = |assume_yes: bool| {
        Session::new(
            &manager,
            TerminalPrompter::stdio(),
            rebooter.clone(),
            SessionOptions {
                assume_yes,
                reboot: cli.reboot.into(),
            },
        )
    };

    match cli.command {
        None => log_outcome(&session_with(false).run_menu()?),
        Some(Command::Fix { yes }) => log_outcome(&session_with(yes).run_fix()?),
        Some(Command::Restore { ref backup, yes }) => {
            log_outcome(&session_with(yes).run_restore(Some(backup))?)
        }
        Some(Command::List { json }) => print_listing(&manager, json)?,
        Some(Command::Status { json }) => print_status(&manager.status()?, json)?,
        Some(Command::Settings) => print!("{}", settings.to_toml()?),
    }
    Ok(())
}

fn log_outcome(outcome: &SessionOutcome) {
    match outcome {
        SessionOutcome::Fixed { report, reboot } => {
            info!(outcome = ?report.outcome, changed = report.changed, reboot = ?reboot, "done")
        }
        SessionOutcome::Restored { from, reboot } => {
            info!(from = %from.display(), reboot = ?reboot, "done")
        }
        other => debug!(outcome = ?other, "done"),
    }
}

fn print_listing(manager: &ConfigOverlayManager, json: bool) -> anyhow::Result<()> {
    let listing = manager.list_backups()?;

    if json {
        let entries: Vec<BackupEntry> = listing
            .iter()
            .map(|id| BackupEntry {
                name: id.file_name(),
                path: listing.path_of(id),
                created: id.timestamp().format("%Y-%m-%dT%H:%M:%S").to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if listing.is_empty() {
        println!("No backups found for {}", manager.config_path().display());
        return Ok(());
    }
    for id in &listing {
        println!(
            "{}  {}",
            id.timestamp().format("%Y-%m-%d %H:%M:%S"),
            listing.path_of(id).display()
        );
    }
    Ok(())
}

fn print_status(report: &StatusReport, json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let overlay = match report.audio.display_overlay {
        DisplayOverlay::Kms => "full KMS (audio devices hidden)",
        DisplayOverlay::FakeKms => "fake KMS",
        DisplayOverlay::Conflicting => "both KMS and fake KMS active",
        DisplayOverlay::Unset => "none",
    };
    let hint = if report.audio.needs_fix() {
        " (run `fix`)"
    } else {
        ""
    };
    let onboard = match report.audio.onboard_audio {
        Some(true) => "on",
        Some(false) => "off",
        None => "not set",
    };
    let overlays = if report.audio.audio_overlays.is_empty() {
        "none".to_string()
    } else {
        report.audio.audio_overlays.join(", ")
    };

    println!("config:          {}", report.config_path.display());
    println!("display overlay: {overlay}{hint}");
    println!("onboard audio:   {onboard}");
    println!("audio overlays:  {overlays}");
    match &report.latest_backup {
        Some(latest) => println!("backups:         {} (latest {latest})", report.backup_count),
        None => println!("backups:         none"),
    }
    Ok(())
}
