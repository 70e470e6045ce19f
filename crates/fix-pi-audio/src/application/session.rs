//! Interactive menu session.
//!
//! The session is the only place that talks to the operator.  It collects a
//! decision (menu choice, confirmation, reboot answer) through the
//! [`Prompter`] port, then hands that decision to the
//! [`ConfigOverlayManager`].  The manager never prompts and never reboots.
//!
//! # State machine
//!
//! ```text
//! Idle ──► FixRequested ─────┐
//!   │                        ├──► Confirming ──► Applied ──► RebootPrompt ──► Idle
//!   └────► RestoreRequested ─┘          │
//!                                       └──────► Cancelled ─────────────────► Idle
//! ```
//!
//! `Applied` and `Cancelled` end the invocation; nothing carries over to the
//! next run except backups already on disk.  Every transition is logged at
//! `debug` level.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};

use super::overlay_manager::{
    ConfigOverlayManager, FixReport, OverlayError, RestoreOutcome, CONFIRM_TOKEN,
};

// ── Ports ─────────────────────────────────────────────────────────────────────

/// Error type for operator I/O.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

/// Operator-facing text channel.
///
/// Implementations: `TerminalPrompter` (stdin/stdout) in production, a
/// scripted list of answers in tests.
pub trait Prompter {
    /// Shows one line of output.
    fn say(&mut self, line: &str) -> Result<(), PromptError>;

    /// Shows `question` and reads one answer without its line terminator.
    ///
    /// Returns `Ok(None)` at end of input.
    fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError>;
}

/// Error type for reboot requests.
#[derive(Debug, Error)]
pub enum RebootError {
    #[error("no reboot command configured")]
    NoCommand,

    #[error("could not start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("`{command}` exited with {status}")]
    Failed { command: String, status: String },
}

/// Restarts the host.
#[cfg_attr(test, mockall::automock)]
pub trait Rebooter: Send + Sync {
    fn reboot(&self) -> Result<(), RebootError>;
}

// ── Session types ─────────────────────────────────────────────────────────────

/// A parsed menu selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuChoice {
    Fix,
    Restore,
    Quit,
    Invalid(String),
}

impl MenuChoice {
    /// Parses operator input; surrounding whitespace is ignored.
    pub fn parse(input: &str) -> Self {
        match input.trim() {
            "1" => Self::Fix,
            "2" => Self::Restore,
            "q" => Self::Quit,
            other => Self::Invalid(other.to_owned()),
        }
    }
}

/// Where the session is in its state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    FixRequested,
    RestoreRequested,
    Confirming,
    Applied,
    Cancelled,
    RebootPrompt,
}

/// What to do about rebooting after a change was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RebootPolicy {
    /// Ask the operator.
    #[default]
    Ask,
    /// Never reboot; remind the operator instead.
    Never,
    /// Reboot without asking.
    Always,
}

/// Knobs set from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionOptions {
    /// Skip the fix/restore confirmation.  Does not imply a reboot.
    pub assume_yes: bool,
    pub reboot: RebootPolicy,
}

/// Result of the reboot step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RebootStatus {
    /// Nothing changed, so no reboot was offered.
    NotNeeded,
    Declined,
    Requested,
    /// The reboot command failed; the written change stays in place.
    Failed(String),
}

/// How one session invocation ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    Quit,
    InvalidChoice(String),
    NoBackups,
    Cancelled,
    Fixed {
        report: FixReport,
        reboot: RebootStatus,
    },
    Restored {
        from: PathBuf,
        reboot: RebootStatus,
    },
}

/// Error type for a session run.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Overlay(#[from] OverlayError),

    #[error(transparent)]
    Prompt(#[from] PromptError),
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One operator session against one config file.
pub struct Session<'a, P: Prompter> {
    manager: &'a ConfigOverlayManager,
    prompter: P,
    rebooter: Arc<dyn Rebooter>,
    options: SessionOptions,
    state: SessionState,
}

impl<'a, P: Prompter> Session<'a, P> {
    pub fn new(
        manager: &'a ConfigOverlayManager,
        prompter: P,
        rebooter: Arc<dyn Rebooter>,
        options: SessionOptions,
    ) -> Self {
        Self {
            manager,
            prompter,
            rebooter,
            options,
            state: SessionState::Idle,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn prompter(&self) -> &P {
        &self.prompter
    }

    /// Ends the session and hands back the prompter.
    pub fn into_prompter(self) -> P {
        self.prompter
    }

    fn transition(&mut self, next: SessionState) {
        debug!(from = ?self.state, to = ?next, "session state");
        self.state = next;
    }

    /// Shows the menu and runs the chosen action.
    pub fn run_menu(&mut self) -> Result<SessionOutcome, SessionError> {
        let directives = self.manager.directives().clone();
        let config = self.manager.config_path().display().to_string();

        self.prompter.say(&format!("Boot config: {config}"))?;
        self.prompter.say(&format!(
            "  1) Fix audio: comment out `{}` and enable `{}`",
            directives.disable, directives.enable
        ))?;
        self.prompter.say("  2) Restore a backup")?;
        self.prompter.say("  q) Quit")?;

        let Some(answer) = self.prompter.ask("Choose an option: ")? else {
            return Ok(SessionOutcome::Quit);
        };

        match MenuChoice::parse(&answer) {
            MenuChoice::Fix => self.run_fix(),
            MenuChoice::Restore => self.run_restore(None),
            MenuChoice::Quit => Ok(SessionOutcome::Quit),
            MenuChoice::Invalid(input) => {
                self.prompter.say(&format!("Invalid choice: {input:?}"))?;
                Ok(SessionOutcome::InvalidChoice(input))
            }
        }
    }

    /// Confirms with the operator, then applies the fix.
    pub fn run_fix(&mut self) -> Result<SessionOutcome, SessionError> {
        self.transition(SessionState::FixRequested);
        let config = self.manager.config_path().display().to_string();

        if !self.options.assume_yes {
            self.transition(SessionState::Confirming);
            let answer = self.prompter.ask(&format!(
                "Update {config}? A backup is written first. [y/N]: "
            ))?;
            if !is_affirmative(answer.as_deref()) {
                return self.cancel(&format!("Cancelled; {config} was not changed."));
            }
        }

        let report = self.manager.fix()?;
        self.transition(SessionState::Applied);
        self.prompter
            .say(&format!("Backup written to {}", report.backup_path.display()))?;
        self.prompter.say(&format!("{config}: {}", report.outcome))?;

        let reboot = if report.changed {
            self.offer_reboot()?
        } else {
            self.transition(SessionState::Idle);
            RebootStatus::NotNeeded
        };
        Ok(SessionOutcome::Fixed { report, reboot })
    }

    /// Restores a backup.  With no `reference` the operator picks one from
    /// the listing.
    pub fn run_restore(&mut self, reference: Option<&str>) -> Result<SessionOutcome, SessionError> {
        self.transition(SessionState::RestoreRequested);
        let config = self.manager.config_path().display().to_string();

        let reference = match reference {
            Some(r) => r.to_owned(),
            None => match self.pick_backup()? {
                Picked::Backup(name) => name,
                Picked::Outcome(outcome) => {
                    self.transition(SessionState::Idle);
                    return Ok(outcome);
                }
            },
        };

        // Fails with NotFound before the operator is asked anything.
        let location = self.manager.locate_backup(&reference)?;

        let token = if self.options.assume_yes {
            CONFIRM_TOKEN.to_owned()
        } else {
            self.transition(SessionState::Confirming);
            self.prompter
                .ask(&format!(
                    "Overwrite {config} with {}? Type '{CONFIRM_TOKEN}' to confirm: ",
                    location.display()
                ))?
                .unwrap_or_default()
        };

        match self.manager.restore(&reference, &token)? {
            RestoreOutcome::Cancelled => {
                self.cancel(&format!("Restore cancelled; {config} was not changed."))
            }
            RestoreOutcome::Applied { from } => {
                self.transition(SessionState::Applied);
                self.prompter
                    .say(&format!("Restored {config} from {}", from.display()))?;
                let reboot = self.offer_reboot()?;
                Ok(SessionOutcome::Restored { from, reboot })
            }
        }
    }

    fn pick_backup(&mut self) -> Result<Picked, SessionError> {
        let listing = self.manager.list_backups()?;
        if listing.is_empty() {
            self.prompter.say(&format!(
                "No backups found for {}",
                self.manager.config_path().display()
            ))?;
            return Ok(Picked::Outcome(SessionOutcome::NoBackups));
        }

        self.prompter.say("Available backups (oldest first):")?;
        for (n, id) in listing.iter().enumerate() {
            self.prompter.say(&format!(
                "  {}) {}  [{}]",
                n + 1,
                id.file_name(),
                id.timestamp().format("%Y-%m-%d %H:%M:%S")
            ))?;
        }

        let answer = self
            .prompter
            .ask("Backup to restore (number or file name, empty to cancel): ")?
            .unwrap_or_default();
        let answer = answer.trim();
        if answer.is_empty() {
            self.prompter.say("Restore cancelled.")?;
            return Ok(Picked::Outcome(SessionOutcome::Cancelled));
        }

        match answer.parse::<usize>() {
            Ok(n) => match listing.nth_from_one(n) {
                Some(id) => Ok(Picked::Backup(id.file_name())),
                None => {
                    self.prompter.say(&format!("Invalid choice: {answer:?}"))?;
                    Ok(Picked::Outcome(SessionOutcome::InvalidChoice(answer.to_owned())))
                }
            },
            Err(_) => Ok(Picked::Backup(answer.to_owned())),
        }
    }

    fn cancel(&mut self, message: &str) -> Result<SessionOutcome, SessionError> {
        self.transition(SessionState::Cancelled);
        warn!(config = %self.manager.config_path().display(), "operator cancelled");
        self.prompter.say(message)?;
        self.transition(SessionState::Idle);
        Ok(SessionOutcome::Cancelled)
    }

    fn offer_reboot(&mut self) -> Result<RebootStatus, SessionError> {
        self.transition(SessionState::RebootPrompt);
        let confirmed = match self.options.reboot {
            RebootPolicy::Never => false,
            RebootPolicy::Always => true,
            RebootPolicy::Ask => {
                is_affirmative(self.prompter.ask("Reboot now to apply the change? [y/N]: ")?.as_deref())
            }
        };
        let status = self.prompt_reboot_if_confirmed(confirmed);
        match &status {
            RebootStatus::Declined => self
                .prompter
                .say("Reboot later for the change to take effect.")?,
            RebootStatus::Failed(reason) => self
                .prompter
                .say(&format!("Reboot failed: {reason}. The change is saved; reboot manually."))?,
            RebootStatus::Requested | RebootStatus::NotNeeded => {}
        }
        self.transition(SessionState::Idle);
        Ok(status)
    }

    /// Reboots the host if and only if `confirmed` is true.
    ///
    /// A failed reboot is logged and reported; the written config is kept.
    pub fn prompt_reboot_if_confirmed(&self, confirmed: bool) -> RebootStatus {
        if !confirmed {
            return RebootStatus::Declined;
        }
        match self.rebooter.reboot() {
            Ok(()) => {
                info!("reboot requested");
                RebootStatus::Requested
            }
            Err(e) => {
                warn!(err = %e, "reboot failed");
                RebootStatus::Failed(e.to_string())
            }
        }
    }
}

enum Picked {
    Backup(String),
    Outcome(SessionOutcome),
}

/// `y` or `yes` in any case.  Used for fix and reboot prompts only; restore
/// requires the exact token.
fn is_affirmative(answer: Option<&str>) -> bool {
    matches!(
        answer.map(|a| a.trim().to_ascii_lowercase()).as_deref(),
        Some("y" | "yes")
    )
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::overlay_manager::{Clock, ConfigStore};
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::storage::memory::MemoryConfigStore;
    use bootcfg_core::{DirectivePair, FixOutcome};
    use chrono::NaiveDate;
    use std::collections::VecDeque;

    const KMS_CONFIG: &str = "dtparam=audio=on\ndtoverlay=vc4-kms-v3d\n";

    /// Answers questions from a fixed script and records everything shown.
    #[derive(Default)]
    struct ScriptedPrompter {
        answers: VecDeque<String>,
        shown: Vec<String>,
    }

    impl ScriptedPrompter {
        fn new(answers: &[&str]) -> Self {
            Self {
                answers: answers.iter().map(|a| a.to_string()).collect(),
                shown: Vec::new(),
            }
        }

        fn transcript(&self) -> String {
            self.shown.join("\n")
        }
    }

    impl Prompter for ScriptedPrompter {
        fn say(&mut self, line: &str) -> Result<(), PromptError> {
            self.shown.push(line.to_owned());
            Ok(())
        }

        fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError> {
            self.shown.push(question.to_owned());
            Ok(self.answers.pop_front())
        }
    }

    fn make_manager(contents: &str) -> (ConfigOverlayManager, Arc<MemoryConfigStore>) {
        let store = Arc::new(MemoryConfigStore::new(
            "/boot/firmware/config.txt",
            contents.as_bytes(),
        ));
        let clock = FixedClock::new(
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        );
        let manager = ConfigOverlayManager::new(
            Arc::clone(&store) as Arc<dyn ConfigStore>,
            Arc::new(clock) as Arc<dyn Clock>,
            DirectivePair::default(),
        );
        (manager, store)
    }

    fn no_reboot() -> Arc<dyn Rebooter> {
        let mut rebooter = MockRebooter::new();
        rebooter.expect_reboot().times(0);
        Arc::new(rebooter)
    }

    // ── MenuChoice ────────────────────────────────────────────────────────────

    #[test]
    fn test_menu_choice_parse() {
        assert_eq!(MenuChoice::parse("1"), MenuChoice::Fix);
        assert_eq!(MenuChoice::parse(" 2\n"), MenuChoice::Restore);
        assert_eq!(MenuChoice::parse("q"), MenuChoice::Quit);
        assert_eq!(MenuChoice::parse("Q"), MenuChoice::Invalid("Q".into()));
        assert_eq!(MenuChoice::parse("quit"), MenuChoice::Invalid("quit".into()));
        assert_eq!(MenuChoice::parse("3"), MenuChoice::Invalid("3".into()));
        assert_eq!(MenuChoice::parse(""), MenuChoice::Invalid(String::new()));
    }

    // ── Menu ──────────────────────────────────────────────────────────────────

    #[test]
    fn test_menu_quit_leaves_config_alone() {
        let (manager, store) = make_manager(KMS_CONFIG);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["q"]),
            no_reboot(),
            SessionOptions::default(),
        );

        let outcome = session.run_menu().unwrap();

        assert_eq!(outcome, SessionOutcome::Quit);
        assert_eq!(store.config_text(), KMS_CONFIG);
        assert_eq!(store.backup_count(), 0);
    }

    #[test]
    fn test_menu_invalid_choice_exits_cleanly() {
        let (manager, store) = make_manager(KMS_CONFIG);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["7"]),
            no_reboot(),
            SessionOptions::default(),
        );

        let outcome = session.run_menu().unwrap();

        assert_eq!(outcome, SessionOutcome::InvalidChoice("7".into()));
        assert!(session.prompter().transcript().contains("Invalid choice"));
        assert_eq!(store.backup_count(), 0);
    }

    #[test]
    fn test_menu_end_of_input_is_quit() {
        let (manager, _) = make_manager(KMS_CONFIG);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&[]),
            no_reboot(),
            SessionOptions::default(),
        );
        assert_eq!(session.run_menu().unwrap(), SessionOutcome::Quit);
    }

    // ── Fix ───────────────────────────────────────────────────────────────────

    #[test]
    fn test_fix_confirmed_then_reboot_accepted() {
        // Arrange
        let (manager, store) = make_manager(KMS_CONFIG);
        let mut rebooter = MockRebooter::new();
        rebooter.expect_reboot().times(1).returning(|| Ok(()));
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["1", "y", "yes"]),
            Arc::new(rebooter),
            SessionOptions::default(),
        );

        // Act
        let outcome = session.run_menu().unwrap();

        // Assert
        match outcome {
            SessionOutcome::Fixed { report, reboot } => {
                assert_eq!(report.outcome, FixOutcome::CommentedAndAdded);
                assert_eq!(reboot, RebootStatus::Requested);
            }
            other => panic!("unexpected outcome {other:?}"),
        }
        assert!(store.config_text().contains("#dtoverlay=vc4-kms-v3d"));
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[test]
    fn test_fix_declined_writes_nothing() {
        let (manager, store) = make_manager(KMS_CONFIG);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["n"]),
            no_reboot(),
            SessionOptions::default(),
        );

        let outcome = session.run_fix().unwrap();

        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert_eq!(store.config_text(), KMS_CONFIG);
        assert_eq!(store.backup_count(), 0);
    }

    #[test]
    fn test_fix_with_assume_yes_still_asks_about_reboot() {
        let (manager, _) = make_manager(KMS_CONFIG);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["no"]),
            no_reboot(),
            SessionOptions {
                assume_yes: true,
                reboot: RebootPolicy::Ask,
            },
        );

        let outcome = session.run_fix().unwrap();

        assert!(matches!(
            outcome,
            SessionOutcome::Fixed {
                reboot: RebootStatus::Declined,
                ..
            }
        ));
        assert!(session.prompter().transcript().contains("Reboot later"));
    }

    #[test]
    fn test_fix_without_changes_does_not_offer_reboot() {
        let (manager, store) = make_manager("dtoverlay=vc4-fkms-v3d\n");
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&[]),
            no_reboot(),
            SessionOptions {
                assume_yes: true,
                reboot: RebootPolicy::Always,
            },
        );

        let outcome = session.run_fix().unwrap();

        assert!(matches!(
            outcome,
            SessionOutcome::Fixed {
                reboot: RebootStatus::NotNeeded,
                ..
            }
        ));
        assert_eq!(store.backup_count(), 1);
    }

    #[test]
    fn test_reboot_failure_is_reported_not_fatal() {
        let (manager, store) = make_manager(KMS_CONFIG);
        let mut rebooter = MockRebooter::new();
        rebooter
            .expect_reboot()
            .times(1)
            .returning(|| Err(RebootError::NoCommand));
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&[]),
            Arc::new(rebooter),
            SessionOptions {
                assume_yes: true,
                reboot: RebootPolicy::Always,
            },
        );

        let outcome = session.run_fix().unwrap();

        assert!(matches!(
            outcome,
            SessionOutcome::Fixed {
                reboot: RebootStatus::Failed(_),
                ..
            }
        ));
        assert!(store.config_text().contains("dtoverlay=vc4-fkms-v3d"));
        assert!(session.prompter().transcript().contains("Reboot failed"));
    }

    #[test]
    fn test_fix_error_propagates() {
        let (manager, store) = make_manager(KMS_CONFIG);
        store.fail_backups(true);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&[]),
            no_reboot(),
            SessionOptions {
                assume_yes: true,
                reboot: RebootPolicy::Never,
            },
        );

        let err = session.run_fix().unwrap_err();

        assert!(matches!(err, SessionError::Overlay(OverlayError::Backup { .. })));
        assert_eq!(store.config_text(), KMS_CONFIG);
    }

    // ── Restore ───────────────────────────────────────────────────────────────

    #[test]
    fn test_restore_with_no_backups() {
        let (manager, _) = make_manager(KMS_CONFIG);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["2"]),
            no_reboot(),
            SessionOptions::default(),
        );

        let outcome = session.run_menu().unwrap();

        assert_eq!(outcome, SessionOutcome::NoBackups);
        assert!(session.prompter().transcript().contains("No backups found"));
    }

    #[test]
    fn test_restore_by_number_after_exact_yes() {
        // Arrange
        let (manager, store) = make_manager(KMS_CONFIG);
        manager.fix().unwrap();
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["2", "1", "yes", "n"]),
            no_reboot(),
            SessionOptions::default(),
        );

        // Act
        let outcome = session.run_menu().unwrap();

        // Assert
        assert!(matches!(
            outcome,
            SessionOutcome::Restored {
                reboot: RebootStatus::Declined,
                ..
            }
        ));
        assert_eq!(store.config_text(), KMS_CONFIG);
        assert!(session
            .prompter()
            .transcript()
            .contains("1) config.txt.backup.20240101120000  [2024-01-01 12:00:00]"));
    }

    #[test]
    fn test_restore_requires_exact_yes() {
        let (manager, store) = make_manager(KMS_CONFIG);
        manager.fix().unwrap();
        let fixed = store.config_text();
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["y"]),
            no_reboot(),
            SessionOptions::default(),
        );

        let outcome = session
            .run_restore(Some("config.txt.backup.20240101120000"))
            .unwrap();

        assert_eq!(outcome, SessionOutcome::Cancelled);
        assert_eq!(store.config_text(), fixed);
    }

    #[test]
    fn test_restore_missing_backup_fails_before_prompting() {
        let (manager, _) = make_manager(KMS_CONFIG);
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["yes"]),
            no_reboot(),
            SessionOptions::default(),
        );

        let err = session
            .run_restore(Some("config.txt.backup.20240101120000"))
            .unwrap_err();

        assert!(matches!(err, SessionError::Overlay(OverlayError::NotFound { .. })));
        assert!(!session.prompter().transcript().contains("Type 'yes'"));
    }

    #[test]
    fn test_restore_empty_selection_cancels() {
        let (manager, _) = make_manager(KMS_CONFIG);
        manager.fix().unwrap();
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&[""]),
            no_reboot(),
            SessionOptions::default(),
        );

        assert_eq!(session.run_restore(None).unwrap(), SessionOutcome::Cancelled);
    }

    #[test]
    fn test_restore_out_of_range_number_is_invalid() {
        let (manager, _) = make_manager(KMS_CONFIG);
        manager.fix().unwrap();
        let mut session = Session::new(
            &manager,
            ScriptedPrompter::new(&["5"]),
            no_reboot(),
            SessionOptions::default(),
        );

        assert_eq!(
            session.run_restore(None).unwrap(),
            SessionOutcome::InvalidChoice("5".into())
        );
    }

    // ── Reboot ────────────────────────────────────────────────────────────────

    #[test]
    fn test_prompt_reboot_if_confirmed_false_never_reboots() {
        let (manager, _) = make_manager(KMS_CONFIG);
        let session = Session::new(
            &manager,
            ScriptedPrompter::default(),
            no_reboot(),
            SessionOptions::default(),
        );
        assert_eq!(session.prompt_reboot_if_confirmed(false), RebootStatus::Declined);
    }

    #[test]
    fn test_is_affirmative() {
        assert!(is_affirmative(Some("y")));
        assert!(is_affirmative(Some(" YES ")));
        assert!(!is_affirmative(Some("no")));
        assert!(!is_affirmative(Some("")));
        assert!(!is_affirmative(None));
    }
}
