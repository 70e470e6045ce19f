//! # bootcfg-core
//!
//! Shared library for `fix-pi-audio` containing the boot-config line model,
//! the overlay fix rule table, the backup naming scheme, and the audio status
//! inspection.
//!
//! It has zero dependencies on the file system, the terminal, or the process
//! environment.  Everything here operates on in-memory text so it can be
//! tested without root access or a Raspberry Pi.
//!
//! # Architecture overview (for beginners)
//!
//! A Raspberry Pi reads `config.txt` from its boot partition before the kernel
//! starts.  One line in that file selects the graphics driver overlay:
//!
//! ```text
//! dtoverlay=vc4-kms-v3d     # full KMS driver (default on newer images)
//! dtoverlay=vc4-fkms-v3d    # "fake" KMS driver (keeps legacy audio routing)
//! ```
//!
//! With the full KMS driver some boards lose their analog/HDMI audio device,
//! which silences the announcement player.  The fix is to comment out the KMS
//! line and enable the FKMS line instead.
//!
//! This crate defines:
//!
//! - **`domain::directive`** – How a single line is recognised: active vs.
//!   commented, and which overlay directive (if any) it carries.
//!
//! - **`domain::overlay`** – The [`ConfigDocument`] line model and
//!   [`plan_fix`], the small rule table that turns the current document into
//!   the patched one.
//!
//! - **`domain::backup`** – The `<config>.backup.<YYYYMMDDHHMMSS>` naming
//!   scheme and its parser.
//!
//! - **`domain::audio`** – A read-only inspection that reports the audio-related
//!   settings found in the document.

pub mod domain;

// Re-export the most-used types at the crate root so callers can write
// `bootcfg_core::ConfigDocument` instead of the full module path.
pub use domain::audio::{inspect_audio, AudioStatus, DisplayOverlay};
pub use domain::backup::{BackupId, BackupNameError, BACKUP_INFIX, TIMESTAMP_FORMAT};
pub use domain::directive::{Directive, DirectiveError, DirectivePair, LineKind, COMMENT_MARKER};
pub use domain::overlay::{plan_fix, ConfigDocument, FixOutcome, FixPlan, LineEnding};
