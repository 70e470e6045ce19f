//! Read-only inspection of the audio-related settings in a boot config.
//!
//! Answers the questions an operator asks before and after running the fix:
//! is the on-board audio enabled (`dtparam=audio=on`), which graphics overlay
//! is active, and are any audio overlays (HATs, I2S DACs) configured.

use serde::Serialize;

use super::directive::{is_active, DirectivePair, LineKind};
use super::overlay::ConfigDocument;

const AUDIO_PARAM: &str = "dtparam=audio";

/// Which of the two display overlays is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayOverlay {
    /// Only the directive the fix disables (full KMS) is active.
    Kms,
    /// Only the directive the fix enables (fake KMS) is active.
    FakeKms,
    /// Both are active; the firmware applies them in order, which is rarely intended.
    Conflicting,
    /// Neither is active.
    Unset,
}

/// Snapshot of audio-related settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AudioStatus {
    /// `Some(true)` for an active `dtparam=audio=on`, `Some(false)` for any
    /// other active `dtparam=audio=` value, `None` when the line is absent.
    pub onboard_audio: Option<bool>,
    /// Active display overlay.
    pub display_overlay: DisplayOverlay,
    /// Active `dtoverlay=` lines that mention audio, trimmed.
    pub audio_overlays: Vec<String>,
}

impl AudioStatus {
    /// Returns `true` if running the fix would comment something out.
    pub fn needs_fix(&self) -> bool {
        matches!(
            self.display_overlay,
            DisplayOverlay::Kms | DisplayOverlay::Conflicting
        )
    }
}

/// Inspects `doc` for audio-related settings.
///
/// When several active `dtparam=audio` lines exist the last one wins, as it
/// does in the firmware.
pub fn inspect_audio(doc: &ConfigDocument, pair: &DirectivePair) -> AudioStatus {
    let mut onboard_audio = None;
    let mut audio_overlays = Vec::new();
    let mut kms = false;
    let mut fkms = false;

    for line in doc.lines() {
        match pair.classify(line) {
            LineKind::ActiveDisable => kms = true,
            LineKind::ActiveEnable => fkms = true,
            _ => {}
        }
        if !is_active(line) {
            continue;
        }
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix(AUDIO_PARAM) {
            if let Some(value) = rest.strip_prefix('=') {
                onboard_audio = Some(value.trim() == "on");
            }
        }
        if trimmed.starts_with("dtoverlay=") && trimmed.to_ascii_lowercase().contains("audio") {
            audio_overlays.push(trimmed.to_string());
        }
    }

    let display_overlay = match (kms, fkms) {
        (true, true) => DisplayOverlay::Conflicting,
        (true, false) => DisplayOverlay::Kms,
        (false, true) => DisplayOverlay::FakeKms,
        (false, false) => DisplayOverlay::Unset,
    };

    AudioStatus {
        onboard_audio,
        display_overlay,
        audio_overlays,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
