//! Directive matching for line-oriented boot config files.
//!
//! A *directive* is a `key=value` line such as `dtoverlay=vc4-kms-v3d`.  It is
//! recognised by substring match anywhere in a line, but only counts as
//! *active* when the line's first non-whitespace character is not the comment
//! marker.
//!
//! ```text
//! dtoverlay=vc4-kms-v3d          active, matches "dtoverlay=vc4-kms-v3d"
//!   dtoverlay=vc4-kms-v3d,cma-64 active, matches (substring)
//! #dtoverlay=vc4-kms-v3d         commented
//!  # dtoverlay=vc4-kms-v3d       commented (leading whitespace is ignored)
//! ```

use thiserror::Error;

/// Character that starts a comment in `config.txt`.
pub const COMMENT_MARKER: char = '#';

/// Directive disabled by the fix (full KMS graphics driver).
pub const DEFAULT_DISABLE_DIRECTIVE: &str = "dtoverlay=vc4-kms-v3d";

/// Directive enabled by the fix (fake KMS graphics driver).
pub const DEFAULT_ENABLE_DIRECTIVE: &str = "dtoverlay=vc4-fkms-v3d";

/// Errors raised when constructing directives.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectiveError {
    /// The pattern is empty or whitespace only.
    #[error("directive pattern must not be empty")]
    Empty,

    /// The pattern starts with the comment marker and would never be active.
    #[error("directive pattern must not start with '#': {0}")]
    Commented(String),

    /// The pattern spans more than one line.
    #[error("directive pattern must be a single line: {0:?}")]
    Multiline(String),

    /// One pattern is a substring of the other, so lines could not be told apart.
    #[error("directive patterns overlap: {disable:?} and {enable:?}")]
    Overlapping { disable: String, enable: String },
}

/// Returns `true` if `line` is active, i.e. its trimmed start is not a comment.
pub fn is_active(line: &str) -> bool {
    !line.trim_start().starts_with(COMMENT_MARKER)
}

/// A single directive recognised by exact substring match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pattern: String,
}

impl Directive {
    /// Creates a directive from its textual pattern.
    ///
    /// Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError`] if the pattern is empty, commented, or
    /// contains a line break.
    pub fn new(pattern: impl Into<String>) -> Result<Self, DirectiveError> {
        let pattern = pattern.into().trim().to_string();
        if pattern.is_empty() {
            return Err(DirectiveError::Empty);
        }
        if pattern.starts_with(COMMENT_MARKER) {
            return Err(DirectiveError::Commented(pattern));
        }
        if pattern.contains('\n') || pattern.contains('\r') {
            return Err(DirectiveError::Multiline(pattern));
        }
        Ok(Self { pattern })
    }

    /// The pattern text, which is also the line inserted when enabling it.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if the pattern occurs anywhere in `line`, commented or not.
    pub fn matches(&self, line: &str) -> bool {
        line.contains(&self.pattern)
    }
}

impl std::fmt::Display for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.pattern)
    }
}

/// Classification of one line relative to a [`DirectivePair`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// Active line carrying the directive to disable.
    ActiveDisable,
    /// Commented line carrying the directive to disable.
    CommentedDisable,
    /// Active line carrying the directive to enable.
    ActiveEnable,
    /// Commented line carrying the directive to enable.
    CommentedEnable,
    /// Anything else; preserved verbatim.
    Other,
}

/// The two directives the fix toggles: `disable` is commented out, `enable`
/// is ensured present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectivePair {
    pub disable: Directive,
    pub enable: Directive,
}

impl DirectivePair {
    /// Builds a pair, rejecting patterns that contain one another.
    ///
    /// # Errors
    ///
    /// Returns [`DirectiveError::Overlapping`] if either pattern is a
    /// substring of the other, or any error from [`Directive::new`].
    pub fn new(disable: &str, enable: &str) -> Result<Self, DirectiveError> {
        let disable = Directive::new(disable)?;
        let enable = Directive::new(enable)?;
        if disable.matches(enable.pattern()) || enable.matches(disable.pattern()) {
            return Err(DirectiveError::Overlapping {
                disable: disable.pattern,
                enable: enable.pattern,
            });
        }
        Ok(Self { disable, enable })
    }

    /// Classifies a line.  The disable directive is checked first.
    pub fn classify(&self, line: &str) -> LineKind {
        let active = is_active(line);
        if self.disable.matches(line) {
            if active {
                LineKind::ActiveDisable
            } else {
                LineKind::CommentedDisable
            }
        } else if self.enable.matches(line) {
            if active {
                LineKind::ActiveEnable
            } else {
                LineKind::CommentedEnable
            }
        } else {
            LineKind::Other
        }
    }
}

impl Default for DirectivePair {
    /// KMS → FKMS, the pair the audio fix was written for.
    fn default() -> Self {
        Self {
            disable: Directive {
                pattern: DEFAULT_DISABLE_DIRECTIVE.to_string(),
            },
            enable: Directive {
                pattern: DEFAULT_ENABLE_DIRECTIVE.to_string(),
            },
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
