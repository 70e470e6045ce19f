//! Line-oriented document model and the overlay fix rule table.
//!
//! [`plan_fix`] takes the current [`ConfigDocument`] and returns a
//! [`FixPlan`]: the patched document plus a record of which rule fired.  It
//! never touches the file system, so every branch can be tested directly on
//! string input.
//!
//! # The rule table
//!
//! | Active disable line? | Enable pattern anywhere? | Action                                     | Outcome             |
//! |----------------------|--------------------------|--------------------------------------------|---------------------|
//! | yes                  | no                       | comment it, insert enable line right after | `CommentedAndAdded` |
//! | yes                  | yes                      | comment it                                 | `CommentedOnly`     |
//! | no                   | yes                      | nothing                                    | `AlreadyFine`       |
//! | no                   | no                       | append enable line at end of file          | `Appended`          |
//!
//! Every active disable line is commented, not just the first, and any active
//! enable line after the first is commented as well.  After the plan is
//! applied the document therefore holds zero active disable lines and at most
//! one active enable line, and planning again yields `AlreadyFine` with no
//! changes.

use std::fmt;

use tracing::debug;

use super::directive::{DirectivePair, LineKind, COMMENT_MARKER};

/// Line terminator used when rendering a [`ConfigDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }
}

/// The text of a boot config file split into lines.
///
/// The terminator of the first line decides the document's [`LineEnding`];
/// lines are stored without it and every line, inserted ones included, is
/// rendered with it.  A file with consistent endings therefore renders
/// byte-identically to its input.  Mixed endings are normalised when the
/// document is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigDocument {
    lines: Vec<String>,
    ending: LineEnding,
    trailing_newline: bool,
}

impl ConfigDocument {
    /// Parses file text into lines.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        let ending = match text.find('\n') {
            Some(i) if text[..i].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        };
        let trailing_newline = text.ends_with('\n');
        let body = if trailing_newline {
            &text[..text.len() - 1]
        } else {
            text
        };

        let mut lines: Vec<String> = body.split('\n').map(str::to_string).collect();
        if ending == LineEnding::CrLf {
            // Only lines that were followed by '\n' lost a terminator; a
            // trailing '\r' on an unterminated last line is content.
            let terminated = if trailing_newline {
                lines.len()
            } else {
                lines.len() - 1
            };
            for line in &mut lines[..terminated] {
                if line.ends_with('\r') {
                    line.pop();
                }
            }
        }
        Self {
            lines,
            ending,
            trailing_newline,
        }
    }

    /// Builds a document from individual lines, terminated by a final newline.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        let trailing_newline = !lines.is_empty();
        Self {
            lines,
            ending: LineEnding::Lf,
            trailing_newline,
        }
    }

    /// The lines without terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns `true` if the document has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.ending
    }

    /// Returns `true` if the document uses CRLF line endings.
    pub fn uses_crlf(&self) -> bool {
        self.ending == LineEnding::CrLf
    }

    /// Classifies every line against `pair`.
    pub fn classify(&self, pair: &DirectivePair) -> Vec<LineKind> {
        self.lines.iter().map(|l| pair.classify(l)).collect()
    }

    /// Serialises the document back to file text.
    pub fn render(&self) -> String {
        let eol = self.ending.as_str();
        let mut out = self.lines.join(eol);
        if self.trailing_newline {
            out.push_str(eol);
        }
        out
    }
}

/// Which branch of the rule table was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixOutcome {
    /// Disable line commented out and enable line inserted after it.
    CommentedAndAdded,
    /// Disable line commented out; enable pattern was already present.
    CommentedOnly,
    /// No active disable line and the enable pattern already present.
    AlreadyFine,
    /// No active disable line; enable line appended at end of file.
    Appended,
}

impl FixOutcome {
    /// Short human-readable summary shown to the operator.
    pub fn summary(self) -> &'static str {
        match self {
            Self::CommentedAndAdded => "commented out the disabled overlay and added the replacement",
            Self::CommentedOnly => "commented out the disabled overlay; replacement already present",
            Self::AlreadyFine => "overlay already configured; nothing to change",
            Self::Appended => "appended the replacement overlay to the end of the file",
        }
    }
}

impl fmt::Display for FixOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.summary())
    }
}

/// Result of [`plan_fix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixPlan {
    /// Branch of the rule table taken.
    pub outcome: FixOutcome,
    /// The patched document.
    pub document: ConfigDocument,
    /// Indices (in the original document) of disable lines that were commented.
    pub commented: Vec<usize>,
    /// Index (in the patched document) of the inserted or appended enable line.
    pub inserted_at: Option<usize>,
    /// Indices (in the original document) of duplicate active enable lines that were commented.
    pub demoted_duplicates: Vec<usize>,
}

impl FixPlan {
    /// Returns `true` if the patched document differs from the original.
    pub fn changed(&self) -> bool {
        !self.commented.is_empty()
            || self.inserted_at.is_some()
            || !self.demoted_duplicates.is_empty()
    }
}

fn comment_out(line: &str) -> String {
    format!("{COMMENT_MARKER}{line}")
}

/// Applies the rule table to `doc`.
pub fn plan_fix(doc: &ConfigDocument, pair: &DirectivePair) -> FixPlan {
    let kinds = doc.classify(pair);
    let enable_present = doc.lines.iter().any(|l| pair.enable.matches(l));
    let enable_line = pair.enable.pattern().to_string();

    let mut lines = Vec::with_capacity(doc.lines.len() + 1);
    let mut commented = Vec::new();
    let mut demoted_duplicates = Vec::new();
    let mut inserted_at = None;
    let mut seen_active_enable = false;

    for (idx, (line, kind)) in doc.lines.iter().zip(&kinds).enumerate() {
        match kind {
            LineKind::ActiveDisable => {
                lines.push(comment_out(line));
                if commented.is_empty() && !enable_present {
                    inserted_at = Some(lines.len());
                    lines.push(enable_line.clone());
                }
                commented.push(idx);
            }
            LineKind::ActiveEnable if seen_active_enable => {
                lines.push(comment_out(line));
                demoted_duplicates.push(idx);
            }
            LineKind::ActiveEnable => {
                seen_active_enable = true;
                lines.push(line.clone());
            }
            _ => lines.push(line.clone()),
        }
    }

    let outcome = match (commented.is_empty(), enable_present) {
        (false, false) => FixOutcome::CommentedAndAdded,
        (false, true) => FixOutcome::CommentedOnly,
        (true, true) => FixOutcome::AlreadyFine,
        (true, false) => {
            inserted_at = Some(lines.len());
            lines.push(enable_line);
            FixOutcome::Appended
        }
    };

    // An empty file gains a terminated line; otherwise keep the original ending.
    let trailing_newline = doc.trailing_newline || doc.lines.is_empty();

    debug!(
        ?outcome,
        commented = commented.len(),
        inserted = inserted_at.is_some(),
        demoted = demoted_duplicates.len(),
        "planned overlay fix"
    );

    FixPlan {
        outcome,
        document: ConfigDocument {
            lines,
            ending: doc.ending,
            trailing_newline,
        },
        commented,
        inserted_at,
        demoted_duplicates,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
