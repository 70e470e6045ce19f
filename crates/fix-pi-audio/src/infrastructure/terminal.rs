//! Line-based terminal prompter.

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use crate::application::session::{PromptError, Prompter};

/// Talks to the operator over any reader/writer pair.
///
/// Production code uses [`TerminalPrompter::stdio`]; tests pass byte slices.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }
}

impl TerminalPrompter<StdinLock<'static>, Stdout> {
    /// Prompter on the process's stdin and stdout.
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn say(&mut self, line: &str) -> Result<(), PromptError> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn ask(&mut self, question: &str) -> Result<Option<String>, PromptError> {
        write!(self.output, "{question}")?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            // Keep the next output off the prompt line.
            writeln!(self.output)?;
            return Ok(None);
        }
        if answer.ends_with('\n') {
            answer.pop();
            if answer.ends_with('\r') {
                answer.pop();
            }
        }
        Ok(Some(answer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ask_strips_line_terminator_only() {
        // Arrange
        let mut prompter = TerminalPrompter::new(&b" yes \r\nsecond\n"[..], Vec::new());

        // Act
        let first = prompter.ask("? ").unwrap();
        let second = prompter.ask("? ").unwrap();

        // Assert
        assert_eq!(first.as_deref(), Some(" yes "));
        assert_eq!(second.as_deref(), Some("second"));
    }

    #[test]
    fn test_ask_returns_none_at_eof() {
        let mut prompter = TerminalPrompter::new(&b""[..], Vec::new());
        assert_eq!(prompter.ask("Choose: ").unwrap(), None);
        assert_eq!(prompter.into_output(), b"Choose: \n");
    }

    #[test]
    fn test_last_line_without_newline_is_returned() {
        let mut prompter = TerminalPrompter::new(&b"q"[..], Vec::new());
        assert_eq!(prompter.ask("").unwrap().as_deref(), Some("q"));
    }

    #[test]
    fn test_say_writes_whole_line() {
        let mut prompter = TerminalPrompter::new(&b""[..], Vec::new());
        prompter.say("hello").unwrap();
        assert_eq!(prompter.into_output(), b"hello\n");
    }
}
