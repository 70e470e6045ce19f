//! Host reboot through an external command.

use std::process::Command;

use tracing::info;

use crate::application::session::{RebootError, Rebooter};

/// Runs a configured command (default `systemctl reboot`) to restart the host.
#[derive(Debug, Clone)]
pub struct CommandRebooter {
    command: Vec<String>,
}

impl CommandRebooter {
    pub fn new(command: Vec<String>) -> Self {
        Self { command }
    }

    fn display(&self) -> String {
        self.command.join(" ")
    }
}

impl Rebooter for CommandRebooter {
    fn reboot(&self) -> Result<(), RebootError> {
        let (program, args) = self.command.split_first().ok_or(RebootError::NoCommand)?;
        info!(command = %self.display(), "running reboot command");

        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|source| RebootError::Spawn {
                command: self.display(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(RebootError::Failed {
                command: self.display(),
                status: status.to_string(),
            })
        }
    }
}
