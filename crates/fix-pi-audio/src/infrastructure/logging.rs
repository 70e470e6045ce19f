//! tracing subscriber setup.
//!
//! Logs go to stderr so the menu on stdout stays readable and `--json`
//! output stays machine-parseable.  `RUST_LOG` overrides the level from the
//! settings file.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Log line format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("could not install log subscriber: {0}")]
    Init(String),
}

/// Filter from `RUST_LOG`, else `level`, else `info`.
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global subscriber.  Call once, early in `main`.
///
/// # Errors
///
/// Returns [`LoggingError::Init`] if a global subscriber is already set.
pub fn init_logging(level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_filter(level))
        .with_writer(std::io::stderr);

    let result = match format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    result.map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        // The only test in this crate that installs a global subscriber.
        assert!(init_logging("debug", LogFormat::Text).is_ok());
        assert!(matches!(
            init_logging("debug", LogFormat::Json),
            Err(LoggingError::Init(_))
        ));
    }
}
