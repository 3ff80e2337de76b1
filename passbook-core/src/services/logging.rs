//! Logging setup - tracing subscriber for front ends
//!
//! The core only emits `tracing` events; whichever front end embeds it
//! installs the subscriber once at startup. Output goes to stderr so that
//! JSON written to stdout stays clean.

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Environment variable holding an `EnvFilter` directive
pub const LOG_ENV: &str = "PASSBOOK_LOG";

/// Entry point for the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryPoint {
    /// Interactive terminal: compact lines without timestamps
    Cli,
    /// Library embedded in a longer-running host: timestamped lines
    Embedded,
}

impl EntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryPoint::Cli => "cli",
            EntryPoint::Embedded => "embedded",
        }
    }
}

/// Default filter directive when PASSBOOK_LOG is unset
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "warn,passbook_core=debug,passbook_cli=debug"
    } else {
        "warn"
    }
}

/// Install the global subscriber
///
/// Returns false when a subscriber was already installed; that is not an
/// error, a host may have set up its own.
pub fn init_logging(entry_point: EntryPoint, verbose: bool) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let installed = match entry_point {
        EntryPoint::Cli => builder.without_time().with_target(false).try_init().is_ok(),
        EntryPoint::Embedded => builder.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(entry_point = entry_point.as_str(), "logging initialised");
    }
    installed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let _ = init_logging(EntryPoint::Embedded, false);
        assert!(!init_logging(EntryPoint::Cli, true));
    }

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive(false), "warn");
        assert!(default_directive(true).contains("passbook_core=debug"));
    }
}
