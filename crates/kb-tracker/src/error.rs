//! Error types for the kb-tracker crate.
//!
//! This module provides the [`TrackerError`] type. Almost every variant is
//! handled inside the reload pass: the orchestrator logs it and carries on
//! with stale or absent bindings. Only spawning and shutting down the
//! tracker return errors to the caller.

use camino::Utf8PathBuf;
use kb_core::ConfigError;
use kb_locator::{ReadError, ResolveError};
use kb_watcher::WatchError;

use crate::parser::ParseError;

/// Errors that can occur while tracking key bindings.
///
/// # Error Recovery Strategy
///
/// - **Config** ([`TrackerError::Config`]): Fatal - the tracker cannot start
/// - **Task failed** ([`TrackerError::TaskFailed`]): Fatal - the reload task panicked
/// - Everything else: Recoverable - logged, previous or no bindings kept
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The bindings directory holding the pointer file does not exist.
    #[error("bindings directory does not exist: {0}")]
    DirectoryMissing(Utf8PathBuf),

    /// The pointer file names a profile with no binding file.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A file could not be read.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// The binding file could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A watcher could not be armed.
    #[error("failed to watch {target}: {source}")]
    WatchSetup {
        /// The file that could not be watched.
        target: Utf8PathBuf,
        /// The underlying watcher error.
        #[source]
        source: WatchError,
    },

    /// The reload task ended abnormally.
    #[error("reload task failed")]
    TaskFailed,
}

impl TrackerError {
    /// Creates a new [`TrackerError::WatchSetup`] error.
    #[inline]
    pub fn watch_setup(target: impl Into<Utf8PathBuf>, source: WatchError) -> Self {
        Self::WatchSetup {
            target: target.into(),
            source,
        }
    }

    /// Returns `true` if the tracker keeps running after this error.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Config(_) | Self::TaskFailed)
    }

    /// Returns `true` if the tracker cannot continue.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_missing_is_recoverable() {
        let err = TrackerError::DirectoryMissing(Utf8PathBuf::from("/binds"));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("/binds"));
    }

    #[test]
    fn test_config_is_fatal() {
        let err = TrackerError::from(ConfigError::NoBindingsDirectory);
        assert!(err.is_fatal());
    }

    #[test]
    fn test_watch_setup_display() {
        let err = TrackerError::watch_setup(
            "/binds/StartPreset.start",
            WatchError::directory_missing("/binds"),
        );
        assert!(err.is_recoverable());
        assert!(err.to_string().starts_with("failed to watch /binds/StartPreset.start"));
    }

    #[test]
    fn test_read_error_passes_through() {
        let err = TrackerError::from(ReadError::Empty(Utf8PathBuf::from("/binds/x.start")));
        assert_eq!(err.to_string(), "file is empty: /binds/x.start");
    }

    #[test]
    fn test_parse_error_is_recoverable() {
        let err = TrackerError::from(ParseError::new("unexpected end of document"));
        assert!(err.is_recoverable());
        assert!(err.to_string().contains("unexpected end of document"));
    }
}
