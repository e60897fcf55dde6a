//! Error types for the kb-watcher crate.
//!
//! This module provides the [`WatchError`] type for errors that can occur
//! while arming a watcher.

use camino::Utf8PathBuf;

/// Errors that can occur when starting a [`DebouncedWatcher`](crate::DebouncedWatcher).
///
/// Stopping never fails.
///
/// # Error Recovery Strategy
///
/// - **Directory missing** ([`WatchError::DirectoryMissing`]): Recoverable - retry on the next reload
/// - **Notify errors** ([`WatchError::Notify`]): Recoverable - the subscription is simply absent
/// - **No runtime** ([`WatchError::NoRuntime`]): Fatal - called outside a tokio runtime
///
/// # Examples
///
/// ```
/// use kb_watcher::WatchError;
///
/// fn handle_error(err: WatchError) {
///     if err.is_fatal() {
///         eprintln!("Fatal watcher error: {err}");
///     } else {
///         eprintln!("Watcher not armed: {err}");
///     }
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// The directory to watch does not exist.
    #[error("watch directory does not exist: {0}")]
    DirectoryMissing(Utf8PathBuf),

    /// The notify subscription could not be established.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// `start` was called outside a tokio runtime.
    #[error("no tokio runtime available for the debounce task")]
    NoRuntime,
}

impl WatchError {
    /// Creates a new [`WatchError::DirectoryMissing`] error.
    #[inline]
    pub fn directory_missing(path: impl Into<Utf8PathBuf>) -> Self {
        Self::DirectoryMissing(path.into())
    }

    /// Returns `true` if this error is fatal (watching can never succeed).
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::NoRuntime)
    }

    /// Returns `true` if a later attempt may succeed.
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !self.is_fatal()
    }

    /// Returns the directory associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::DirectoryMissing(path) => Some(path),
            Self::Notify(_) | Self::NoRuntime => None,
        }
    }
}
