//! Error types for the kb-locator crate.
//!
//! - [`ResolveError`] - no installation root holds a binding file for the profile
//! - [`ReadError`] - a file could not be read after settling and lock retries

use camino::Utf8PathBuf;
use kb_core::ProfileName;
use smallvec::SmallVec;

/// Paths tried during one resolution, in order.
pub type TriedPaths = SmallVec<[Utf8PathBuf; 6]>;

/// Errors returned by [`LocationResolver::resolve`](crate::LocationResolver::resolve).
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// No candidate root and extension combination exists on disk.
    ///
    /// Callers must drop any previously resolved descriptor.
    #[error("no binding file for profile '{profile}' ({} paths tried)", .tried.len())]
    NotFound {
        /// The profile that was looked up.
        profile: ProfileName,
        /// Every path that was checked, in resolution order.
        tried: TriedPaths,
    },
}

impl ResolveError {
    /// Returns the paths checked before giving up.
    #[must_use]
    pub fn tried(&self) -> &[Utf8PathBuf] {
        match self {
            Self::NotFound { tried, .. } => tried,
        }
    }
}

/// Errors returned by [`ContendedFileReader::read`](crate::ContendedFileReader::read).
///
/// # Error Recovery Strategy
///
/// None of these are fatal to the tracker:
///
/// - **Missing / empty** ([`ReadError::NotFound`], [`ReadError::Empty`]): treated alike, nothing to load
/// - **Locked** ([`ReadError::Locked`]): keep the previous state, the next change retries
/// - **I/O** ([`ReadError::Io`]): log and keep the previous state
///
/// # Examples
///
/// ```
/// use kb_locator::ReadError;
/// use camino::Utf8PathBuf;
///
/// let err = ReadError::Locked { path: Utf8PathBuf::from("/binds/a.binds"), attempts: 6 };
/// assert!(!err.is_missing());
/// assert!(err.to_string().contains("6 attempts"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(Utf8PathBuf),

    /// The file exists but holds nothing but whitespace.
    #[error("file is empty: {0}")]
    Empty(Utf8PathBuf),

    /// The file stayed locked by its owner for every probe.
    #[error("file still locked after {attempts} attempts: {path}")]
    Locked {
        /// The locked file.
        path: Utf8PathBuf,
        /// Number of lock probes made.
        attempts: u32,
    },

    /// Reading the file failed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The file being read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl ReadError {
    /// Creates a [`ReadError::Io`], mapping "not found" to [`ReadError::NotFound`].
    pub fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source }
        }
    }

    /// Returns `true` if there was nothing to read (missing or empty file).
    #[inline]
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Empty(_))
    }

    /// Returns the path of the file that failed.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::NotFound(path) | Self::Empty(path) => path,
            Self::Locked { path, .. } | Self::Io { path, .. } => path,
        }
    }
}
