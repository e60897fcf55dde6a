//! Lock probing for files the game may be writing.
//!
//! The game rewrites its option files in place. On Windows it holds the file
//! without sharing while it writes, so an open that refuses to share tells
//! us whether the write is finished. Other platforms have no mandatory share
//! locks; there the probe only reports whether the file can be opened.

use std::fs::{File, OpenOptions};
use std::io;

use camino::Utf8Path;

/// Result of probing a file for exclusive access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// The file can be opened exclusively.
    Unlocked,
    /// Someone else holds the file.
    Locked,
    /// The file does not exist.
    Missing,
}

/// Decides whether a file is currently held by another process.
///
/// Implementations must be cheap: the reader calls them in a retry loop.
pub trait LockProbe: Send + Sync + 'static {
    /// Probes the file once.
    fn probe(&self, path: &Utf8Path) -> LockState;
}

/// Probes by attempting an exclusive, non-sharing open.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExclusiveOpenProbe;

impl LockProbe for ExclusiveOpenProbe {
    fn probe(&self, path: &Utf8Path) -> LockState {
        match open_exclusive(path) {
            Ok(_file) => LockState::Unlocked,
            Err(err) if err.kind() == io::ErrorKind::NotFound => LockState::Missing,
            Err(err) => {
                tracing::trace!(path = %path, error = %err, "Exclusive open refused");
                LockState::Locked
            }
        }
    }
}

#[cfg(windows)]
fn open_exclusive(path: &Utf8Path) -> io::Result<File> {
    use std::os::windows::fs::OpenOptionsExt;

    OpenOptions::new().read(true).share_mode(0).open(path)
}

#[cfg(not(windows))]
fn open_exclusive(path: &Utf8Path) -> io::Result<File> {
    OpenOptions::new().read(true).open(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;

    #[test]
    fn test_probe_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("absent.binds")).unwrap();
        assert_eq!(ExclusiveOpenProbe.probe(&path), LockState::Missing);
    }

    #[test]
    fn test_probe_unlocked_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("free.binds")).unwrap();
        std::fs::write(&path, "<Root/>").unwrap();
        assert_eq!(ExclusiveOpenProbe.probe(&path), LockState::Unlocked);
    }

    #[cfg(windows)]
    #[test]
    fn test_probe_file_held_without_sharing() {
        use std::os::windows::fs::OpenOptionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::from_path_buf(dir.path().join("held.binds")).unwrap();
        std::fs::write(&path, "<Root/>").unwrap();
        let _held = OpenOptions::new()
            .write(true)
            .share_mode(0)
            .open(&path)
            .unwrap();

        assert_eq!(ExclusiveOpenProbe.probe(&path), LockState::Locked);
    }
}
