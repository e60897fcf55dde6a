//! Reading files that the game may be writing at the same moment.
//!
//! A change notification usually fires while the game is still writing, and
//! the game never swaps files atomically. [`ContendedFileReader`] therefore:
//!
//! 1. waits a short settle delay,
//! 2. probes for exclusive access, retrying up to `max_attempts` times with
//!    `retry_interval` between probes,
//! 3. reads the whole file in shared mode.
//!
//! Waiting suspends only the calling task. The tracker calls the reader from
//! its single reload task, never from a notification thread.

use camino::Utf8Path;
use tracing::{debug, trace, warn};

use kb_core::ReaderConfig;

use crate::error::ReadError;
use crate::lock::{ExclusiveOpenProbe, LockProbe, LockState};

/// Lock-aware reader with bounded retry.
///
/// # Examples
///
/// ```no_run
/// use kb_core::ReaderConfig;
/// use kb_locator::ContendedFileReader;
/// use camino::Utf8Path;
///
/// # async fn example() -> Result<(), kb_locator::ReadError> {
/// let reader = ContendedFileReader::new(ReaderConfig::default());
/// let profile = reader.read(Utf8Path::new("/binds/StartPreset.start")).await?;
/// println!("active preset: {}", profile.trim());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ContendedFileReader<P = ExclusiveOpenProbe> {
    config: ReaderConfig,
    probe: P,
}

impl ContendedFileReader {
    /// Creates a reader using [`ExclusiveOpenProbe`].
    #[must_use]
    pub const fn new(config: ReaderConfig) -> Self {
        Self::with_probe(config, ExclusiveOpenProbe)
    }
}

impl<P: LockProbe> ContendedFileReader<P> {
    /// Creates a reader with a custom lock probe.
    #[must_use]
    pub const fn with_probe(config: ReaderConfig, probe: P) -> Self {
        Self { config, probe }
    }

    /// Returns the reader's timing configuration.
    #[must_use]
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Reads the whole file as text once the owner has released it.
    ///
    /// Invalid UTF-8 sequences are replaced rather than rejected.
    ///
    /// # Errors
    ///
    /// - [`ReadError::NotFound`] if the file does not exist
    /// - [`ReadError::Locked`] if every probe found the file locked
    /// - [`ReadError::Empty`] if the file holds only whitespace
    /// - [`ReadError::Io`] if reading fails
    pub async fn read(&self, path: &Utf8Path) -> Result<String, ReadError> {
        tokio::time::sleep(self.config.settle_delay()).await;

        self.wait_until_unlocked(path).await?;

        let bytes = tokio::fs::read(path)
            .await
            .map_err(|err| ReadError::io(path, err))?;
        let contents = String::from_utf8_lossy(&bytes).into_owned();

        if contents.trim().is_empty() {
            debug!(path = %path, "File is empty");
            return Err(ReadError::Empty(path.to_owned()));
        }

        trace!(path = %path, bytes = bytes.len(), "Read file");
        Ok(contents)
    }

    async fn wait_until_unlocked(&self, path: &Utf8Path) -> Result<(), ReadError> {
        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.probe.probe(path) {
                LockState::Unlocked => return Ok(()),
                LockState::Missing => return Err(ReadError::NotFound(path.to_owned())),
                LockState::Locked => {
                    trace!(path = %path, attempt, "File is locked");
                    if attempt < max_attempts {
                        tokio::time::sleep(self.config.retry_interval()).await;
                    }
                }
            }
        }

        warn!(path = %path, attempts = max_attempts, "File stayed locked, giving up");
        Err(ReadError::Locked {
            path: path.to_owned(),
            attempts: max_attempts,
        })
    }
}
