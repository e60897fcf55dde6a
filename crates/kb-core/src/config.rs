//! Configuration structures for the key-binding tracker.
//!
//! This module provides configuration types for all components:
//!
//! - [`PathsConfig`] - Where the pointer file and installation roots live
//! - [`ReaderConfig`] - Settle delay and lock-retry policy for contended reads
//! - [`WatchConfig`] - Debounce window for file watchers
//! - [`TrackerConfig`] - Output channel sizing for the reload orchestrator
//! - [`Config`] - Root configuration combining all settings
//!
//! All configuration types implement [`Default`]. The timing defaults were
//! tuned against how the game rewrites its option files; they are plain
//! numbers, not protocol constants, and can be overridden from a JSON file.

use std::time::Duration;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name of the pointer file holding the active preset name.
pub const DEFAULT_POINTER_FILE_NAME: &str = "StartPreset.start";

/// Bindings location relative to the per-user local data directory.
const BINDINGS_SUBDIR: [&str; 4] = [
    "Frontier Developments",
    "Elite Dangerous",
    "Options",
    "Bindings",
];

/// Returns the well-known default bindings directory.
///
/// This is `<local data dir>/Frontier Developments/Elite Dangerous/Options/Bindings`,
/// or `None` when the platform has no local data directory or it is not
/// valid UTF-8.
#[must_use]
pub fn default_bindings_dir() -> Option<Utf8PathBuf> {
    let base = dirs::data_local_dir()?;
    let mut dir = Utf8PathBuf::from_path_buf(base).ok()?;
    for segment in BINDINGS_SUBDIR {
        dir.push(segment);
    }
    Some(dir)
}

/// Locations of the pointer file and the installation roots.
///
/// # Examples
///
/// ```
/// use kb_core::PathsConfig;
///
/// let config = PathsConfig::default();
/// assert_eq!(config.pointer_file_name, "StartPreset.start");
/// assert!(config.storefront_a_root.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Default-installer bindings directory.
    ///
    /// `None` means the well-known per-user location from
    /// [`default_bindings_dir`]. The pointer file lives here as well.
    pub bindings_dir: Option<Utf8PathBuf>,

    /// File name of the pointer file inside [`bindings_dir`](Self::bindings_dir).
    pub pointer_file_name: String,

    /// Bindings root of the first alternate storefront install, if known.
    pub storefront_a_root: Option<Utf8PathBuf>,

    /// Bindings root of the second alternate storefront install, if known.
    pub storefront_b_root: Option<Utf8PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            bindings_dir: None,
            pointer_file_name: DEFAULT_POINTER_FILE_NAME.to_owned(),
            storefront_a_root: None,
            storefront_b_root: None,
        }
    }
}

impl PathsConfig {
    /// Returns the configured bindings directory, falling back to the
    /// well-known default.
    #[must_use]
    pub fn resolved_bindings_dir(&self) -> Option<Utf8PathBuf> {
        self.bindings_dir.clone().or_else(default_bindings_dir)
    }

    /// Returns the absolute path of the pointer file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NoBindingsDirectory`] when no bindings directory
    /// is configured and none can be derived.
    pub fn pointer_file(&self) -> Result<Utf8PathBuf, ConfigError> {
        self.resolved_bindings_dir()
            .map(|dir| dir.join(&self.pointer_file_name))
            .ok_or(ConfigError::NoBindingsDirectory)
    }
}

/// Settle and lock-retry policy for reading files the game may be writing.
///
/// # Examples
///
/// ```
/// use kb_core::ReaderConfig;
/// use std::time::Duration;
///
/// let config = ReaderConfig::default();
/// assert_eq!(config.max_attempts, 6);
/// assert_eq!(config.settle_delay(), Duration::from_millis(100));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderConfig {
    /// Delay before the first lock probe, in milliseconds.
    pub settle_delay_ms: u64,

    /// Delay between lock probes, in milliseconds.
    pub retry_interval_ms: u64,

    /// Total number of lock probes before giving up.
    pub max_attempts: u32,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 100,
            retry_interval_ms: 100,
            max_attempts: 6,
        }
    }
}

impl ReaderConfig {
    /// Settle delay as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Retry interval as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_millis(self.retry_interval_ms)
    }
}

/// Configuration for the file watchers.
///
/// # Examples
///
/// ```
/// use kb_core::WatchConfig;
///
/// let config = WatchConfig::default();
/// assert_eq!(config.debounce_ms, 50);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Quiet window in milliseconds.
    ///
    /// Raw notifications closer together than this collapse into one change.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 50 }
    }
}

impl WatchConfig {
    /// Quiet window as a [`Duration`].
    #[inline]
    #[must_use]
    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// Configuration for the reload orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Capacity of the bindings update channel.
    pub channel_capacity: usize,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 16,
        }
    }
}

/// Root configuration for the key-binding tracker.
///
/// # Examples
///
/// ```
/// use kb_core::Config;
///
/// let config = Config::default();
/// assert!(config.validate().is_ok());
///
/// let json = serde_json::to_string_pretty(&config).unwrap();
/// assert!(json.contains("pointer_file_name"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File locations.
    pub paths: PathsConfig,

    /// Contended read policy.
    pub reader: ReaderConfig,

    /// Watcher settings.
    pub watch: WatchConfig,

    /// Orchestrator settings.
    pub tracker: TrackerConfig,
}

impl Config {
    /// Loads a configuration from a JSON file.
    ///
    /// Missing fields take their default values. The result is validated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`validate`](Self::validate).
    pub fn from_json_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks option values that would make the tracker misbehave.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for the first invalid option.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reader.max_attempts == 0 {
            return Err(ConfigError::invalid_option(
                "reader.max_attempts",
                "must be at least 1",
            ));
        }
        if self.watch.debounce_ms == 0 {
            return Err(ConfigError::invalid_option(
                "watch.debounce_ms",
                "must be greater than zero",
            ));
        }
        if self.tracker.channel_capacity == 0 {
            return Err(ConfigError::invalid_option(
                "tracker.channel_capacity",
                "must be greater than zero",
            ));
        }
        if self.paths.pointer_file_name.trim().is_empty() {
            return Err(ConfigError::invalid_option(
                "paths.pointer_file_name",
                "must not be empty",
            ));
        }
        Ok(())
    }
}
