//! Core types, errors, and configuration for the key-binding tracker.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - [`ConfigError`] for configuration loading and validation
//! - Configuration structures ([`Config`], [`PathsConfig`], [`ReaderConfig`],
//!   [`WatchConfig`], [`TrackerConfig`])
//! - Domain types ([`InstallationCandidate`], [`ExtensionVariant`],
//!   [`ProfileName`], [`BindingFileDescriptor`], [`WatchTarget`])
//!
//! # Crate Dependencies
//!
//! ```text
//! kb-cli ──► kb-tracker ──► kb-locator ──► kb-core
//!                       └─► kb-watcher ──► kb-core
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

pub use config::{
    Config, PathsConfig, ReaderConfig, TrackerConfig, WatchConfig, default_bindings_dir,
};
pub use error::ConfigError;
pub use types::{
    BindingFileDescriptor, ExtensionVariant, InstallationCandidate, ProfileName, WatchTarget,
};
