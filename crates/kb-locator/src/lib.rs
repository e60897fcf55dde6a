//! Binding file resolution and lock-aware file reading.
//!
//! This crate answers two questions for the tracker:
//!
//! - *Where is the binding file?* [`LocationResolver`] walks the installation
//!   roots in a fixed order ([`InstallationCandidate::ALL`]) and, inside each
//!   root, the naming schemes ([`ExtensionVariant::ALL`]). The first file
//!   that exists wins.
//! - *What does it say right now?* [`ContendedFileReader`] waits for the game
//!   to finish writing, probes for an exclusive open with a bounded number of
//!   retries, then reads the file in shared mode.
//!
//! # Resolution Order
//!
//! ```text
//! Default      × .3.0.binds ─► Default      × .binds
//!   ─► StorefrontA × .3.0.binds ─► StorefrontA × .binds
//!   ─► StorefrontB × .3.0.binds ─► StorefrontB × .binds
//! ```
//!
//! Storefront roots come from [`InstallProbe`]s. A probe that finds nothing
//! skips its root entirely.
//!
//! # Usage
//!
//! ```no_run
//! use kb_core::{ProfileName, ReaderConfig};
//! use kb_locator::{ContendedFileReader, LocationResolver};
//! use camino::Utf8PathBuf;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let resolver = LocationResolver::new(Some(Utf8PathBuf::from("/binds")));
//! let profile = ProfileName::from_pointer_contents("Custom1").unwrap();
//! let descriptor = resolver.resolve(&profile)?;
//!
//! let reader = ContendedFileReader::new(ReaderConfig::default());
//! let contents = reader.read(&descriptor.path()).await?;
//! println!("{} bytes", contents.len());
//! # Ok(())
//! # }
//! ```
//!
//! [`InstallationCandidate::ALL`]: kb_core::InstallationCandidate::ALL
//! [`ExtensionVariant::ALL`]: kb_core::ExtensionVariant::ALL

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod error;
pub mod lock;
pub mod probe;
pub mod reader;
pub mod resolver;

pub use error::{ReadError, ResolveError};
pub use lock::{ExclusiveOpenProbe, LockProbe, LockState};
pub use probe::{FixedRoot, InstallProbe, NoInstall};
pub use reader::ContendedFileReader;
pub use resolver::{CandidatePath, LocationResolver};
