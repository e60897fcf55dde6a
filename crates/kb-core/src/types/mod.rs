//! Domain types for the key-binding tracker.
//!
//! # Module Organization
//!
//! - [`install`] - Installation candidates and extension variants, in resolution order
//! - [`profile`] - The active profile name read from the pointer file
//! - [`target`] - Watched file targets and resolved binding file descriptors
//!
//! All public types are re-exported at this module level and at the crate root:
//!
//! ```
//! use kb_core::{BindingFileDescriptor, InstallationCandidate, ProfileName};
//! ```

pub mod install;
pub mod profile;
pub mod target;

pub use install::{ExtensionVariant, InstallationCandidate};
pub use profile::ProfileName;
pub use target::{BindingFileDescriptor, WatchTarget};
