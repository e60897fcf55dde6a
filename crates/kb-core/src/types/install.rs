//! Installation candidates and binding file extension variants.
//!
//! Both enums are ordered: resolution walks [`InstallationCandidate::ALL`]
//! and, within each root, [`ExtensionVariant::ALL`], taking the first file
//! that exists.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the directory trees where binding files may live.
///
/// The declaration order is the resolution order.
///
/// # Examples
///
/// ```
/// use kb_core::InstallationCandidate;
///
/// assert_eq!(InstallationCandidate::ALL[0], InstallationCandidate::Default);
/// assert!(InstallationCandidate::Default.is_well_known());
/// assert!(!InstallationCandidate::StorefrontA.is_well_known());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationCandidate {
    /// The standalone installer's per-user options directory.
    Default,
    /// First alternate storefront layout, found by a discovery probe.
    StorefrontA,
    /// Second alternate storefront layout, found by a discovery probe.
    StorefrontB,
}

impl InstallationCandidate {
    /// All candidates in resolution order.
    pub const ALL: [Self; 3] = [Self::Default, Self::StorefrontA, Self::StorefrontB];

    /// Returns `true` if this root is a fixed OS path rather than a probe result.
    #[inline]
    #[must_use]
    pub const fn is_well_known(self) -> bool {
        matches!(self, Self::Default)
    }

    /// Returns a short label for logs.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::StorefrontA => "storefront-a",
            Self::StorefrontB => "storefront-b",
        }
    }
}

impl fmt::Display for InstallationCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// On-disk naming scheme of a binding file.
///
/// # Examples
///
/// ```
/// use kb_core::ExtensionVariant;
///
/// assert_eq!(ExtensionVariant::Versioned.file_name("Custom1"), "Custom1.3.0.binds");
/// assert_eq!(ExtensionVariant::Legacy.file_name("Custom1"), "Custom1.binds");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtensionVariant {
    /// `.3.0.binds`, written by current game versions.
    Versioned,
    /// `.binds`, written by older game versions.
    Legacy,
}

impl ExtensionVariant {
    /// All variants in resolution order.
    pub const ALL: [Self; 2] = [Self::Versioned, Self::Legacy];

    /// The file suffix, including the leading dot.
    #[inline]
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Versioned => ".3.0.binds",
            Self::Legacy => ".binds",
        }
    }

    /// Builds the binding file name for a profile.
    #[must_use]
    pub fn file_name(self, profile: &str) -> String {
        format!("{profile}{}", self.suffix())
    }
}

impl fmt::Display for ExtensionVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
