//! Watched file targets and resolved binding file descriptors.

use std::fmt;
use std::hash::{Hash, Hasher};

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

use super::install::{ExtensionVariant, InstallationCandidate};

/// A single file to watch, split into its directory and file name.
///
/// File system notifications are subscribed on the directory and filtered
/// by exact file name.
///
/// # Examples
///
/// ```
/// use kb_core::WatchTarget;
/// use camino::Utf8Path;
///
/// let target = WatchTarget::from_path(Utf8Path::new("/binds/StartPreset.start")).unwrap();
/// assert_eq!(target.directory.as_str(), "/binds");
/// assert_eq!(target.file_name, "StartPreset.start");
/// assert_eq!(target.path().as_str(), "/binds/StartPreset.start");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WatchTarget {
    /// Directory containing the file.
    pub directory: Utf8PathBuf,

    /// Bare file name.
    pub file_name: String,
}

impl WatchTarget {
    /// Creates a target from its parts.
    #[must_use]
    pub fn new(directory: impl Into<Utf8PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            file_name: file_name.into(),
        }
    }

    /// Splits a file path into a target.
    ///
    /// Returns `None` if the path has no file name or no parent directory.
    #[must_use]
    pub fn from_path(path: &Utf8Path) -> Option<Self> {
        let file_name = path.file_name()?;
        let directory = path.parent()?;
        Some(Self::new(directory, file_name))
    }

    /// Returns the full path of the target file.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.directory.join(&self.file_name)
    }
}

impl fmt::Display for WatchTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// The binding file currently believed to hold the active profile.
///
/// Records which installation root and naming scheme produced the match so
/// that logs and consumers can tell layouts apart. Two descriptors are equal
/// when they name the same file, whatever produced them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingFileDescriptor {
    /// Location of the binding file.
    pub target: WatchTarget,

    /// Installation root the file was found under.
    pub candidate: InstallationCandidate,

    /// Naming scheme of the file.
    pub variant: ExtensionVariant,
}

impl BindingFileDescriptor {
    /// Creates a descriptor for a file found at `directory/file_name`.
    #[must_use]
    pub fn new(
        directory: impl Into<Utf8PathBuf>,
        file_name: impl Into<String>,
        candidate: InstallationCandidate,
        variant: ExtensionVariant,
    ) -> Self {
        Self {
            target: WatchTarget::new(directory, file_name),
            candidate,
            variant,
        }
    }

    /// Returns the full path of the binding file.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.target.path()
    }
}

impl PartialEq for BindingFileDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.target == other.target
    }
}

impl Eq for BindingFileDescriptor {}

impl Hash for BindingFileDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.target.hash(state);
    }
}

impl fmt::Display for BindingFileDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.target, self.candidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_without_parent() {
        assert!(WatchTarget::from_path(Utf8Path::new("/")).is_none());
    }

    #[test]
    fn test_target_round_trips_path() {
        let target = WatchTarget::new("/a/b", "Custom1.binds");
        assert_eq!(WatchTarget::from_path(&target.path()), Some(target));
    }

    #[test]
    fn test_descriptor_path_and_display() {
        let descriptor = BindingFileDescriptor::new(
            "/binds",
            "Custom1.3.0.binds",
            InstallationCandidate::Default,
            ExtensionVariant::Versioned,
        );
        assert_eq!(descriptor.path(), Utf8PathBuf::from("/binds/Custom1.3.0.binds"));
        assert_eq!(descriptor.to_string(), "/binds/Custom1.3.0.binds (default)");
    }

    #[test]
    fn test_descriptor_equality_ignores_provenance() {
        use std::collections::HashSet;

        let found_as_default = BindingFileDescriptor::new(
            "/binds",
            "Custom1.binds",
            InstallationCandidate::Default,
            ExtensionVariant::Legacy,
        );
        let found_as_storefront = BindingFileDescriptor::new(
            "/binds",
            "Custom1.binds",
            InstallationCandidate::StorefrontA,
            ExtensionVariant::Legacy,
        );
        let other_file = BindingFileDescriptor::new(
            "/binds",
            "Custom1.3.0.binds",
            InstallationCandidate::Default,
            ExtensionVariant::Versioned,
        );

        assert_eq!(found_as_default, found_as_storefront);
        assert_ne!(found_as_default, other_file);

        let set: HashSet<_> = [found_as_default, found_as_storefront, other_file].into();
        assert_eq!(set.len(), 2);
    }
}
