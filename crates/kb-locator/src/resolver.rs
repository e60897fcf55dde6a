//! Binding file location resolution.
//!
//! The same preset can live in three directory trees depending on how the
//! game was bought, and each tree has used two naming schemes over the
//! years. [`LocationResolver`] tries every combination in a fixed order and
//! returns the first file that exists.

use camino::{Utf8Path, Utf8PathBuf};
use tracing::{debug, info, warn};

use kb_core::{
    BindingFileDescriptor, ExtensionVariant, InstallationCandidate, PathsConfig, ProfileName,
};

use crate::error::{ResolveError, TriedPaths};
use crate::probe::{FixedRoot, InstallProbe, NoInstall};

/// One (root, extension) combination considered during resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePath {
    /// Installation root the path belongs to.
    pub candidate: InstallationCandidate,
    /// Naming scheme of the path.
    pub variant: ExtensionVariant,
    /// Directory of the binding file.
    pub directory: Utf8PathBuf,
    /// Binding file name.
    pub file_name: String,
}

impl CandidatePath {
    /// Full path of the candidate file.
    #[must_use]
    pub fn path(&self) -> Utf8PathBuf {
        self.directory.join(&self.file_name)
    }

    fn into_descriptor(self) -> BindingFileDescriptor {
        BindingFileDescriptor::new(self.directory, self.file_name, self.candidate, self.variant)
    }
}

/// Resolves a profile name to the binding file that holds it.
///
/// # Examples
///
/// ```no_run
/// use kb_core::ProfileName;
/// use kb_locator::LocationResolver;
/// use camino::Utf8PathBuf;
///
/// let resolver = LocationResolver::new(Some(Utf8PathBuf::from("/binds")))
///     .with_storefront_a(|| Some(Utf8PathBuf::from("/steam/Bindings")));
///
/// let profile = ProfileName::from_pointer_contents("Custom1").unwrap();
/// match resolver.resolve(&profile) {
///     Ok(descriptor) => println!("bindings at {}", descriptor.path()),
///     Err(err) => eprintln!("{err}"),
/// }
/// ```
pub struct LocationResolver {
    default_root: Option<Utf8PathBuf>,
    storefront_a: Box<dyn InstallProbe>,
    storefront_b: Box<dyn InstallProbe>,
}

impl std::fmt::Debug for LocationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationResolver")
            .field("default_root", &self.default_root)
            .finish_non_exhaustive()
    }
}

impl LocationResolver {
    /// Creates a resolver with a default root and no storefront installs.
    #[must_use]
    pub fn new(default_root: Option<Utf8PathBuf>) -> Self {
        Self {
            default_root,
            storefront_a: Box::new(NoInstall),
            storefront_b: Box::new(NoInstall),
        }
    }

    /// Creates a resolver from path configuration.
    ///
    /// The default root falls back to the well-known per-user directory;
    /// storefront roots are used when configured and present on disk.
    #[must_use]
    pub fn from_config(paths: &PathsConfig) -> Self {
        Self::new(paths.resolved_bindings_dir())
            .with_storefront_a(FixedRoot::new(paths.storefront_a_root.clone()))
            .with_storefront_b(FixedRoot::new(paths.storefront_b_root.clone()))
    }

    /// Sets the discovery probe for the first storefront layout.
    #[must_use]
    pub fn with_storefront_a(mut self, probe: impl InstallProbe) -> Self {
        self.storefront_a = Box::new(probe);
        self
    }

    /// Sets the discovery probe for the second storefront layout.
    #[must_use]
    pub fn with_storefront_b(mut self, probe: impl InstallProbe) -> Self {
        self.storefront_b = Box::new(probe);
        self
    }

    /// Returns the default-installer root, if one is configured.
    #[must_use]
    pub fn default_root(&self) -> Option<&Utf8Path> {
        self.default_root.as_deref()
    }

    fn root_for(&self, candidate: InstallationCandidate) -> Option<Utf8PathBuf> {
        match candidate {
            InstallationCandidate::Default => self.default_root.clone(),
            InstallationCandidate::StorefrontA => self.storefront_a.discover(),
            InstallationCandidate::StorefrontB => self.storefront_b.discover(),
        }
    }

    /// Lists every (root, extension) combination for a profile, in resolution order.
    ///
    /// Roots whose probe finds nothing contribute no entries.
    #[must_use]
    pub fn candidate_paths(&self, profile: &ProfileName) -> Vec<CandidatePath> {
        let mut paths = Vec::with_capacity(InstallationCandidate::ALL.len() * ExtensionVariant::ALL.len());
        for candidate in InstallationCandidate::ALL {
            let Some(root) = self.root_for(candidate) else {
                continue;
            };
            paths.extend(ExtensionVariant::ALL.into_iter().map(|variant| CandidatePath {
                candidate,
                variant,
                directory: root.clone(),
                file_name: variant.file_name(profile.as_str()),
            }));
        }
        paths
    }

    /// Resolves the binding file for a profile.
    ///
    /// Only existence is checked; nothing is opened.
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError::NotFound`] when no combination exists.
    pub fn resolve(&self, profile: &ProfileName) -> Result<BindingFileDescriptor, ResolveError> {
        let mut tried = TriedPaths::new();

        for candidate in InstallationCandidate::ALL {
            let Some(root) = self.root_for(candidate) else {
                if candidate.is_well_known() {
                    warn!(candidate = %candidate, "No default bindings directory, skipping");
                } else {
                    debug!(candidate = %candidate, "Installation root not present, skipping");
                }
                continue;
            };

            for variant in ExtensionVariant::ALL {
                let file_name = variant.file_name(profile.as_str());
                let path = root.join(&file_name);

                if path.is_file() {
                    info!(
                        path = %path,
                        candidate = %candidate,
                        profile = %profile,
                        "Resolved binding file"
                    );
                    let found = CandidatePath {
                        candidate,
                        variant,
                        directory: root,
                        file_name,
                    };
                    return Ok(found.into_descriptor());
                }

                debug!(path = %path, candidate = %candidate, "Binding file not found");
                tried.push(path);
            }
        }

        warn!(profile = %profile, tried = tried.len(), "No binding file found for profile");
        Err(ResolveError::NotFound {
            profile: profile.clone(),
            tried,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    fn utf8_dir(dir: &TempDir, name: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("Invalid path");
        fs::create_dir_all(&path).expect("Failed to create dir");
        path
    }

    fn profile(name: &str) -> ProfileName {
        ProfileName::from_pointer_contents(name).expect("Non-empty profile")
    }

    struct Layout {
        _dir: TempDir,
        default: Utf8PathBuf,
        store_a: Utf8PathBuf,
        store_b: Utf8PathBuf,
    }

    fn layout() -> Layout {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let default = utf8_dir(&dir, "default");
        let store_a = utf8_dir(&dir, "store_a");
        let store_b = utf8_dir(&dir, "store_b");
        Layout {
            _dir: dir,
            default,
            store_a,
            store_b,
        }
    }

    fn resolver_for(layout: &Layout) -> LocationResolver {
        let a = layout.store_a.clone();
        let b = layout.store_b.clone();
        LocationResolver::new(Some(layout.default.clone()))
            .with_storefront_a(move || Some(a.clone()))
            .with_storefront_b(move || Some(b.clone()))
    }

    #[test]
    fn test_third_ranked_combination_wins() {
        let layout = layout();
        let expected = layout.store_a.join("Custom1.3.0.binds");
        fs::write(&expected, "<Root/>").unwrap();

        let descriptor = resolver_for(&layout).resolve(&profile("Custom1")).unwrap();

        assert_eq!(descriptor.path(), expected);
        assert_eq!(descriptor.candidate, InstallationCandidate::StorefrontA);
        assert_eq!(descriptor.variant, ExtensionVariant::Versioned);
        // Resolution never writes.
        assert_eq!(fs::read_dir(&layout.default).unwrap().count(), 0);
        assert_eq!(fs::read_dir(&layout.store_b).unwrap().count(), 0);
    }

    #[test]
    fn test_versioned_beats_legacy() {
        let layout = layout();
        fs::write(layout.default.join("Custom1.binds"), "legacy").unwrap();
        fs::write(layout.default.join("Custom1.3.0.binds"), "versioned").unwrap();

        let descriptor = resolver_for(&layout).resolve(&profile("Custom1")).unwrap();

        assert_eq!(descriptor.target.file_name, "Custom1.3.0.binds");
        assert_eq!(descriptor.variant, ExtensionVariant::Versioned);
    }

    #[test]
    fn test_default_root_beats_storefronts() {
        let layout = layout();
        fs::write(layout.default.join("Custom1.binds"), "legacy").unwrap();
        fs::write(layout.store_a.join("Custom1.3.0.binds"), "versioned").unwrap();

        let descriptor = resolver_for(&layout).resolve(&profile("Custom1")).unwrap();

        assert_eq!(descriptor.candidate, InstallationCandidate::Default);
        assert_eq!(descriptor.variant, ExtensionVariant::Legacy);
    }

    #[test]
    fn test_exhaustion_lists_all_tried_paths() {
        let layout = layout();

        let err = resolver_for(&layout).resolve(&profile("Custom1")).unwrap_err();

        let tried = err.tried();
        assert_eq!(tried.len(), 6);
        assert_eq!(tried[0], layout.default.join("Custom1.3.0.binds"));
        assert_eq!(tried[1], layout.default.join("Custom1.binds"));
        assert_eq!(tried[2], layout.store_a.join("Custom1.3.0.binds"));
        assert_eq!(tried[5], layout.store_b.join("Custom1.binds"));
    }

    #[test]
    fn test_absent_probe_skips_candidate() {
        let layout = layout();
        fs::write(layout.store_b.join("Custom1.binds"), "x").unwrap();
        let b = layout.store_b.clone();
        let resolver = LocationResolver::new(Some(layout.default.clone()))
            .with_storefront_b(move || Some(b.clone()));

        let descriptor = resolver.resolve(&profile("Custom1")).unwrap();
        assert_eq!(descriptor.candidate, InstallationCandidate::StorefrontB);

        let candidates = resolver.candidate_paths(&profile("Custom1"));
        assert_eq!(candidates.len(), 4);
        assert!(
            candidates
                .iter()
                .all(|c| c.candidate != InstallationCandidate::StorefrontA)
        );
    }

    #[test]
    fn test_missing_default_root_falls_through() {
        let layout = layout();
        fs::write(layout.store_a.join("Custom1.binds"), "x").unwrap();
        let a = layout.store_a.clone();
        let resolver = LocationResolver::new(None).with_storefront_a(move || Some(a.clone()));

        let descriptor = resolver.resolve(&profile("Custom1")).unwrap();

        assert_eq!(descriptor.candidate, InstallationCandidate::StorefrontA);
        assert!(resolver.default_root().is_none());
    }

    #[test]
    fn test_probes_not_called_after_match() {
        let layout = layout();
        fs::write(layout.default.join("Custom1.3.0.binds"), "x").unwrap();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let resolver = LocationResolver::new(Some(layout.default.clone())).with_storefront_a(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
                None
            },
        );

        resolver.resolve(&profile("Custom1")).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_candidate_paths_order() {
        let layout = layout();
        let resolver = resolver_for(&layout);

        let order: Vec<_> = resolver
            .candidate_paths(&profile("P"))
            .into_iter()
            .map(|c| (c.candidate, c.variant))
            .collect();

        assert_eq!(
            order,
            vec![
                (InstallationCandidate::Default, ExtensionVariant::Versioned),
                (InstallationCandidate::Default, ExtensionVariant::Legacy),
                (InstallationCandidate::StorefrontA, ExtensionVariant::Versioned),
                (InstallationCandidate::StorefrontA, ExtensionVariant::Legacy),
                (InstallationCandidate::StorefrontB, ExtensionVariant::Versioned),
                (InstallationCandidate::StorefrontB, ExtensionVariant::Legacy),
            ]
        );
    }

    #[test]
    fn test_from_config_uses_existing_storefront_roots() {
        let layout = layout();
        fs::write(layout.store_b.join("Custom1.binds"), "x").unwrap();
        let paths = PathsConfig {
            bindings_dir: Some(layout.default.clone()),
            storefront_a_root: Some(layout.store_a.join("missing")),
            storefront_b_root: Some(layout.store_b.clone()),
            ..PathsConfig::default()
        };

        let resolver = LocationResolver::from_config(&paths);
        assert_eq!(resolver.default_root(), Some(layout.default.as_path()));
        let descriptor = resolver.resolve(&profile("Custom1")).unwrap();
        assert_eq!(descriptor.candidate, InstallationCandidate::StorefrontB);
    }

    #[test]
    fn test_directory_named_like_binding_file_is_ignored() {
        let layout = layout();
        fs::create_dir(layout.default.join("Custom1.3.0.binds")).unwrap();
        fs::write(layout.default.join("Custom1.binds"), "x").unwrap();

        let descriptor = resolver_for(&layout).resolve(&profile("Custom1")).unwrap();
        assert_eq!(descriptor.variant, ExtensionVariant::Legacy);
    }
}
