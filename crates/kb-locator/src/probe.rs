//! Installation root discovery probes.
//!
//! Finding where a storefront put the game is someone else's job; the
//! resolver only needs "a directory, or nothing". [`InstallProbe`] is that
//! seam. Closures implement it directly.

use camino::Utf8PathBuf;

/// Finds the bindings root of one installation layout.
///
/// Probes are called once per resolution, so an install that appears while
/// the tracker runs is picked up on the next change.
///
/// # Examples
///
/// ```
/// use kb_locator::InstallProbe;
/// use camino::Utf8PathBuf;
///
/// let probe = || Some(Utf8PathBuf::from("/games/elite/Bindings"));
/// assert_eq!(probe.discover().unwrap().as_str(), "/games/elite/Bindings");
/// ```
pub trait InstallProbe: Send + Sync + 'static {
    /// Returns the bindings root, or `None` if this layout is not installed.
    fn discover(&self) -> Option<Utf8PathBuf>;
}

impl<F> InstallProbe for F
where
    F: Fn() -> Option<Utf8PathBuf> + Send + Sync + 'static,
{
    fn discover(&self) -> Option<Utf8PathBuf> {
        self()
    }
}

/// A probe for a layout that is never installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstall;

impl InstallProbe for NoInstall {
    #[inline]
    fn discover(&self) -> Option<Utf8PathBuf> {
        None
    }
}

/// A probe returning a configured directory, if it exists.
///
/// # Examples
///
/// ```
/// use kb_locator::{FixedRoot, InstallProbe};
///
/// assert!(FixedRoot::new(None).discover().is_none());
/// assert!(FixedRoot::new(Some("/definitely/not/here".into())).discover().is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedRoot {
    root: Option<Utf8PathBuf>,
}

impl FixedRoot {
    /// Creates a probe for an optional configured root.
    #[must_use]
    pub const fn new(root: Option<Utf8PathBuf>) -> Self {
        Self { root }
    }
}

impl InstallProbe for FixedRoot {
    fn discover(&self) -> Option<Utf8PathBuf> {
        let root = self.root.as_ref()?;
        if root.is_dir() {
            Some(root.clone())
        } else {
            tracing::debug!(root = %root, "Configured install root is not a directory");
            None
        }
    }
}
