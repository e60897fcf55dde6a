//! Event filtering for single-file watches.
//!
//! Watches are placed on a directory, so every sibling file produces events
//! too. [`ExactFileFilter`] keeps only creations and modifications of the
//! one file we care about.

use std::ffi::OsStr;
use std::path::Path;

use notify::{Event, EventKind};

/// Accepts create/modify events for one exact file name.
///
/// # Examples
///
/// ```
/// use kb_watcher::ExactFileFilter;
/// use std::path::Path;
///
/// let filter = ExactFileFilter::new("StartPreset.start");
/// assert!(filter.matches_path(Path::new("/binds/StartPreset.start")));
/// assert!(!filter.matches_path(Path::new("/binds/Custom1.binds")));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactFileFilter {
    file_name: String,
}

impl ExactFileFilter {
    /// Creates a filter for the given file name.
    #[must_use]
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Returns the file name this filter accepts.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Returns `true` if the path names the watched file.
    #[inline]
    #[must_use]
    pub fn matches_path(&self, path: &Path) -> bool {
        path.file_name() == Some(OsStr::new(&self.file_name))
    }

    /// Returns `true` if the kind of event signals new content.
    ///
    /// Access and removal events are ignored; a rewrite always ends with a
    /// create or modify.
    #[inline]
    #[must_use]
    pub const fn is_content_change(kind: &EventKind) -> bool {
        matches!(kind, EventKind::Create(_) | EventKind::Modify(_))
    }

    /// Returns `true` if the event is a content change of the watched file.
    #[must_use]
    pub fn accepts(&self, event: &Event) -> bool {
        Self::is_content_change(&event.kind) && event.paths.iter().any(|p| self.matches_path(p))
    }
}
