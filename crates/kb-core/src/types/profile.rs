//! The active profile name.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The name of the active binding preset, as read from the pointer file.
///
/// The pointer file's whole content is the name; the only normalisation is
/// dropping a leading byte-order mark and trimming surrounding whitespace.
/// A `ProfileName` is never empty.
///
/// # Examples
///
/// ```
/// use kb_core::ProfileName;
///
/// let name = ProfileName::from_pointer_contents("  Custom1\r\n").unwrap();
/// assert_eq!(name.as_str(), "Custom1");
///
/// assert!(ProfileName::from_pointer_contents(" \n").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfileName(String);

impl ProfileName {
    /// Builds a profile name from pointer file contents.
    ///
    /// Returns `None` if the trimmed contents are empty.
    #[must_use]
    pub fn from_pointer_contents(contents: &str) -> Option<Self> {
        let trimmed = contents.trim_start_matches('\u{feff}').trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    /// Returns the name as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProfileName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProfileName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
