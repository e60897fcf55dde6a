//! What the tracker tells its consumer.

use std::fmt;
use std::sync::Arc;

use kb_core::{BindingFileDescriptor, ProfileName};

/// Lifecycle state of the reload orchestrator.
///
/// ```text
/// Idle ──► Resolving ──► Watching
///   ▲          │  ▲          │
///   └──────────┘  └──────────┘
///  (bindings dir    (any change)
///   missing)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackerState {
    /// Nothing is being watched.
    #[default]
    Idle,
    /// A reload pass is running.
    Resolving,
    /// Waiting for the next change.
    Watching,
}

impl TrackerState {
    /// Returns a short label for logs and status lines.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Resolving => "resolving",
            Self::Watching => "watching",
        }
    }
}

impl fmt::Display for TrackerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Why no bindings are available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnavailableReason {
    /// No binding file exists for the profile, or it is empty.
    NotFound,
    /// The binding file exists but could not be parsed.
    ParseError(String),
}

impl fmt::Display for UnavailableReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("binding file not found"),
            Self::ParseError(message) => write!(f, "binding file unreadable: {message}"),
        }
    }
}

/// The bindings currently in effect.
#[derive(Debug)]
pub struct CurrentBindings<B> {
    /// Profile named by the pointer file.
    pub profile: ProfileName,
    /// File the bindings were loaded from.
    pub descriptor: BindingFileDescriptor,
    /// The parsed bindings.
    pub bindings: Arc<B>,
}

impl<B> Clone for CurrentBindings<B> {
    fn clone(&self) -> Self {
        Self {
            profile: self.profile.clone(),
            descriptor: self.descriptor.clone(),
            bindings: Arc::clone(&self.bindings),
        }
    }
}

/// A notification sent to the consumer after a reload pass.
#[derive(Debug)]
pub enum BindingsUpdate<B> {
    /// A binding set was resolved, read, and parsed.
    Loaded(CurrentBindings<B>),

    /// No bindings are available; the consumer should show a degraded state.
    Unavailable {
        /// Profile named by the pointer file.
        profile: ProfileName,
        /// Why nothing could be loaded.
        reason: UnavailableReason,
    },
}

impl<B> BindingsUpdate<B> {
    /// Returns the loaded bindings, if any.
    #[must_use]
    pub const fn loaded(&self) -> Option<&CurrentBindings<B>> {
        match self {
            Self::Loaded(current) => Some(current),
            Self::Unavailable { .. } => None,
        }
    }

    /// Returns the profile this update is about.
    #[must_use]
    pub const fn profile(&self) -> &ProfileName {
        match self {
            Self::Loaded(current) => &current.profile,
            Self::Unavailable { profile, .. } => profile,
        }
    }
}
