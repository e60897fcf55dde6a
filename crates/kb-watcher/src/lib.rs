//! Single-file watcher with debouncing and idempotent start/stop.
//!
//! This crate watches one file (a directory plus an exact file name) via the
//! `notify` crate and turns bursts of raw change notifications into a single
//! "changed" callback.
//!
//! # Overview
//!
//! - Watch the directory non-recursively, keep only create/modify events for
//!   the exact file name
//! - Collapse notifications closer than the quiet window (50ms by default)
//!   into one callback
//! - `start`/`stop` can be called any number of times; after `stop` returns
//!   the callback never fires again
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                 notify delivery thread (not ours)             │
//! │  ┌───────────────────┐    ┌────────────────┐                  │
//! │  │ RecommendedWatcher│ -> │ ExactFileFilter│ ── RawTrigger ─┐ │
//! │  └───────────────────┘    └────────────────┘   (try-send)   │ │
//! └─────────────────────────────────────────────────────────────│─┘
//!                                                               ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                      │
//! │  ┌─────────────────────────┐      ┌──────────────┐            │
//! │  │ Debouncer task          │ ───► │ on_changed() │            │
//! │  │ (quiet window, gate)    │      └──────────────┘            │
//! │  └─────────────────────────┘                                  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The notify thread never waits: it only pushes a unit value into a channel.
//!
//! # Usage
//!
//! ```no_run
//! use kb_core::{WatchConfig, WatchTarget};
//! use kb_watcher::DebouncedWatcher;
//!
//! # async fn example() -> Result<(), kb_watcher::WatchError> {
//! let target = WatchTarget::new("/binds", "StartPreset.start");
//! let mut watcher = DebouncedWatcher::new(target, &WatchConfig::default(), || {
//!     println!("preset changed");
//! });
//!
//! watcher.start()?;
//! watcher.start()?; // no-op
//! // ...
//! watcher.stop();
//! watcher.stop(); // no-op
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod debounce;
pub mod error;
pub mod filter;
pub mod watcher;

pub use debounce::{Debouncer, RawTrigger};
pub use error::WatchError;
pub use filter::ExactFileFilter;
pub use watcher::DebouncedWatcher;
