//! Keeps the active Elite Dangerous key bindings current.
//!
//! This crate ties the workspace together. A [`Tracker`] watches the pointer
//! file naming the active preset, resolves that preset to a binding file,
//! watches the binding file as well, and re-reads and re-parses it whenever
//! either file changes.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐   ┌──────────────────┐
//! │ pointer watcher  │   │ binding watcher  │   kb-watcher
//! └────────┬─────────┘   └────────┬─────────┘
//!          └─────── notify_one ───┘
//!                      ▼
//!          ┌──────────────────────┐
//!          │     reload task      │   single flight
//!          │ read → resolve → read│   kb-locator
//!          │        → parse       │   BindingsParser
//!          └──────────┬───────────┘
//!                     ▼
//!           mpsc<BindingsUpdate>  ──► consumer
//! ```
//!
//! # Example
//!
//! ```no_run
//! use kb_core::Config;
//! use kb_tracker::{RawBindingsParser, Tracker};
//!
//! # async fn example() -> Result<(), kb_tracker::TrackerError> {
//! let mut tracker = Tracker::from_config(&Config::default(), RawBindingsParser).await?;
//! if let Some(update) = tracker.recv().await {
//!     println!("profile {}", update.profile());
//! }
//! tracker.shutdown().await?;
//! # Ok(())
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

mod error;
mod orchestrator;
mod parser;
mod update;

pub use error::TrackerError;
pub use orchestrator::Tracker;
pub use parser::{BindingsParser, ParseError, RawBindings, RawBindingsParser};
pub use update::{BindingsUpdate, CurrentBindings, TrackerState, UnavailableReason};
