//! The reload orchestrator and its [`Tracker`] handle.
//!
//! One tokio task owns both watchers and runs reload passes one after
//! another. Watcher callbacks only call [`Notify::notify_one`], which stores
//! at most one permit, so any number of changes arriving during a pass fold
//! into exactly one following pass.
//!
//! # Reload pass
//!
//! ```text
//! pointer dir missing? ──yes──► Idle
//!        │ no
//!   arm pointer watcher
//!        │
//!   read pointer ──fails──► keep previous bindings, Watching
//!        │
//!   resolve profile ──NotFound──► retire binding watcher, Unavailable
//!        │
//!   (re)arm binding watcher, read, parse ──► Loaded / Unavailable
//! ```

use std::sync::Arc;

use kb_core::{
    BindingFileDescriptor, Config, ConfigError, ProfileName, WatchConfig, WatchTarget,
};
use kb_locator::{ContendedFileReader, LocationResolver, LockProbe, ReadError, ResolveError};
use kb_watcher::{DebouncedWatcher, WatchError};
use parking_lot::RwLock;
use tokio::sync::{Notify, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::error::TrackerError;
use crate::parser::BindingsParser;
use crate::update::{BindingsUpdate, CurrentBindings, TrackerState, UnavailableReason};

/// State shared between the reload task and the [`Tracker`] handle.
struct Shared<B> {
    state: RwLock<TrackerState>,
    current: RwLock<Option<CurrentBindings<B>>>,
    binding_target: RwLock<Option<WatchTarget>>,
}

impl<B> Shared<B> {
    fn new() -> Self {
        Self {
            state: RwLock::new(TrackerState::Idle),
            current: RwLock::new(None),
            binding_target: RwLock::new(None),
        }
    }

    fn set_state(&self, state: TrackerState) {
        let previous = std::mem::replace(&mut *self.state.write(), state);
        if previous != state {
            debug!(from = %previous, to = %state, "Tracker state changed");
        }
    }
}

/// Handle to a running key-binding tracker.
///
/// Dropping the handle stops the reload task; use
/// [`shutdown`](Self::shutdown) to wait for it.
///
/// # Examples
///
/// ```no_run
/// use kb_core::Config;
/// use kb_tracker::{BindingsUpdate, RawBindingsParser, Tracker};
///
/// # async fn example() -> Result<(), kb_tracker::TrackerError> {
/// let mut tracker = Tracker::from_config(&Config::default(), RawBindingsParser).await?;
///
/// while let Some(update) = tracker.recv().await {
///     match update {
///         BindingsUpdate::Loaded(current) => println!("loaded {}", current.descriptor),
///         BindingsUpdate::Unavailable { profile, reason } => println!("{profile}: {reason}"),
///     }
/// }
/// # Ok(())
/// # }
/// ```
pub struct Tracker<B> {
    pointer: WatchTarget,
    shared: Arc<Shared<B>>,
    reload: Arc<Notify>,
    updates: mpsc::Receiver<BindingsUpdate<B>>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl<B> std::fmt::Debug for Tracker<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tracker")
            .field("pointer", &self.pointer)
            .field("state", &self.state())
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl<B: Send + Sync + 'static> Tracker<B> {
    /// Starts a tracker whose resolver is built from `config.paths`.
    ///
    /// # Errors
    ///
    /// See [`spawn`](Self::spawn).
    pub async fn from_config<P>(config: &Config, parser: P) -> Result<Self, TrackerError>
    where
        P: BindingsParser<Bindings = B>,
    {
        Self::spawn(config, LocationResolver::from_config(&config.paths), parser).await
    }

    /// Starts the reload task and runs the first pass in the background.
    ///
    /// Must be awaited inside a tokio runtime. The first update arrives once
    /// the initial pass has resolved a profile.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] if the configuration is invalid or no
    /// pointer file location can be derived.
    pub async fn spawn<P>(
        config: &Config,
        resolver: LocationResolver,
        parser: P,
    ) -> Result<Self, TrackerError>
    where
        P: BindingsParser<Bindings = B>,
    {
        let reader = ContendedFileReader::new(config.reader);
        Self::spawn_with_reader(config, resolver, reader, parser).await
    }

    /// Like [`spawn`](Self::spawn), reading both files through `reader`.
    ///
    /// The reader's own timing settings replace `config.reader`.
    ///
    /// # Errors
    ///
    /// See [`spawn`](Self::spawn).
    #[allow(clippy::unused_async)]
    pub async fn spawn_with_reader<P, L>(
        config: &Config,
        resolver: LocationResolver,
        reader: ContendedFileReader<L>,
        parser: P,
    ) -> Result<Self, TrackerError>
    where
        P: BindingsParser<Bindings = B>,
        L: LockProbe,
    {
        config.validate()?;
        let pointer_path = config.paths.pointer_file()?;
        let pointer = WatchTarget::from_path(&pointer_path).ok_or_else(|| {
            ConfigError::invalid_option("paths.pointer_file_name", "must name a file")
        })?;

        let shared = Arc::new(Shared::new());
        let reload = Arc::new(Notify::new());
        let (updates_tx, updates_rx) = mpsc::channel(config.tracker.channel_capacity);
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let orchestrator = Orchestrator {
            pointer: pointer.clone(),
            resolver,
            reader,
            parser,
            watch_config: config.watch,
            pointer_watcher: None,
            binding_watcher: None,
            shared: Arc::clone(&shared),
            reload: Arc::clone(&reload),
            updates: updates_tx,
        };
        let task = tokio::spawn(orchestrator.run(shutdown_rx));

        info!(pointer = %pointer, "Tracker started");

        Ok(Self {
            pointer,
            shared,
            reload,
            updates: updates_rx,
            shutdown_tx: Some(shutdown_tx),
            task: Some(task),
        })
    }

    /// Waits for the next update.
    ///
    /// Returns `None` once the reload task has stopped.
    pub async fn recv(&mut self) -> Option<BindingsUpdate<B>> {
        self.updates.recv().await
    }

    /// Returns the next update if one is already queued.
    pub fn try_recv(&mut self) -> Option<BindingsUpdate<B>> {
        self.updates.try_recv().ok()
    }
}

impl<B> Tracker<B> {
    /// Requests a reload pass.
    ///
    /// Requests made while a pass is running collapse into one more pass.
    pub fn reload(&self) {
        self.reload.notify_one();
    }

    /// Returns the orchestrator's current state.
    #[must_use]
    pub fn state(&self) -> TrackerState {
        *self.shared.state.read()
    }

    /// Returns the last successfully loaded bindings.
    #[must_use]
    pub fn current(&self) -> Option<CurrentBindings<B>> {
        self.shared.current.read().clone()
    }

    /// Returns the binding file currently being watched, if any.
    #[must_use]
    pub fn binding_target(&self) -> Option<WatchTarget> {
        self.shared.binding_target.read().clone()
    }

    /// Returns the watched pointer file.
    #[must_use]
    pub const fn pointer(&self) -> &WatchTarget {
        &self.pointer
    }

    /// Returns `true` while the reload task is alive.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stops both watchers and waits for the reload task to finish.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::TaskFailed`] if the reload task panicked.
    pub async fn shutdown(mut self) -> Result<(), TrackerError> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.await.map_err(|err| {
                error!(error = %err, "Reload task failed");
                TrackerError::TaskFailed
            })?;
        }
        info!(pointer = %self.pointer, "Tracker stopped");
        Ok(())
    }
}

impl<B> Drop for Tracker<B> {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

// ============================================================================
// Reload task
// ============================================================================

struct Orchestrator<P: BindingsParser, L: LockProbe> {
    pointer: WatchTarget,
    resolver: LocationResolver,
    reader: ContendedFileReader<L>,
    parser: P,
    watch_config: WatchConfig,
    pointer_watcher: Option<DebouncedWatcher>,
    binding_watcher: Option<DebouncedWatcher>,
    shared: Arc<Shared<P::Bindings>>,
    reload: Arc<Notify>,
    updates: mpsc::Sender<BindingsUpdate<P::Bindings>>,
}

impl<P: BindingsParser, L: LockProbe> Orchestrator<P, L> {
    async fn run(mut self, mut shutdown_rx: oneshot::Receiver<()>) {
        loop {
            tokio::select! {
                () = self.reload_pass() => {}
                _ = &mut shutdown_rx => break,
            }

            tokio::select! {
                () = self.reload.notified() => {
                    debug!("Reload requested");
                }
                _ = &mut shutdown_rx => break,
            }
        }

        self.retire_pointer_watcher();
        self.retire_binding_watcher();
        self.shared.set_state(TrackerState::Idle);
        debug!("Reload task finished");
    }

    async fn reload_pass(&mut self) {
        self.shared.set_state(TrackerState::Resolving);

        if !self.pointer.directory.is_dir() {
            let err = TrackerError::DirectoryMissing(self.pointer.directory.clone());
            error!(error = %err, "Cannot track key bindings");
            self.retire_pointer_watcher();
            self.retire_binding_watcher();
            self.shared.set_state(TrackerState::Idle);
            return;
        }

        if let Err(source) = arm_watcher(
            &mut self.pointer_watcher,
            &self.pointer,
            &self.watch_config,
            &self.reload,
        ) {
            let err = TrackerError::watch_setup(self.pointer.path(), source);
            warn!(error = %err, "Pointer file changes will not be noticed");
        }

        if let Some(profile) = self.read_profile().await {
            match self.resolver.resolve(&profile) {
                Ok(descriptor) => self.load(profile, descriptor).await,
                Err(err) => self.resolve_failed(profile, err).await,
            }
        }

        self.shared.set_state(TrackerState::Watching);
    }

    async fn read_profile(&self) -> Option<ProfileName> {
        let path = self.pointer.path();
        match self.reader.read(&path).await {
            Ok(contents) => {
                let profile = ProfileName::from_pointer_contents(&contents);
                if profile.is_none() {
                    warn!(path = %path, "Pointer file holds no profile name");
                }
                profile
            }
            Err(err) if err.is_missing() => {
                info!(path = %path, "Pointer file not present, waiting for it");
                None
            }
            Err(err) => {
                warn!(error = %TrackerError::from(err), "Skipping reload, keeping previous bindings");
                None
            }
        }
    }

    async fn load(&mut self, profile: ProfileName, descriptor: BindingFileDescriptor) {
        match arm_watcher(
            &mut self.binding_watcher,
            &descriptor.target,
            &self.watch_config,
            &self.reload,
        ) {
            Ok(()) => {
                *self.shared.binding_target.write() = Some(descriptor.target.clone());
            }
            Err(source) => {
                let err = TrackerError::watch_setup(descriptor.path(), source);
                warn!(error = %err, "Binding file changes will not be noticed");
                *self.shared.binding_target.write() = None;
            }
        }

        let path = descriptor.path();
        let contents = match self.reader.read(&path).await {
            Ok(contents) => contents,
            Err(err @ (ReadError::NotFound(_) | ReadError::Empty(_))) => {
                warn!(error = %err, profile = %profile, "Binding file unavailable");
                self.shared.current.write().take();
                self.emit(BindingsUpdate::Unavailable {
                    profile,
                    reason: UnavailableReason::NotFound,
                })
                .await;
                return;
            }
            Err(err) => {
                warn!(error = %TrackerError::from(err), "Keeping previous bindings");
                return;
            }
        };

        match self.parser.parse(&path, &contents) {
            Ok(bindings) => {
                let current = CurrentBindings {
                    profile,
                    descriptor,
                    bindings: Arc::new(bindings),
                };
                *self.shared.current.write() = Some(current.clone());
                info!(
                    path = %path,
                    profile = %current.profile,
                    candidate = %current.descriptor.candidate,
                    "Bindings loaded"
                );
                self.emit(BindingsUpdate::Loaded(current)).await;
            }
            Err(err) => {
                let reason = UnavailableReason::ParseError(err.message().to_owned());
                warn!(
                    path = %path,
                    error = %TrackerError::from(err),
                    "Binding file could not be parsed"
                );
                self.shared.current.write().take();
                self.emit(BindingsUpdate::Unavailable { profile, reason }).await;
            }
        }
    }

    async fn resolve_failed(&mut self, profile: ProfileName, err: ResolveError) {
        debug!(error = %TrackerError::from(err), "Dropping binding watcher");
        self.retire_binding_watcher();
        self.shared.current.write().take();
        self.emit(BindingsUpdate::Unavailable {
            profile,
            reason: UnavailableReason::NotFound,
        })
        .await;
    }

    async fn emit(&self, update: BindingsUpdate<P::Bindings>) {
        if self.updates.send(update).await.is_err() {
            debug!("Update receiver dropped");
        }
    }

    fn retire_pointer_watcher(&mut self) {
        if let Some(mut watcher) = self.pointer_watcher.take() {
            watcher.stop();
        }
    }

    fn retire_binding_watcher(&mut self) {
        if let Some(mut watcher) = self.binding_watcher.take() {
            watcher.stop();
        }
        *self.shared.binding_target.write() = None;
    }
}

/// Ensures `slot` holds an active watcher on `target`.
///
/// A watcher on a different target is stopped first. A watcher that failed
/// to start stays in the slot and is retried on the next call.
fn arm_watcher(
    slot: &mut Option<DebouncedWatcher>,
    target: &WatchTarget,
    config: &WatchConfig,
    reload: &Arc<Notify>,
) -> Result<(), WatchError> {
    if slot.as_ref().is_some_and(|watcher| watcher.target() != target) {
        if let Some(mut previous) = slot.take() {
            previous.stop();
        }
    }

    let watcher = slot.get_or_insert_with(|| {
        let reload = Arc::clone(reload);
        DebouncedWatcher::new(target.clone(), config, move || reload.notify_one())
    });
    watcher.start()
}
