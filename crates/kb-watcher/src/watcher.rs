//! Debounced watcher for a single file.
//!
//! [`DebouncedWatcher`] composes a `notify` watcher with a [`Debouncer`]. It
//! owns its subscription outright: `start` arms it, `stop` retires it, and
//! neither does anything when called twice.

use std::sync::Arc;

use kb_core::{WatchConfig, WatchTarget};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use crate::debounce::{Callback, Debouncer};
use crate::error::WatchError;
use crate::filter::ExactFileFilter;

/// A live subscription: the platform watcher plus its debounce task.
struct Subscription {
    /// Dropping the watcher detaches the OS subscription.
    _watcher: RecommendedWatcher,
    debouncer: Debouncer,
}

/// Watches one file and reports settled changes through a callback.
///
/// # Lifecycle
///
/// 1. **Creation**: [`DebouncedWatcher::new`] records the target and callback.
///    Nothing is watched yet.
/// 2. **Start**: [`start`](Self::start) subscribes to the target's directory.
///    Calling it again while active is a no-op.
/// 3. **Stop**: [`stop`](Self::stop) detaches the subscription and drops any
///    pending debounce window. It never fails and is a no-op when inactive.
///    Dropping the watcher stops it.
///
/// The callback runs on the tokio runtime that was current when `start` was
/// called. It must not call back into this watcher.
///
/// # Examples
///
/// ```no_run
/// use kb_core::{WatchConfig, WatchTarget};
/// use kb_watcher::DebouncedWatcher;
/// use std::sync::Arc;
/// use tokio::sync::Notify;
///
/// # async fn example() -> Result<(), kb_watcher::WatchError> {
/// let reload = Arc::new(Notify::new());
/// let signal = Arc::clone(&reload);
///
/// let mut watcher = DebouncedWatcher::new(
///     WatchTarget::new("/binds", "Custom1.3.0.binds"),
///     &WatchConfig::default(),
///     move || signal.notify_one(),
/// );
/// watcher.start()?;
///
/// reload.notified().await;
/// println!("bindings changed");
/// # Ok(())
/// # }
/// ```
pub struct DebouncedWatcher {
    target: WatchTarget,
    config: WatchConfig,
    on_changed: Callback,
    subscription: Option<Subscription>,
}

impl std::fmt::Debug for DebouncedWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DebouncedWatcher")
            .field("target", &self.target)
            .field("is_active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl DebouncedWatcher {
    /// Creates an inactive watcher for `target`.
    pub fn new<F>(target: WatchTarget, config: &WatchConfig, on_changed: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            target,
            config: *config,
            on_changed: Arc::new(on_changed),
            subscription: None,
        }
    }

    /// Returns the watched file.
    #[must_use]
    pub const fn target(&self) -> &WatchTarget {
        &self.target
    }

    /// Returns `true` while a subscription is armed.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    /// Arms the subscription. A no-op if already active.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Errors
    ///
    /// - [`WatchError::DirectoryMissing`] if the target directory does not exist
    /// - [`WatchError::NoRuntime`] if no tokio runtime is current
    /// - [`WatchError::Notify`] if the OS subscription cannot be created
    pub fn start(&mut self) -> Result<(), WatchError> {
        if self.subscription.is_some() {
            debug!(target = %self.target, "Watcher already active");
            return Ok(());
        }

        let directory = &self.target.directory;
        if !directory.is_dir() {
            return Err(WatchError::directory_missing(directory.clone()));
        }

        let handle = Handle::try_current().map_err(|_| WatchError::NoRuntime)?;
        let debouncer = Debouncer::spawn(&handle, self.config.debounce(), Arc::clone(&self.on_changed));
        let trigger = debouncer.raw_trigger();
        let filter = ExactFileFilter::new(self.target.file_name.clone());

        // On any error below the debouncer is dropped, which cancels it.
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if filter.accepts(&event) {
                    trigger.fire();
                }
            }
            Err(error) => {
                warn!(error = %error, "File watcher error");
            }
        })?;
        watcher.watch(directory.as_std_path(), RecursiveMode::NonRecursive)?;

        info!(
            directory = %self.target.directory,
            file = %self.target.file_name,
            "File watcher started"
        );

        self.subscription = Some(Subscription {
            _watcher: watcher,
            debouncer,
        });
        Ok(())
    }

    /// Retires the subscription. A no-op if inactive.
    ///
    /// After this returns the callback will not fire, even if a debounce
    /// window was pending.
    pub fn stop(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.debouncer.cancel();
            drop(subscription);
            info!(
                directory = %self.target.directory,
                file = %self.target.file_name,
                "File watcher stopped"
            );
        }
    }
}

impl Drop for DebouncedWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tempfile::TempDir;

    const SETTLE: Duration = Duration::from_millis(400);

    fn create_temp_dir() -> (TempDir, Utf8PathBuf) {
        let dir = TempDir::new().expect("Failed to create temp directory");
        let path = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("Invalid path");
        (dir, path)
    }

    fn counting_watcher(target: WatchTarget) -> (DebouncedWatcher, Arc<AtomicUsize>) {
        let count = Arc::new(AtomicUsize::new(0));
        let inner = Arc::clone(&count);
        let watcher = DebouncedWatcher::new(target, &WatchConfig { debounce_ms: 50 }, move || {
            inner.fetch_add(1, Ordering::SeqCst);
        });
        (watcher, count)
    }

    async fn wait_for_count(count: &AtomicUsize, at_least: usize) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(3);
        while count.load(Ordering::SeqCst) < at_least && tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    #[tokio::test]
    async fn test_start_missing_directory() {
        let (_dir, path) = create_temp_dir();
        let (mut watcher, _count) =
            counting_watcher(WatchTarget::new(path.join("nope"), "StartPreset.start"));

        let result = watcher.start();

        assert!(matches!(result, Err(WatchError::DirectoryMissing(_))));
        assert!(!watcher.is_active());
    }

    #[test]
    fn test_start_outside_runtime() {
        let (_dir, path) = create_temp_dir();
        let (mut watcher, _count) = counting_watcher(WatchTarget::new(path, "StartPreset.start"));

        assert!(matches!(watcher.start(), Err(WatchError::NoRuntime)));
        assert!(!watcher.is_active());
    }

    #[tokio::test]
    async fn test_start_and_stop_are_idempotent() {
        let (_dir, path) = create_temp_dir();
        let (mut watcher, _count) = counting_watcher(WatchTarget::new(path, "StartPreset.start"));

        watcher.stop();
        assert!(!watcher.is_active());

        watcher.start().expect("First start failed");
        watcher.start().expect("Second start failed");
        assert!(watcher.is_active());

        watcher.stop();
        watcher.stop();
        assert!(!watcher.is_active());
    }

    #[tokio::test]
    async fn test_double_start_fires_once_per_save() {
        let (dir, path) = create_temp_dir();
        let file = dir.path().join("Custom1.3.0.binds");
        fs::write(&file, "<Root/>").expect("Failed to write file");
        let (mut watcher, count) =
            counting_watcher(WatchTarget::new(path, "Custom1.3.0.binds"));
        watcher.start().expect("First start failed");
        watcher.start().expect("Second start failed");

        fs::write(&file, "<Root PresetName=\"Custom1\"/>").expect("Failed to write file");
        wait_for_count(&count, 1).await;
        tokio::time::sleep(SETTLE).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
        watcher.stop();
    }

    #[tokio::test]
    async fn test_ignores_sibling_files() {
        let (dir, path) = create_temp_dir();
        let (mut watcher, count) = counting_watcher(WatchTarget::new(path, "StartPreset.start"));
        watcher.start().expect("Start failed");

        fs::write(dir.path().join("Other.binds"), "x").expect("Failed to write file");
        tokio::time::sleep(SETTLE).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_no_callback_after_stop() {
        let (dir, path) = create_temp_dir();
        let file = dir.path().join("StartPreset.start");
        let (mut watcher, count) = counting_watcher(WatchTarget::new(path, "StartPreset.start"));
        watcher.start().expect("Start failed");

        fs::write(&file, "Custom1").expect("Failed to write file");
        watcher.stop();
        fs::write(&file, "Custom2").expect("Failed to write file");
        tokio::time::sleep(SETTLE).await;

        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let (dir, path) = create_temp_dir();
        let file = dir.path().join("StartPreset.start");
        let (mut watcher, count) = counting_watcher(WatchTarget::new(path, "StartPreset.start"));

        watcher.start().expect("Start failed");
        watcher.stop();
        watcher.start().expect("Restart failed");

        fs::write(&file, "Custom1").expect("Failed to write file");
        wait_for_count(&count, 1).await;

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
