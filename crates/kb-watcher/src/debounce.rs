//! Quiet-window debouncing.
//!
//! The game and most editors emit several raw notifications per save. The
//! [`Debouncer`] task waits until no raw notification has arrived for a full
//! quiet window and then fires its callback once:
//!
//! ```text
//! raw:    x  x x   x                       x
//!         |<---- window restarts ---->|    |
//! fire:                          ●         (window)    ●
//! ```
//!
//! Raw notifications reach the task through an unbounded channel, so
//! [`RawTrigger::fire`] never blocks the thread delivering them.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Callback invoked once per settled burst.
pub type Callback = Arc<dyn Fn() + Send + Sync>;

/// Cheap, cloneable handle that feeds raw notifications to a [`Debouncer`].
#[derive(Debug, Clone)]
pub struct RawTrigger {
    tx: mpsc::UnboundedSender<()>,
}

impl RawTrigger {
    /// Records one raw notification. Never blocks; ignored after cancellation.
    #[inline]
    pub fn fire(&self) {
        let _ = self.tx.send(());
    }
}

/// A background task that collapses bursts of raw notifications.
///
/// Cancelling (or dropping) the debouncer guarantees the callback does not
/// start afterwards: the task checks an activity gate under the same lock
/// that [`cancel`](Self::cancel) takes. The callback runs while that lock is
/// held, so it must not call back into the debouncer.
pub struct Debouncer {
    trigger: RawTrigger,
    active: Arc<Mutex<bool>>,
    task: JoinHandle<()>,
}

impl std::fmt::Debug for Debouncer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debouncer")
            .field("active", &self.is_active())
            .finish_non_exhaustive()
    }
}

impl Debouncer {
    /// Spawns the debounce task on the given runtime.
    pub fn spawn(handle: &Handle, window: Duration, callback: Callback) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let active = Arc::new(Mutex::new(true));
        let task = handle.spawn(run_debounce_loop(rx, window, Arc::clone(&active), callback));

        Self {
            trigger: RawTrigger { tx },
            active,
            task,
        }
    }

    /// Records one raw notification.
    #[inline]
    pub fn trigger(&self) {
        self.trigger.fire();
    }

    /// Returns a handle for feeding raw notifications from other threads.
    #[must_use]
    pub fn raw_trigger(&self) -> RawTrigger {
        self.trigger.clone()
    }

    /// Returns `true` until the debouncer is cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        *self.active.lock()
    }

    /// Cancels the pending window, if any, and stops the task.
    ///
    /// Idempotent. Once this returns the callback will not fire again.
    pub fn cancel(&self) {
        *self.active.lock() = false;
        self.task.abort();
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

async fn run_debounce_loop(
    mut raw_rx: mpsc::UnboundedReceiver<()>,
    window: Duration,
    active: Arc<Mutex<bool>>,
    callback: Callback,
) {
    while raw_rx.recv().await.is_some() {
        // Every notification inside the window restarts it.
        loop {
            match tokio::time::timeout(window, raw_rx.recv()).await {
                Ok(Some(())) => {}
                Ok(None) => return,
                Err(_elapsed) => break,
            }
        }

        let gate = active.lock();
        if !*gate {
            return;
        }
        callback();
    }
}
