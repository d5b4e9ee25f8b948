/*!
 * Blocking Drain
 *
 * Suspend until new items are added, then take everything at once.
 *
 * The waiter receives directly from the list's notification channel,
 * raced against the caller's cancellation token. No helper thread or task
 * is spawned, so every exit path (data, cancellation, timeout, channel
 * closure, or a dropped future) leaves nothing running behind it.
 */

use super::list::ConcurrentList;
use crate::core::sync::{CancelToken, ChangeKind};
use flume::Selector;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Outcome of one wait on the notification channel
enum Wake {
    Change(ChangeKind),
    Cancelled,
    Closed,
    TimedOut,
}

/// Keeps `waiter_count` accurate on every exit path
struct WaiterGuard<'a> {
    waiters: &'a AtomicUsize,
}

impl<'a> WaiterGuard<'a> {
    fn register(waiters: &'a AtomicUsize) -> Self {
        waiters.fetch_add(1, Ordering::SeqCst);
        Self { waiters }
    }
}

impl Drop for WaiterGuard<'_> {
    fn drop(&mut self) {
        self.waiters.fetch_sub(1, Ordering::SeqCst);
    }
}

impl<T> ConcurrentList<T> {
    /// Block the calling thread until items are added, then take them all
    ///
    /// Returns `(true, items)` once an `Add` pulse is observed. `Remove`
    /// pulses are skipped. Returns `(false, vec![])` without touching the
    /// list if `cancel` fires first or has already fired.
    pub fn take_all_block(&self, cancel: &CancelToken) -> (bool, Vec<T>) {
        self.block_until_added(cancel, None)
    }

    /// Like [`take_all_block`](Self::take_all_block) with a deadline
    ///
    /// Expiry of `timeout` is reported the same way as cancellation.
    pub fn take_all_block_timeout(
        &self,
        cancel: &CancelToken,
        timeout: Duration,
    ) -> (bool, Vec<T>) {
        self.block_until_added(cancel, Some(Instant::now() + timeout))
    }

    /// Async counterpart of [`take_all_block`](Self::take_all_block)
    ///
    /// Must be polled inside a tokio runtime. Dropping the future while it
    /// waits has no effect on the list.
    pub async fn take_all_wait(&self, cancel: &CancelToken) -> (bool, Vec<T>) {
        let _waiter = WaiterGuard::register(&self.waiters);

        loop {
            let wake = tokio::select! {
                biased;
                _ = cancel.cancelled() => Wake::Cancelled,
                change = self.notifier.receiver().recv_async() => {
                    change.map_or(Wake::Closed, Wake::Change)
                }
            };

            if let Some(result) = self.resolve(wake) {
                return result;
            }
        }
    }

    fn block_until_added(&self, cancel: &CancelToken, deadline: Option<Instant>) -> (bool, Vec<T>) {
        let _waiter = WaiterGuard::register(&self.waiters);

        loop {
            // Checked first so an already-fired token always wins
            if cancel.is_cancelled() {
                return self.resolve_cancelled();
            }

            let selector = Selector::new()
                .recv(cancel.signal(), |_| Wake::Cancelled)
                .recv(self.notifier.receiver(), |change| {
                    change.map_or(Wake::Closed, Wake::Change)
                });

            let wake = match deadline {
                Some(deadline) => selector.wait_deadline(deadline).unwrap_or(Wake::TimedOut),
                None => selector.wait(),
            };

            if let Some(result) = self.resolve(wake) {
                return result;
            }
        }
    }

    /// Map a wake-up to a drain result, or `None` to keep waiting
    fn resolve(&self, wake: Wake) -> Option<(bool, Vec<T>)> {
        match wake {
            Wake::Change(ChangeKind::Add) => {
                let items = self.take_all();
                if items.is_empty() {
                    // Stale pulse: the items it announced were already removed
                    trace!("Drain woken onto an empty list, waiting again");
                    return None;
                }
                debug!(taken = items.len(), "Drain woken by add");
                Some((true, items))
            }
            Wake::Change(ChangeKind::Remove) => {
                trace!("Drain skipping remove pulse");
                None
            }
            Wake::Cancelled => Some(self.resolve_cancelled()),
            Wake::Closed => {
                debug!("Notification channel closed, abandoning drain");
                Some((false, Vec::new()))
            }
            Wake::TimedOut => {
                debug!("Drain deadline elapsed");
                Some((false, Vec::new()))
            }
        }
    }

    fn resolve_cancelled(&self) -> (bool, Vec<T>) {
        debug!("Drain cancelled");
        (false, Vec::new())
    }
}
