/*!
 * Change Notifications
 *
 * Bounded, best-effort wake-up pulses emitted after every list mutation.
 * The channel carries no data; it only tells a blocked drain that
 * something changed and whether it was an addition.
 */

use flume::{Receiver, Sender, TrySendError};
use tracing::trace;

/// Kind of mutation that produced a pulse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeKind {
    Add,
    Remove,
}

/// Bounded drop-on-full notification channel
///
/// Holds both ends so the channel never disconnects while the owning list
/// is alive. Sends never block.
pub struct ChangeNotifier {
    tx: Sender<ChangeKind>,
    rx: Receiver<ChangeKind>,
    capacity: usize,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, rx) = flume::bounded(capacity);
        Self { tx, rx, capacity }
    }

    /// Emit a pulse without blocking
    ///
    /// A `Remove` is dropped when the channel is full. An `Add` evicts the
    /// oldest buffered pulse instead, so a backlog of removals can never
    /// hide new data from a waiter. Returns whether the pulse was buffered.
    pub fn notify(&self, kind: ChangeKind) -> bool {
        loop {
            match self.tx.try_send(kind) {
                Ok(()) => return true,
                Err(TrySendError::Full(ChangeKind::Add)) => {
                    let evicted = self.rx.try_recv().ok();
                    trace!(?evicted, "Notification channel full, evicting oldest pulse");
                }
                Err(TrySendError::Full(ChangeKind::Remove)) => {
                    trace!("Notification channel full, dropping remove pulse");
                    return false;
                }
                Err(TrySendError::Disconnected(_)) => return false,
            }
        }
    }

    /// Discard every buffered pulse, returning how many were dropped
    pub fn drain_pending(&self) -> usize {
        self.rx.try_iter().count()
    }

    /// Number of buffered pulses
    #[inline]
    pub fn pending(&self) -> usize {
        self.rx.len()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Receiving end used by blocking drains
    #[inline]
    pub fn receiver(&self) -> &Receiver<ChangeKind> {
        &self.rx
    }
}

impl std::fmt::Debug for ChangeNotifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChangeNotifier")
            .field("capacity", &self.capacity)
            .field("pending", &self.pending())
            .finish()
    }
}
