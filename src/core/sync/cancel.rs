/*!
 * Cancellation Token
 *
 * Fire-once signal used to abandon a blocking drain. Firing drops the only
 * sender of an internal flume channel, so every receiver observes a
 * permanent disconnect: threads can race it in a `flume::Selector` and
 * async tasks can await it, with no polling on either side.
 */

use flume::{Receiver, Sender};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

struct CancelState {
    fired: AtomicBool,
    trigger: Mutex<Option<Sender<()>>>,
    signal: Receiver<()>,
}

/// Cloneable cancellation handle; all clones share one state
#[derive(Clone)]
pub struct CancelToken {
    state: Arc<CancelState>,
}

impl CancelToken {
    pub fn new() -> Self {
        // Nothing is ever sent; only the disconnect matters
        let (tx, rx) = flume::bounded(0);
        Self {
            state: Arc::new(CancelState {
                fired: AtomicBool::new(false),
                trigger: Mutex::new(Some(tx)),
                signal: rx,
            }),
        }
    }

    /// Fire the token
    ///
    /// Returns `true` for the call that fired it, `false` if it had
    /// already fired.
    pub fn cancel(&self) -> bool {
        if self.state.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        drop(self.state.trigger.lock().take());
        debug!("Cancellation token fired");
        true
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.state.fired.load(Ordering::SeqCst)
    }

    /// Wait asynchronously until the token fires
    pub async fn cancelled(&self) {
        if self.is_cancelled() {
            return;
        }
        // Only ever resolves with a disconnect error
        let _ = self.state.signal.recv_async().await;
    }

    /// Receiver that disconnects once the token fires
    #[inline]
    pub(crate) fn signal(&self) -> &Receiver<()> {
        &self.state.signal
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelToken")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
