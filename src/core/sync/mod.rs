/*!
 * Synchronization Primitives
 *
 * Building blocks for the list's wait/notify path:
 * - Bounded drop-on-full change notifications (flume)
 * - Fire-once cancellation tokens usable from threads and async tasks
 * - Runtime configuration for notification capacity
 *
 * # Architecture
 *
 * The notification channel replaces a condition variable. Mutators send a
 * non-blocking pulse after releasing the list lock; a blocking drain
 * suspends on the channel raced against a cancellation token. No helper
 * thread or task forwards events, so nothing outlives a drain call.
 */

mod cancel;
mod config;
mod notify;

pub use cancel::CancelToken;
pub use config::{ListConfig, DEFAULT_NOTIFY_CAPACITY, NOTIFY_CAPACITY_ENV};
pub use notify::{ChangeKind, ChangeNotifier};
