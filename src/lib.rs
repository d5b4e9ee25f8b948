/*!
 * Concurrent List Library
 * Thread-safe hand-off list with a cancellable blocking drain
 */

pub mod collections;
pub mod core;
pub mod monitoring;

// Re-exports
pub use crate::collections::ConcurrentList;
pub use crate::core::errors::{ListError, ListResult};
pub use crate::core::sync::{CancelToken, ChangeKind, ListConfig};
pub use crate::monitoring::init_tracing;
