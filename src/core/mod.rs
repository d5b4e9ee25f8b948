/*!
 * Core Module
 * Error handling and synchronization building blocks for the list
 */

pub mod errors;
pub mod sync;

// Re-export for convenience
pub use errors::*;
pub use sync::{CancelToken, ChangeKind, ChangeNotifier, ListConfig};
