/*!
 * Error Types
 * List error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type for list operations
pub type ListResult<T> = Result<T, ListError>;

/// Errors raised by list reads and removals
///
/// Cancellation of a blocking drain is not an error; it is reported
/// through the drain's success flag.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum ListError {
    #[error("Index {index} out of bounds, length is {length}")]
    #[diagnostic(
        code(list::index_out_of_bounds),
        help("The list may have been drained by another consumer. Re-check len() before indexing.")
    )]
    IndexOutOfBounds { index: usize, length: usize },

    #[error("Range of {count} items at index {index} out of bounds, length is {length}")]
    #[diagnostic(
        code(list::range_out_of_bounds),
        help("index + count must not exceed the current length.")
    )]
    RangeOutOfBounds {
        index: usize,
        count: usize,
        length: usize,
    },

    #[error("Internal consistency violated: {0}")]
    #[diagnostic(
        code(list::internal_consistency),
        help("The element type's PartialEq may not be reflexive (e.g. NaN floats).")
    )]
    InternalConsistency(String),
}

impl ListError {
    /// Whether the error was caused by a position outside the list
    #[inline]
    pub fn is_out_of_bounds(&self) -> bool {
        matches!(
            self,
            ListError::IndexOutOfBounds { .. } | ListError::RangeOutOfBounds { .. }
        )
    }
}
