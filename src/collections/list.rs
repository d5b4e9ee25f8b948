/*!
 * Concurrent List
 *
 * Ordered, growable list shared between producers and a consumer. Every
 * read and write goes through one mutex; a change pulse is emitted after
 * the lock is released so mutators never wait on the notification path.
 */

use crate::core::errors::{ListError, ListResult};
use crate::core::sync::{ChangeKind, ChangeNotifier, ListConfig};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{trace, warn};

/// Thread-safe list with a cancellable blocking drain
///
/// Share it between threads or tasks through an `Arc`.
///
/// # Examples
///
/// ```
/// use concurrent_list::ConcurrentList;
///
/// let list = ConcurrentList::new();
/// list.add(1);
/// list.add_range([2, 3]);
///
/// assert_eq!(list.get(1).unwrap(), 2);
/// assert_eq!(list.take(0).unwrap(), 1);
/// assert_eq!(list.take_all(), vec![2, 3]);
/// assert!(list.is_empty());
/// ```
pub struct ConcurrentList<T> {
    items: Mutex<Vec<T>>,
    pub(super) notifier: ChangeNotifier,
    /// Callers currently suspended in a drain (diagnostics)
    pub(super) waiters: AtomicUsize,
}

impl<T> ConcurrentList<T> {
    /// Create an empty list with default configuration
    pub fn new() -> Self {
        Self::with_config(ListConfig::default())
    }

    pub fn with_config(config: ListConfig) -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            notifier: ChangeNotifier::new(config.effective_capacity()),
            waiters: AtomicUsize::new(0),
        }
    }

    /// Append one item
    pub fn add(&self, value: T) {
        let len = {
            let mut items = self.items.lock();
            items.push(value);
            items.len()
        };
        trace!(len, "Item added");
        self.notifier.notify(ChangeKind::Add);
    }

    /// Append items in order within a single critical section
    ///
    /// Emits one `Add` pulse, even for an empty range.
    pub fn add_range<I>(&self, values: I)
    where
        I: IntoIterator<Item = T>,
    {
        // Collect first so a caller's iterator never runs under the lock
        let values: Vec<T> = values.into_iter().collect();
        let added = values.len();
        let len = {
            let mut items = self.items.lock();
            items.extend(values);
            items.len()
        };
        trace!(added, len, "Range added");
        self.notifier.notify(ChangeKind::Add);
    }

    /// Remove everything
    ///
    /// Pending pulses are discarded before the `Remove` pulse is sent, so a
    /// pre-clear `Add` cannot wake a drain onto an empty list. The discard
    /// happens under the lock: any `Add` that arrives afterwards belongs to
    /// an item pushed after the clear and survives.
    pub fn clear(&self) {
        let discarded = {
            let mut items = self.items.lock();
            *items = Vec::new();
            self.notifier.drain_pending()
        };
        trace!(discarded, "List cleared");
        self.notifier.notify(ChangeKind::Remove);
    }

    /// Remove `count` contiguous items starting at `index`
    ///
    /// Fails without mutating when the range is not fully inside the list.
    pub fn remove_range(&self, index: usize, count: usize) -> ListResult<()> {
        {
            let mut items = self.items.lock();
            let length = items.len();
            let end = index
                .checked_add(count)
                .filter(|&end| end <= length)
                .ok_or(ListError::RangeOutOfBounds {
                    index,
                    count,
                    length,
                })?;
            items.drain(index..end);
        }
        trace!(index, count, "Range removed");
        self.notifier.notify(ChangeKind::Remove);
        Ok(())
    }

    /// Remove and return the first item matching `predicate`
    ///
    /// Always emits a `Remove` pulse, like [`remove`](Self::remove).
    pub fn remove_where<F>(&self, predicate: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let removed = {
            let mut items = self.items.lock();
            items
                .iter()
                .position(predicate)
                .map(|pos| items.remove(pos))
        };
        self.notifier.notify(ChangeKind::Remove);
        removed
    }

    /// Remove and return every item, leaving the list empty
    pub fn take_all(&self) -> Vec<T> {
        let taken = std::mem::take(&mut *self.items.lock());
        trace!(taken = taken.len(), "All items taken");
        self.notifier.notify(ChangeKind::Remove);
        taken
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Number of callers currently blocked in a drain
    #[inline]
    pub fn waiter_count(&self) -> usize {
        self.waiters.load(Ordering::SeqCst)
    }

    /// Number of change pulses buffered but not yet observed
    #[inline]
    pub fn pending_notifications(&self) -> usize {
        self.notifier.pending()
    }
}

impl<T: Clone> ConcurrentList<T> {
    /// Copy of the item at `index`
    pub fn get(&self, index: usize) -> ListResult<T> {
        let items = self.items.lock();
        checked_index(&items, index).map(|i| items[i].clone())
    }

    /// Snapshot of all items in order
    pub fn get_all(&self) -> Vec<T> {
        self.items.lock().clone()
    }
}

impl<T: PartialEq> ConcurrentList<T> {
    /// Remove the first item equal to `value`
    ///
    /// Later equal items are left in place. A `Remove` pulse is emitted
    /// whether or not anything matched.
    pub fn remove(&self, value: &T) -> bool {
        let removed = remove_first(&mut self.items.lock(), value);
        trace!(removed, "Remove by value");
        self.notifier.notify(ChangeKind::Remove);
        removed
    }

    /// Remove and return the item at `index`
    ///
    /// The read and the removal share one lock acquisition. Removal uses
    /// the same first-equal-match rule as [`remove`](Self::remove).
    pub fn take(&self, index: usize) -> ListResult<T> {
        let taken = {
            let mut items = self.items.lock();
            let index = checked_index(&items, index)?;
            let target = &items[index];
            match items.iter().position(|item| item == target) {
                Some(pos) => items.remove(pos),
                None => {
                    warn!(index, "Take could not locate the item it just read");
                    return Err(ListError::InternalConsistency(format!(
                        "item at index {} not found for removal",
                        index
                    )));
                }
            }
        };
        self.notifier.notify(ChangeKind::Remove);
        Ok(taken)
    }
}

impl<T> Default for ConcurrentList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> std::fmt::Debug for ConcurrentList<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConcurrentList")
            .field("len", &self.len())
            .field("waiters", &self.waiter_count())
            .field("notifier", &self.notifier)
            .finish()
    }
}

#[inline]
fn checked_index<T>(items: &[T], index: usize) -> ListResult<usize> {
    if index < items.len() {
        Ok(index)
    } else {
        Err(ListError::IndexOutOfBounds {
            index,
            length: items.len(),
        })
    }
}

fn remove_first<T: PartialEq>(items: &mut Vec<T>, value: &T) -> bool {
    match items.iter().position(|item| item == value) {
        Some(pos) => {
            items.remove(pos);
            true
        }
        None => false,
    }
}
