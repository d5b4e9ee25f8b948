/*!
 * Blocking Drain Tests
 * Wake-up on add, cancellation, timeouts, and waiter cleanup
 */

use concurrent_list::{CancelToken, ConcurrentList, ListConfig};
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Poll until no caller is blocked in a drain, up to a bound
fn wait_for_no_waiters<T>(list: &ConcurrentList<T>) -> bool {
    let start = Instant::now();
    while list.waiter_count() != 0 {
        if start.elapsed() > Duration::from_secs(2) {
            return false;
        }
        thread::sleep(Duration::from_millis(5));
    }
    true
}

#[test]
fn test_add_wakes_blocked_drain() {
    let list = Arc::new(ConcurrentList::new());
    let cancel = CancelToken::new();

    let handle = {
        let list = list.clone();
        let cancel = cancel.clone();
        thread::spawn(move || list.take_all_block(&cancel))
    };

    thread::sleep(Duration::from_millis(50));
    list.add("job");

    let (ok, items) = handle.join().unwrap();
    assert!(ok);
    assert_eq!(items, vec!["job"]);
    assert!(list.is_empty());
    assert!(wait_for_no_waiters(&list));
}

#[test]
fn test_fired_token_leaves_contents_untouched() {
    let list = ConcurrentList::new();
    list.add(7);

    let cancel = CancelToken::new();
    cancel.cancel();

    let (ok, items) = list.take_all_block(&cancel);
    assert!(!ok);
    assert!(items.is_empty());
    assert_eq!(list.get_all(), vec![7]);
    assert_eq!(list.waiter_count(), 0);
}

#[test]
fn test_cancel_while_blocked() {
    let list = Arc::new(ConcurrentList::<u32>::new());
    let cancel = CancelToken::new();

    let handle = {
        let list = list.clone();
        let cancel = cancel.clone();
        thread::spawn(move || list.take_all_block(&cancel))
    };

    thread::sleep(Duration::from_millis(50));
    let fired_at = Instant::now();
    cancel.cancel();

    let (ok, items) = handle.join().unwrap();
    assert!(!ok);
    assert!(items.is_empty());
    assert!(fired_at.elapsed() < Duration::from_secs(1));
    assert!(wait_for_no_waiters(&list));
}

#[test]
fn test_clear_does_not_wake_on_stale_add() {
    let list = ConcurrentList::new();
    list.add(1);
    list.add(2);
    list.clear();

    let (ok, items) = list.take_all_block_timeout(&CancelToken::new(), Duration::from_millis(100));
    assert!(!ok);
    assert!(items.is_empty());
}

#[test]
fn test_concurrent_clear_never_yields_empty_drain() {
    let list = Arc::new(ConcurrentList::new());
    let stop = CancelToken::new();

    let producer = {
        let list = list.clone();
        let stop = stop.clone();
        thread::spawn(move || {
            let mut i = 0u64;
            while !stop.is_cancelled() {
                list.add(i);
                list.clear();
                i += 1;
            }
        })
    };

    let mut wakes = 0usize;
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(500) {
        let (ok, items) = list.take_all_block_timeout(&CancelToken::new(), Duration::from_millis(20));
        if ok {
            wakes += 1;
            assert!(!items.is_empty(), "drain reported success with no items");
        } else {
            assert!(items.is_empty());
        }
    }

    stop.cancel();
    producer.join().unwrap();
    assert_eq!(list.waiter_count(), 0);
}

#[test]
fn test_remove_pulses_are_skipped() {
    let list = Arc::new(ConcurrentList::new());
    list.add_range([1, 2, 3]);
    list.clear();
    list.remove(&9);

    let handle = {
        let list = list.clone();
        thread::spawn(move || list.take_all_block_timeout(&CancelToken::new(), Duration::from_secs(5)))
    };

    thread::sleep(Duration::from_millis(30));
    list.remove(&1);
    thread::sleep(Duration::from_millis(30));
    list.add(4);

    let (ok, items) = handle.join().unwrap();
    assert!(ok);
    assert_eq!(items, vec![4]);
}

#[test]
fn test_add_survives_full_channel() {
    let list = ConcurrentList::with_config(ListConfig::coalescing());
    list.remove(&0);
    list.add(5);

    let (ok, items) = list.take_all_block_timeout(&CancelToken::new(), Duration::from_secs(1));
    assert!(ok);
    assert_eq!(items, vec![5]);
}

#[test]
fn test_timeout_reports_failure() {
    let list = ConcurrentList::<u8>::new();
    let start = Instant::now();

    let (ok, items) = list.take_all_block_timeout(&CancelToken::new(), Duration::from_millis(50));
    assert!(!ok);
    assert!(items.is_empty());
    assert!(start.elapsed() >= Duration::from_millis(50));
    assert_eq!(list.waiter_count(), 0);
}

#[tokio::test]
async fn test_async_drain_wakes_on_add() {
    let list = Arc::new(ConcurrentList::new());
    let cancel = CancelToken::new();

    let waiter = {
        let list = list.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { list.take_all_wait(&cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    list.add(42u64);

    let (ok, items) = tokio::time::timeout(Duration::from_secs(2), waiter)
        .await
        .expect("drain should wake")
        .unwrap();
    assert!(ok);
    assert_eq!(items, vec![42]);
    assert_eq!(list.waiter_count(), 0);
}

#[tokio::test]
async fn test_async_drain_cancelled() {
    let list = Arc::new(ConcurrentList::<u64>::new());
    let cancel = CancelToken::new();

    let waiter = {
        let list = list.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move { list.take_all_wait(&cancel).await })
    };

    tokio::time::sleep(Duration::from_millis(20)).await;
    cancel.cancel();

    let (ok, items) = tokio::time::timeout(Duration::from_secs(2), waiter)
        .await
        .expect("drain should observe cancellation")
        .unwrap();
    assert!(!ok);
    assert!(items.is_empty());
    assert_eq!(list.waiter_count(), 0);
}
