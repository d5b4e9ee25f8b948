/*!
 * Concurrent List - Demo Entry Point
 *
 * Runs one producer thread against an async consumer that drains the list
 * until the producer finishes, then cancels the consumer.
 */

use anyhow::{ensure, Context};
use concurrent_list::{init_tracing, CancelToken, ConcurrentList, ListConfig};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::info;

const ITEMS: u64 = 1_000;
const BATCH: u64 = 50;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = ListConfig::from_env();
    info!(notify_capacity = config.effective_capacity(), "Starting hand-off demo");

    let list = Arc::new(ConcurrentList::with_config(config));
    let cancel = CancelToken::new();

    let producer = {
        let list = list.clone();
        thread::Builder::new()
            .name("producer".into())
            .spawn(move || {
                for start in (0..ITEMS).step_by(BATCH as usize) {
                    list.add_range(start..(start + BATCH).min(ITEMS));
                    thread::sleep(Duration::from_millis(1));
                }
            })
            .context("Failed to spawn producer thread")?
    };

    let consumer = {
        let list = list.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let mut received = Vec::new();
            let mut wakeups = 0usize;
            loop {
                let (ok, items) = list.take_all_wait(&cancel).await;
                if !ok {
                    break;
                }
                wakeups += 1;
                received.extend(items);
            }
            (received, wakeups)
        })
    };

    producer
        .join()
        .map_err(|_| anyhow::anyhow!("Producer thread panicked"))?;

    // Give the consumer a moment to pick up the final batch
    tokio::time::sleep(Duration::from_millis(50)).await;
    cancel.cancel();

    let (mut received, wakeups) = consumer.await.context("Consumer task failed")?;
    received.extend(list.take_all());

    ensure!(
        received.len() as u64 == ITEMS,
        "expected {} items, received {}",
        ITEMS,
        received.len()
    );
    ensure!(
        received.windows(2).all(|w| w[0] < w[1]),
        "items arrived out of order"
    );

    info!(items = received.len(), wakeups, "Hand-off demo complete");
    Ok(())
}
