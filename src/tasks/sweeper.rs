//! Expiry/Eviction Sweeper
//!
//! Background task that drives the memory tier's TTL sweeps and size-cap
//! enforcement.
//!
//! The task wakes on a fixed tick or when signalled (a memory-tier set
//! signals it so a capacity overshoot is reclaimed within one pass), takes
//! the store's writer lock, purges expired entries, then evicts
//! oldest-first down to the byte cap. It exits once the shutdown channel
//! fires; shutdown order is: flag the channel, then await the handle, then
//! drop the store.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::storage::MemoryStore;

/// Longest interval between sweep passes.
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(500);

/// Spawns the sweeper over the given memory store.
///
/// The task loops until `shutdown` carries `true`: each iteration waits up
/// to [`SWEEP_INTERVAL`] or until `wakeup` is signalled, then runs one
/// expiry-and-eviction pass under the writer lock. The shutdown sender must
/// set the flag and then await the returned handle so no pass runs against
/// a store being torn down.
///
/// # Arguments
/// * `memory` - shared handle to the memory store
/// * `wakeup` - signalled by writers to trigger an early pass
/// * `shutdown` - watch channel set to `true` to stop the task
pub fn spawn_sweeper(
    memory: Arc<RwLock<MemoryStore>>,
    wakeup: Arc<Notify>,
    mut shutdown: watch::Receiver<bool>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = SWEEP_INTERVAL.as_millis() as u64, "sweeper started");

        loop {
            tokio::select! {
                _ = tokio::time::sleep(SWEEP_INTERVAL) => {}
                _ = wakeup.notified() => {}
                changed = shutdown.changed() => {
                    // A dropped sender counts as a stop request.
                    if changed.is_err() {
                        break;
                    }
                }
            }
            if *shutdown.borrow() {
                break;
            }

            let (expired, evicted, usage, max_bytes) = {
                let mut store = memory.write().await;
                let expired = store.purge_expired();
                let evicted = store.evict_to_capacity();
                (expired, evicted, store.usage(), store.max_bytes())
            };

            if expired > 0 || evicted > 0 {
                info!(expired, evicted, usage, max_bytes, "sweep pass reclaimed entries");
            } else {
                debug!(usage, max_bytes, "sweep pass: nothing to reclaim");
            }
        }

        info!("sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn harness(max_bytes: usize) -> (Arc<RwLock<MemoryStore>>, Arc<Notify>, watch::Sender<bool>, JoinHandle<()>) {
        let memory = Arc::new(RwLock::new(MemoryStore::new(max_bytes)));
        let wakeup = Arc::new(Notify::new());
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = spawn_sweeper(Arc::clone(&memory), Arc::clone(&wakeup), stop_rx);
        (memory, wakeup, stop_tx, handle)
    }

    #[tokio::test]
    async fn test_sweeper_removes_expired_entries() {
        let (memory, _wakeup, stop_tx, handle) = harness(1024 * 1024);

        memory.write().await.set(
            "expire_soon".to_string(),
            "value".to_string(),
            "g".to_string(),
            1,
        );

        // One second of TTL plus at least one full tick.
        tokio::time::sleep(Duration::from_millis(1800)).await;

        {
            let store = memory.read().await;
            assert_eq!(store.len(), 0, "expired entry should have been swept");
            assert_eq!(store.usage(), 0);
        }

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_preserves_live_entries() {
        let (memory, _wakeup, stop_tx, handle) = harness(1024 * 1024);

        memory.write().await.set(
            "long_lived".to_string(),
            "value".to_string(),
            "g".to_string(),
            3600,
        );

        tokio::time::sleep(Duration::from_millis(1200)).await;

        assert_eq!(memory.read().await.get("long_lived"), "value");

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_enforces_size_bound_after_wakeup() {
        // Cap far below what a handful of 1 KiB values charge.
        let (memory, wakeup, stop_tx, handle) = harness(2048);

        {
            let mut store = memory.write().await;
            for i in 0..8 {
                store.set(format!("k{i}"), "x".repeat(1024), "g".to_string(), 0);
            }
            assert!(store.usage() > store.max_bytes());
        }
        wakeup.notify_one();

        tokio::time::sleep(Duration::from_millis(300)).await;

        {
            let store = memory.read().await;
            assert!(store.usage() <= store.max_bytes());
            // FIFO eviction keeps the most recent insertions.
            assert_eq!(store.get("k0"), "");
            assert_eq!(store.get("k7"), "x".repeat(1024));
        }

        stop_tx.send(true).unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_sweeper_stops_on_shutdown_signal() {
        let (_memory, _wakeup, stop_tx, handle) = harness(1024);

        stop_tx.send(true).unwrap();
        tokio::time::timeout(Duration::from_secs(2), handle)
            .await
            .expect("sweeper should stop promptly")
            .unwrap();
    }
}
