//! Expiry Reaper Task
//!
//! Single background loop performing active expiry for the cache store.

use tokio::task::JoinHandle;
use tokio::time::sleep_until;
use tracing::{debug, info};

use crate::cache::SharedCache;

/// Spawns the task that removes cache entries once their TTL elapses.
///
/// The store keeps a time-ordered queue of expiry checks, one per write. The
/// reaper drains every due check, then sleeps until the earliest remaining
/// deadline. Writes that schedule an earlier deadline than the one it is
/// waiting on wake it through the store's expiry signal.
///
/// # Arguments
/// * `cache` - Shared cache store
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
pub fn spawn_expiry_reaper(cache: SharedCache) -> JoinHandle<()> {
    tokio::spawn(async move {
        let signal = cache.lock().await.expiry_signal();
        info!("Starting expiry reaper");

        loop {
            let next_deadline = {
                let mut store = cache.lock().await;
                let removed = store.reap_expired();
                if removed > 0 {
                    info!("Expiry reaper: removed {} expired entries", removed);
                } else {
                    debug!("Expiry reaper: no expired entries found");
                }
                store.next_deadline()
            };

            match next_deadline {
                Some(deadline) => {
                    tokio::select! {
                        _ = sleep_until(deadline) => {}
                        _ = signal.notified() => {}
                    }
                }
                None => signal.notified().await,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::sleep;

    use crate::cache::{CacheKey, CacheStore, CacheValue, EntryState};

    fn key(id: &str) -> CacheKey {
        CacheKey::new(id, "2024-12-30")
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_removes_expired_entries() {
        let cache = CacheStore::new(100, Duration::from_secs(10)).into_shared();
        cache.lock().await.set(key("nytimes.com"), CacheValue::new(1.0, 1));

        let handle = spawn_expiry_reaper(cache.clone());
        sleep(Duration::from_secs(11)).await;

        {
            let store = cache.lock().await;
            assert!(store.is_empty(), "Expired entry should have been reaped");
            assert_eq!(store.stats().expirations, 1);
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_preserves_valid_entries() {
        let cache = CacheStore::new(100, Duration::from_secs(3600)).into_shared();
        cache.lock().await.set(key("long-lived.com"), CacheValue::new(4.0, 2));

        let handle = spawn_expiry_reaper(cache.clone());
        sleep(Duration::from_secs(60)).await;

        {
            let mut store = cache.lock().await;
            assert_eq!(store.get(&key("long-lived.com")), Some(CacheValue::new(4.0, 2)));
        }

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_wakes_for_later_writes() {
        let cache = CacheStore::new(100, Duration::from_secs(1)).into_shared();
        let handle = spawn_expiry_reaper(cache.clone());

        // Let the reaper go idle on an empty store first
        sleep(Duration::from_millis(100)).await;
        cache.lock().await.set(key("yahoo.com"), CacheValue::new(2.0, 2));

        sleep(Duration::from_secs(2)).await;
        assert_eq!(
            cache.lock().await.lifecycle(&key("yahoo.com")),
            EntryState::Removed
        );

        handle.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_reaper_skips_overwritten_entries() {
        let cache = CacheStore::new(100, Duration::from_secs(10)).into_shared();
        let handle = spawn_expiry_reaper(cache.clone());

        cache.lock().await.set(key("nytimes.com"), CacheValue::new(1.0, 1));
        sleep(Duration::from_secs(5)).await;
        cache.lock().await.set(key("nytimes.com"), CacheValue::new(9.0, 1));

        // First deadline passes; the newer entry must survive it
        sleep(Duration::from_secs(6)).await;
        assert_eq!(
            cache.lock().await.get(&key("nytimes.com")),
            Some(CacheValue::new(9.0, 1))
        );

        sleep(Duration::from_secs(5)).await;
        assert!(cache.lock().await.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn test_reaper_can_be_aborted() {
        let cache = CacheStore::new(100, Duration::from_secs(300)).into_shared();

        let handle = spawn_expiry_reaper(cache);
        handle.abort();

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(handle.is_finished(), "Task should be finished after abort");
    }
}
