// src/inflight.rs
// Coalesces concurrent requests for the same key into one producer task.

use futures::future::{BoxFuture, FutureExt, Shared};
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};

/// `None` means the producer task panicked or was aborted.
type PendingResult<V> = Shared<BoxFuture<'static, Option<V>>>;
type PendingMap<V> = Arc<Mutex<HashMap<String, PendingResult<V>>>>;

pub struct InFlightRegistry<V> {
    pending: PendingMap<V>,
}

/// Removes the key when the producer task finishes, on every exit path.
struct PendingGuard<V> {
    key: String,
    pending: PendingMap<V>,
}

impl<V> Drop for PendingGuard<V> {
    fn drop(&mut self) {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        pending.remove(&self.key);
    }
}

impl<V> InFlightRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Await the result for `key`, starting `producer` only if nothing is in
    /// flight for it. The producer runs on its own task and completes even if
    /// every caller is dropped. `recover` supplies the value if it panics.
    pub async fn run<F, Fut, R>(&self, key: &str, producer: F, recover: R) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V> + Send + 'static,
        R: FnOnce() -> V,
    {
        let shared = {
            let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);

            match pending.get(key) {
                Some(existing) => {
                    tracing::debug!("Joining in-flight request: {}", key);
                    existing.clone()
                }
                None => {
                    let guard = PendingGuard {
                        key: key.to_string(),
                        pending: Arc::clone(&self.pending),
                    };
                    let work = producer();
                    let handle = tokio::spawn(async move {
                        let _guard = guard;
                        work.await
                    });

                    let shared = async move {
                        match handle.await {
                            Ok(value) => Some(value),
                            Err(e) => {
                                tracing::error!("In-flight producer failed: {}", e);
                                None
                            }
                        }
                    }
                    .boxed()
                    .shared();

                    pending.insert(key.to_string(), shared.clone());
                    shared
                }
            }
        };

        match shared.await {
            Some(value) => value,
            None => recover(),
        }
    }

    pub fn in_flight(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl<V> Default for InFlightRegistry<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_concurrent_callers_share_one_producer() {
        let registry = Arc::new(InFlightRegistry::<u32>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let registry = Arc::clone(&registry);
            let calls = Arc::clone(&calls);
            tasks.push(tokio::spawn(async move {
                registry
                    .run(
                        "combined-Tokyo-55",
                        move || async move {
                            calls.fetch_add(1, Ordering::SeqCst);
                            tokio::time::sleep(Duration::from_millis(50)).await;
                            42
                        },
                        || 0,
                    )
                    .await
            }));
        }

        for task in tasks {
            assert_eq!(task.await.unwrap(), 42);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(registry.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_entry_removed_after_panic() {
        let registry = InFlightRegistry::<u32>::new();

        let value = registry
            .run(
                "boom",
                || async {
                    if true {
                        panic!("producer blew up");
                    }
                    1
                },
                || 7,
            )
            .await;

        assert_eq!(value, 7);
        assert_eq!(registry.in_flight(), 0);

        // A later call starts a fresh producer
        let value = registry.run("boom", || async { 3 }, || 7).await;
        assert_eq!(value, 3);
    }

    #[tokio::test]
    async fn test_distinct_keys_run_independently() {
        let registry = InFlightRegistry::<String>::new();
        let (a, b) = tokio::join!(
            registry.run("a", || async { "a".to_string() }, String::new),
            registry.run("b", || async { "b".to_string() }, String::new),
        );
        assert_eq!(a, "a");
        assert_eq!(b, "b");
    }
}
