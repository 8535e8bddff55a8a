use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use uuid::Uuid;

/// Coalesces bursts of search calls per account. Each call registers a new
/// generation for its key and waits out the quiescence window; only the call
/// still holding the latest generation afterwards is admitted to the store.
/// Superseded calls return `false` and their responses are discarded, so a
/// slow early keystroke can never overwrite a later one.
pub struct SearchDebouncer {
    window: Duration,
    counter: AtomicU64,
    latest: Mutex<HashMap<Uuid, u64>>,
}

impl SearchDebouncer {
    pub fn new(window: Duration) -> Self {
        SearchDebouncer { window, counter: AtomicU64::new(0), latest: Mutex::new(HashMap::new()) }
    }

    pub async fn admit(&self, key: Uuid) -> bool {
        let generation = self.counter.fetch_add(1, Ordering::Relaxed) + 1;
        self.latest.lock().await.insert(key, generation);

        tokio::time::sleep(self.window).await;

        let mut latest = self.latest.lock().await;
        if latest.get(&key) == Some(&generation) {
            latest.remove(&key);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn only_last_call_in_a_burst_is_admitted() {
        let debouncer = Arc::new(SearchDebouncer::new(Duration::from_millis(50)));
        let key = Uuid::now_v7();

        let mut handles = Vec::new();
        for _ in 0..3 {
            let d = debouncer.clone();
            handles.push(tokio::spawn(async move { d.admit(key).await }));
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        let results: Vec<bool> =
            futures_util::future::join_all(handles).await.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(results, vec![false, false, true]);
    }

    #[tokio::test]
    async fn distinct_keys_do_not_interfere() {
        let debouncer = Arc::new(SearchDebouncer::new(Duration::from_millis(30)));
        let a = Uuid::now_v7();
        let b = Uuid::now_v7();

        let (ra, rb) = tokio::join!(debouncer.admit(a), debouncer.admit(b));
        assert!(ra);
        assert!(rb);
    }

    #[tokio::test]
    async fn sequential_calls_are_all_admitted() {
        let debouncer = SearchDebouncer::new(Duration::from_millis(10));
        let key = Uuid::now_v7();

        assert!(debouncer.admit(key).await);
        assert!(debouncer.admit(key).await);
    }
}
