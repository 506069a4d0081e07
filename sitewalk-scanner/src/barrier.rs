use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    notify: Notify,
}

/// Counts in-flight crawl tasks and wakes the waiter once none remain.
///
/// A task registers with [`CompletionBarrier::enter`] before it is spawned and
/// holds the returned guard for its whole life; dropping the guard (on any
/// exit path, panics included) deregisters it.
#[derive(Debug, Clone, Default)]
pub struct CompletionBarrier {
    inner: Arc<Inner>,
}

#[must_use = "the task is deregistered as soon as the guard is dropped"]
#[derive(Debug)]
pub struct BarrierGuard {
    inner: Arc<Inner>,
}

impl CompletionBarrier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter(&self) -> BarrierGuard {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        BarrierGuard {
            inner: self.inner.clone(),
        }
    }

    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Resolves once every registered task has dropped its guard.
    pub async fn wait(&self) {
        while self.pending() > 0 {
            self.inner.notify.notified().await;
        }
    }
}

impl Drop for BarrierGuard {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            // notify_one keeps a permit if the waiter is between its check and await
            self.inner.notify.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_immediately_when_idle() {
        let barrier = CompletionBarrier::new();
        barrier.wait().await;
        assert_eq!(barrier.pending(), 0);
    }

    #[tokio::test]
    async fn test_guard_drop_decrements() {
        let barrier = CompletionBarrier::new();
        let first = barrier.enter();
        let second = barrier.enter();
        assert_eq!(barrier.pending(), 2);

        drop(first);
        assert_eq!(barrier.pending(), 1);
        drop(second);
        assert_eq!(barrier.pending(), 0);
    }

    #[tokio::test]
    async fn test_wait_covers_nested_tasks() {
        let barrier = CompletionBarrier::new();
        let finished = Arc::new(AtomicUsize::new(0));

        let guard = barrier.enter();
        let nested = barrier.clone();
        let counter = finished.clone();
        tokio::spawn(async move {
            let _guard = guard;
            for _ in 0..3 {
                let child_guard = nested.enter();
                let counter = counter.clone();
                tokio::spawn(async move {
                    let _guard = child_guard;
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            }
            counter.fetch_add(1, Ordering::SeqCst);
        });

        barrier.wait().await;
        assert_eq!(finished.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_panicking_task_still_leaves_barrier() {
        let barrier = CompletionBarrier::new();
        let guard = barrier.enter();

        let handle = tokio::spawn(async move {
            let _guard = guard;
            panic!("task failed");
        });

        assert!(handle.await.is_err());
        barrier.wait().await;
        assert_eq!(barrier.pending(), 0);
    }
}
