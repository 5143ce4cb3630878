use crate::error::{AppError, Result};
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinHandle;

/// Default number of probes allowed in flight at once.
pub const DEFAULT_WORKERS: usize = 4;

/// Shared execution substrate for every host's polling task.
///
/// Tasks are spawned onto the runtime that was current when the pool was
/// built; a semaphore bounds how many of them may be probing at once. The
/// pool is torn down exactly once, after which spawning fails and waiting
/// tasks are released.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    inner: Arc<PoolInner>,
}

#[derive(Debug)]
struct PoolInner {
    handle: Handle,
    permits: Arc<Semaphore>,
    workers: usize,
    shut_down: AtomicBool,
}

impl WorkerPool {
    /// Must be called from within a Tokio runtime.
    pub fn new(workers: usize) -> Result<Self> {
        if workers == 0 {
            return Err(AppError::Scheduler(
                "worker pool needs at least one worker".to_string(),
            ));
        }
        let handle = Handle::try_current().map_err(|e| AppError::Scheduler(e.to_string()))?;
        Ok(Self {
            inner: Arc::new(PoolInner {
                handle,
                permits: Arc::new(Semaphore::new(workers)),
                workers,
                shut_down: AtomicBool::new(false),
            }),
        })
    }

    pub fn workers(&self) -> usize {
        self.inner.workers
    }

    pub fn spawn<F>(&self, task: F) -> Result<JoinHandle<()>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        if self.is_shut_down() {
            return Err(AppError::ShutDown);
        }
        Ok(self.inner.handle.spawn(task))
    }

    /// Waits for a free worker slot. Fails once the pool is shut down.
    pub async fn acquire(&self) -> Result<OwnedSemaphorePermit> {
        self.inner
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| AppError::ShutDown)
    }

    /// Returns `true` only for the call that actually performed the teardown.
    pub fn shutdown(&self) -> bool {
        if self.inner.shut_down.swap(true, Ordering::AcqRel) {
            return false;
        }
        self.inner.permits.close();
        tracing::debug!(workers = self.inner.workers, "worker pool shut down");
        true
    }

    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_pending, assert_ready_ok, task};

    #[test]
    fn test_new_outside_runtime_fails() {
        assert!(matches!(WorkerPool::new(2), Err(AppError::Scheduler(_))));
    }

    #[tokio::test]
    async fn test_zero_workers_rejected() {
        assert!(matches!(WorkerPool::new(0), Err(AppError::Scheduler(_))));
    }

    #[tokio::test]
    async fn test_permits_bound_concurrency() {
        let pool = WorkerPool::new(2).unwrap();
        let first = pool.acquire().await.unwrap();
        let _second = pool.acquire().await.unwrap();

        let mut third = task::spawn(pool.acquire());
        assert_pending!(third.poll());

        drop(first);
        assert!(third.is_woken());
        assert_ready_ok!(third.poll());
    }

    #[tokio::test]
    async fn test_shutdown_once_then_rejects_work() {
        let pool = WorkerPool::new(1).unwrap();
        assert!(pool.shutdown());
        assert!(!pool.shutdown());
        assert!(pool.is_shut_down());
        assert!(matches!(pool.spawn(async {}), Err(AppError::ShutDown)));
        assert!(matches!(pool.acquire().await, Err(AppError::ShutDown)));
    }

    #[tokio::test]
    async fn test_spawn_runs_task() {
        let pool = WorkerPool::new(1).unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel();
        pool.spawn(async move {
            let _ = tx.send(42);
        })
        .unwrap();
        assert_eq!(rx.await.unwrap(), 42);
    }
}
