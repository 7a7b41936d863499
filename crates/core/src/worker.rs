//! Bounded pool for blocking PDF and filesystem work.

use crate::error::SorterError;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{self, JoinHandle};
use tracing::warn;

#[derive(Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    size: usize,
}

impl WorkerPool {
    pub fn new(size: usize) -> Self {
        let size = size.max(1);
        Self {
            permits: Arc::new(Semaphore::new(size)),
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Runs `job` on a blocking thread once a slot is free and waits for it.
    pub async fn run<F, T>(&self, job: F) -> Result<T, SorterError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| SorterError::Worker(e.to_string()))?;
        task::spawn_blocking(move || {
            let _permit = permit;
            job()
        })
        .await
        .map_err(|e| SorterError::Worker(e.to_string()))
    }

    /// Queues `job` without waiting. Failures and panics are only logged.
    pub fn spawn_detached<F>(&self, job: F) -> JoinHandle<()>
    where
        F: FnOnce() + Send + 'static,
    {
        let pool = self.clone();
        tokio::spawn(async move {
            if let Err(e) = pool.run(job).await {
                warn!(error = %e, "background job failed");
            }
        })
    }
}
