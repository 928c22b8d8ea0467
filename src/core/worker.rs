use crate::core::counter;
use crate::domain::model::{TaskCreated, TaskStatus};
use crate::domain::ports::{CachePort, TaskStore};
use std::sync::Arc;
use tokio::sync::mpsc;

/// How many creation events are pulled off the channel per batch.
const BATCH_SIZE: usize = 32;

/// Consumes task-creation events and drives each task from `Pending` to
/// `Complete`. Reprocessing a delivered event is safe: both writes record a
/// pure function of the total, so a second pass lands the same values.
pub struct DeferredWorker<C: CachePort, T: TaskStore> {
    cache: Arc<C>,
    tasks: Arc<T>,
}

impl<C: CachePort, T: TaskStore> Clone for DeferredWorker<C, T> {
    fn clone(&self) -> Self {
        Self {
            cache: Arc::clone(&self.cache),
            tasks: Arc::clone(&self.tasks),
        }
    }
}

impl<C, T> DeferredWorker<C, T>
where
    C: CachePort + 'static,
    T: TaskStore + 'static,
{
    pub fn new(cache: Arc<C>, tasks: Arc<T>) -> Self {
        Self { cache, tasks }
    }

    /// Drain the creation feed until the sending side closes. Records within
    /// a batch carry no ordering, so each one runs on its own task.
    pub async fn run(self, mut rx: mpsc::Receiver<TaskCreated>) {
        tracing::info!("Deferred worker started");
        let mut batch = Vec::with_capacity(BATCH_SIZE);

        loop {
            let received = rx.recv_many(&mut batch, BATCH_SIZE).await;
            if received == 0 {
                break;
            }
            tracing::debug!("Processing batch of {} creation event(s)", received);

            let mut handles = Vec::with_capacity(received);
            for event in batch.drain(..) {
                let worker = self.clone();
                handles.push(tokio::spawn(async move { worker.react(event).await }));
            }
            for handle in handles {
                if let Err(e) = handle.await {
                    tracing::error!("Worker task panicked: {}", e);
                }
            }
        }

        tracing::info!("Deferred worker stopped: creation feed closed");
    }

    /// Process one creation event. No synchronous-budget threshold applies
    /// here; the worker has no response deadline.
    pub async fn react(&self, event: TaskCreated) {
        let TaskCreated { id, total } = event;
        tracing::info!("Picked up task {} (total {})", id, total);

        // Advisory for pollers only, so processing continues on failure.
        if let Err(e) = self
            .tasks
            .update_status(id, TaskStatus::InProgress, None)
            .await
        {
            tracing::warn!("Failed to mark task {} in_progress: {}", id, e);
        }

        let count = counter::count(total);

        // The completion write is the durable record of the result. Retry
        // once; a task left in_progress is stuck from the client's view.
        let mut completed = self
            .tasks
            .update_status(id, TaskStatus::Complete, Some(count))
            .await;
        if let Err(e) = &completed {
            tracing::warn!("Completion write for task {} failed, retrying: {}", id, e);
            completed = self
                .tasks
                .update_status(id, TaskStatus::Complete, Some(count))
                .await;
        }
        match completed {
            Ok(()) => tracing::info!("Task {} complete: count({}) = {}", id, total, count),
            Err(e) => tracing::error!(
                "Task {} is stuck in_progress: completion write failed twice: {}",
                id,
                e
            ),
        }

        // Later requests for the same total should hit the cache instead of
        // re-deferring.
        if let Err(e) = self.cache.put(total, count).await {
            tracing::warn!("Cache write failed for total {}: {}", total, e);
        }
    }
}
