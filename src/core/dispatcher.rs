use crate::core::counter;
use crate::domain::model::{DispatchOutcome, Total};
use crate::domain::ports::{CachePort, TaskStore};
use crate::utils::error::{DispatchError, Result};
use std::sync::Arc;

/// Largest total the request boundary accepts.
pub const DEFAULT_MAX_TOTAL: Total = 47;

/// Largest total computed synchronously. Above this the worst-case
/// evaluation no longer fits the caller's response deadline and the request
/// is deferred.
pub const DEFAULT_SYNC_THRESHOLD: Total = 43;

#[derive(Debug, Clone, Copy)]
pub struct DispatchLimits {
    pub max_total: Total,
    pub sync_threshold: Total,
}

impl Default for DispatchLimits {
    fn default() -> Self {
        Self {
            max_total: DEFAULT_MAX_TOTAL,
            sync_threshold: DEFAULT_SYNC_THRESHOLD,
        }
    }
}

/// Routes one counting request through cache hit, synchronous compute, or
/// deferral. Holds no mutable state; concurrent `handle` calls share only
/// the port adapters.
pub struct Dispatcher<C: CachePort, T: TaskStore> {
    cache: Arc<C>,
    tasks: Arc<T>,
    limits: DispatchLimits,
}

impl<C, T> Dispatcher<C, T>
where
    C: CachePort + 'static,
    T: TaskStore,
{
    pub fn new(cache: Arc<C>, tasks: Arc<T>, limits: DispatchLimits) -> Self {
        Self {
            cache,
            tasks,
            limits,
        }
    }

    pub fn limits(&self) -> DispatchLimits {
        self.limits
    }

    /// Dispatch a single request.
    ///
    /// The only error this returns is `TaskStoreError` from the deferral
    /// path; cache failures degrade to recomputation and are logged only.
    pub async fn handle(&self, total: Total) -> Result<DispatchOutcome> {
        if total < 1 || total > self.limits.max_total {
            tracing::debug!("Rejecting out-of-domain total: {}", total);
            return Ok(DispatchOutcome::Invalid);
        }

        match self.cache.get(total).await {
            Ok(Some(count)) => {
                tracing::debug!("Cache hit for total {}: {}", total, count);
                return Ok(DispatchOutcome::Completed(count));
            }
            Ok(None) => {
                tracing::debug!("Cache miss for total {}", total);
            }
            Err(e) => {
                // Cache is an optimization, never a correctness dependency.
                tracing::warn!("Cache lookup failed for total {}: {}", total, e);
            }
        }

        if total <= self.limits.sync_threshold {
            let count = counter::count(total);

            // Cache write is detached from the response path; the caller
            // already has its answer if this fails.
            let cache = Arc::clone(&self.cache);
            tokio::spawn(async move {
                if let Err(e) = cache.put(total, count).await {
                    tracing::warn!("Cache write failed for total {}: {}", total, e);
                }
            });

            return Ok(DispatchOutcome::Completed(count));
        }

        // No fallback exists for oversized totals, so a create failure is
        // surfaced to the caller.
        let task = self
            .tasks
            .create(total)
            .await
            .map_err(|e| DispatchError::TaskStoreError {
                message: format!("failed to create deferred task for total {total}: {e}"),
            })?;

        tracing::info!("Deferred total {} as task {}", total, task.id);
        Ok(DispatchOutcome::Deferred(task.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryCache, InMemoryTaskStore};
    use crate::domain::model::TaskStatus;

    fn dispatcher() -> (
        Dispatcher<InMemoryCache, InMemoryTaskStore>,
        Arc<InMemoryCache>,
        Arc<InMemoryTaskStore>,
    ) {
        let cache = Arc::new(InMemoryCache::new());
        let (store, _rx) = InMemoryTaskStore::with_notifications(16);
        let store = Arc::new(store);
        let dispatcher = Dispatcher::new(
            Arc::clone(&cache),
            Arc::clone(&store),
            DispatchLimits::default(),
        );
        (dispatcher, cache, store)
    }

    #[tokio::test]
    async fn test_out_of_domain_totals_are_invalid() {
        let (dispatcher, _, _) = dispatcher();
        assert_eq!(dispatcher.handle(0).await.unwrap(), DispatchOutcome::Invalid);
        assert_eq!(
            dispatcher.handle(48).await.unwrap(),
            DispatchOutcome::Invalid
        );
    }

    #[tokio::test]
    async fn test_cache_hit_short_circuits_compute() {
        let (dispatcher, cache, _) = dispatcher();
        // Poisoned entry: a counter run would return 8, not 999.
        cache.put(5, 999).await.unwrap();
        assert_eq!(
            dispatcher.handle(5).await.unwrap(),
            DispatchOutcome::Completed(999)
        );
    }

    #[tokio::test]
    async fn test_threshold_boundary() {
        let (dispatcher, _, store) = dispatcher();

        assert_eq!(
            dispatcher.handle(43).await.unwrap(),
            DispatchOutcome::Completed(counter::count(43))
        );

        match dispatcher.handle(44).await.unwrap() {
            DispatchOutcome::Deferred(id) => {
                let task = store.fetch(id).await.unwrap().unwrap();
                assert_eq!(task.total, 44);
                assert_eq!(task.status, TaskStatus::Pending);
            }
            other => panic!("expected deferral, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_sync_compute_backfills_cache() {
        let (dispatcher, cache, _) = dispatcher();
        dispatcher.handle(10).await.unwrap();

        // The write is spawned; give the runtime time to run it.
        for _ in 0..100 {
            if cache.get(10).await.unwrap().is_some() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        }
        assert_eq!(cache.get(10).await.unwrap(), Some(counter::count(10)));
    }

    #[tokio::test]
    async fn test_broken_cache_degrades_to_compute() {
        let cache = Arc::new(InMemoryCache::broken());
        let (store, _rx) = InMemoryTaskStore::with_notifications(16);
        let dispatcher = Dispatcher::new(cache, Arc::new(store), DispatchLimits::default());

        assert_eq!(
            dispatcher.handle(6).await.unwrap(),
            DispatchOutcome::Completed(13)
        );
    }
}
