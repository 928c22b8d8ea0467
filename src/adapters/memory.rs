use crate::domain::model::{DeferredTask, PermutationCount, TaskCreated, TaskStatus, Total};
use crate::domain::ports::{CachePort, TaskStore};
use crate::utils::error::{DispatchError, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// Process-local cache of total → count. Stands in for the external
/// key-value service behind `CachePort`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    entries: Arc<RwLock<HashMap<Total, PermutationCount>>>,
    fail: bool,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A cache whose every call fails, for exercising the degraded path.
    pub fn broken() -> Self {
        Self {
            entries: Arc::default(),
            fail: true,
        }
    }
}

#[async_trait]
impl CachePort for InMemoryCache {
    async fn get(&self, total: Total) -> Result<Option<PermutationCount>> {
        if self.fail {
            return Err(DispatchError::CacheError {
                message: "cache backend offline".to_string(),
            });
        }
        Ok(self.entries.read().await.get(&total).copied())
    }

    async fn put(&self, total: Total, count: PermutationCount) -> Result<()> {
        if self.fail {
            return Err(DispatchError::CacheError {
                message: "cache backend offline".to_string(),
            });
        }
        // Last-write-wins: the value is a pure function of the total, so
        // concurrent writers always agree.
        self.entries.write().await.insert(total, count);
        Ok(())
    }
}

/// Process-local task records plus the creation-event feed the deferred
/// worker consumes. One `TaskCreated` is emitted per insert; status updates
/// are silent, so redelivered work only ever comes from creations.
#[derive(Debug, Clone)]
pub struct InMemoryTaskStore {
    records: Arc<RwLock<HashMap<Uuid, DeferredTask>>>,
    creations: mpsc::Sender<TaskCreated>,
}

impl InMemoryTaskStore {
    /// Build the store together with the receiving half of its creation
    /// feed, sized to `capacity` undelivered events.
    pub fn with_notifications(capacity: usize) -> (Self, mpsc::Receiver<TaskCreated>) {
        let (tx, rx) = mpsc::channel(capacity);
        let store = Self {
            records: Arc::new(RwLock::new(HashMap::new())),
            creations: tx,
        };
        (store, rx)
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, total: Total) -> Result<DeferredTask> {
        let task = DeferredTask::new(total);
        self.records.write().await.insert(task.id, task.clone());

        // The record is durable at this point; a lost notification leaves
        // the task pending but pollable, it does not undo the create.
        let event = TaskCreated {
            id: task.id,
            total,
        };
        if let Err(e) = self.creations.try_send(event) {
            tracing::error!("Creation event for task {} was not delivered: {}", task.id, e);
        }

        Ok(task)
    }

    async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        result: Option<PermutationCount>,
    ) -> Result<()> {
        let mut records = self.records.write().await;
        let task = records
            .get_mut(&id)
            .ok_or(DispatchError::TaskNotFound { id })?;

        task.status = status;
        if result.is_some() {
            task.result = result;
        }
        task.updated_at = Utc::now();
        Ok(())
    }

    async fn fetch(&self, id: Uuid) -> Result<Option<DeferredTask>> {
        Ok(self.records.read().await.get(&id).cloned())
    }
}
