use crate::domain::model::{DeferredTask, PermutationCount, TaskStatus, Total};
use crate::utils::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Cache-aside store mapping a total to its permutation count. Both sides
/// are best-effort for callers: a failing cache degrades to recomputation,
/// never to a failed request.
#[async_trait]
pub trait CachePort: Send + Sync {
    async fn get(&self, total: Total) -> Result<Option<PermutationCount>>;
    async fn put(&self, total: Total, count: PermutationCount) -> Result<()>;
}

/// Durable task records plus a change-notification feed. The backing store
/// emits one `TaskCreated` event per `create`; updates are silent.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new `Pending` task for the given total.
    async fn create(&self, total: Total) -> Result<DeferredTask>;

    /// Advance the task's status, recording the result when present.
    async fn update_status(
        &self,
        id: Uuid,
        status: TaskStatus,
        result: Option<PermutationCount>,
    ) -> Result<()>;

    /// Fetch the current record for client polling.
    async fn fetch(&self, id: Uuid) -> Result<Option<DeferredTask>>;
}
