use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Number of pills whose dosing-sequence count is requested.
pub type Total = u32;

/// Number of ordered 1-or-2 pill sequences summing exactly to a total.
/// `u64` comfortably holds counts far beyond the accepted domain.
pub type PermutationCount = u64;

/// Lifecycle of a deferred counting task. After creation the worker is the
/// sole writer; `Complete` is the only terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Created by the dispatcher, not yet picked up.
    Pending,
    /// Worker has claimed the task and is computing.
    InProgress,
    /// Result is recorded; nothing further happens to the record.
    Complete,
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete)
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::InProgress)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in_progress" => Ok(Self::InProgress),
            "complete" => Ok(Self::Complete),
            _ => Err(format!("Invalid task status: {s}")),
        }
    }
}

/// Durable record of a counting request that exceeded the synchronous
/// budget. Retained indefinitely for client polling; never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeferredTask {
    pub id: Uuid,
    pub total: Total,
    pub status: TaskStatus,
    /// Present only once `status` is `Complete`.
    pub result: Option<PermutationCount>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DeferredTask {
    pub fn new(total: Total) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            total,
            status: TaskStatus::Pending,
            result: None,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Change-notification event emitted by the task store on record creation.
/// Update and delete notifications are never emitted, so consumers only
/// ever see fresh work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskCreated {
    pub id: Uuid,
    pub total: Total,
}

/// Outcome of dispatching a single counting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Answered synchronously, from cache or by computing.
    Completed(PermutationCount),
    /// Handed off to the deferred path; poll the task for the result.
    Deferred(Uuid),
    /// Requested total lies outside the accepted domain.
    Invalid,
}
