pub mod counter;
pub mod dispatcher;
pub mod worker;

pub use crate::domain::model::{
    DeferredTask, DispatchOutcome, PermutationCount, TaskCreated, TaskStatus, Total,
};
pub use crate::domain::ports::{CachePort, TaskStore};
pub use crate::utils::error::Result;
