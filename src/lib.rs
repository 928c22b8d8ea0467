pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

pub use adapters::memory::{InMemoryCache, InMemoryTaskStore};
pub use config::{CliConfig, Settings};
pub use core::dispatcher::{DispatchLimits, Dispatcher};
pub use core::worker::DeferredWorker;
pub use domain::model::{DeferredTask, DispatchOutcome, TaskStatus};
pub use utils::error::{DispatchError, Result};
