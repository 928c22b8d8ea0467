pub mod handlers;

use crate::adapters::memory::{InMemoryCache, InMemoryTaskStore};
use crate::core::dispatcher::Dispatcher;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;

/// Shared handles for the request handlers. The task store appears twice on
/// purpose: the dispatcher writes through it, the polling endpoint reads it.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher<InMemoryCache, InMemoryTaskStore>>,
    pub tasks: Arc<InMemoryTaskStore>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/permutations/{total}", get(handlers::get_permutations))
        .route("/tasks/{task_id}", get(handlers::get_task))
        .route("/health", get(handlers::health))
        .with_state(state)
}
