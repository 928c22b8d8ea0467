use crate::domain::model::{DispatchOutcome, PermutationCount, TaskStatus, Total};
use crate::domain::ports::TaskStore;
use crate::web::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct PermutationResponse {
    pub total: Total,
    pub permutations: PermutationCount,
}

#[derive(Debug, Serialize)]
pub struct DeferredResponse {
    pub task_id: Uuid,
    pub poll_url: String,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: Uuid,
    pub total: Total,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<PermutationCount>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// GET /permutations/{total}
///
/// 200 with the count, 202 with a pollable task handle, or 400 for totals
/// outside the accepted domain.
pub async fn get_permutations(
    State(state): State<AppState>,
    Path(total): Path<Total>,
) -> Response {
    match state.dispatcher.handle(total).await {
        Ok(DispatchOutcome::Completed(permutations)) => (
            StatusCode::OK,
            Json(PermutationResponse {
                total,
                permutations,
            }),
        )
            .into_response(),
        Ok(DispatchOutcome::Deferred(task_id)) => (
            StatusCode::ACCEPTED,
            Json(DeferredResponse {
                task_id,
                poll_url: format!("/tasks/{task_id}"),
            }),
        )
            .into_response(),
        Ok(DispatchOutcome::Invalid) => {
            let max = state.dispatcher.limits().max_total;
            error_response(
                StatusCode::BAD_REQUEST,
                &format!("total must be between 1 and {max}"),
            )
        }
        Err(e) => {
            tracing::error!("Dispatch failed for total {}: {}", total, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.user_friendly_message(),
            )
        }
    }
}

/// GET /tasks/{task_id} — polling boundary for deferred work.
pub async fn get_task(State(state): State<AppState>, Path(task_id): Path<Uuid>) -> Response {
    match state.tasks.fetch(task_id).await {
        Ok(Some(task)) => (
            StatusCode::OK,
            Json(TaskResponse {
                id: task.id,
                total: task.total,
                status: task.status,
                result: task.result,
            }),
        )
            .into_response(),
        Ok(None) => error_response(StatusCode::NOT_FOUND, &format!("No task with id {task_id}")),
        Err(e) => {
            tracing::error!("Task lookup failed for {}: {}", task_id, e);
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.user_friendly_message(),
            )
        }
    }
}

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
