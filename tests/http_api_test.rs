use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use dose_count::core::counter;
use dose_count::web::{router, AppState};
use dose_count::{
    DeferredWorker, DispatchLimits, Dispatcher, InMemoryCache, InMemoryTaskStore,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use uuid::Uuid;

fn app(spawn_worker: bool) -> Router {
    let cache = Arc::new(InMemoryCache::new());
    let (store, rx) = InMemoryTaskStore::with_notifications(16);
    let store = Arc::new(store);

    if spawn_worker {
        let worker = DeferredWorker::new(Arc::clone(&cache), Arc::clone(&store));
        tokio::spawn(worker.run(rx));
    }

    let dispatcher = Arc::new(Dispatcher::new(
        Arc::clone(&cache),
        Arc::clone(&store),
        DispatchLimits::default(),
    ));
    router(AppState {
        dispatcher,
        tasks: store,
    })
}

async fn get(app: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_health() {
    let app = app(false);
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_small_total_returns_200_with_count() {
    let app = app(false);
    let (status, body) = get(&app, "/permutations/5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["permutations"], 8);
}

#[tokio::test]
async fn test_out_of_domain_totals_return_400() {
    let app = app(false);
    for uri in ["/permutations/0", "/permutations/48"] {
        let (status, body) = get(&app, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "uri {uri}");
        assert!(body["error"].as_str().unwrap().contains("between 1 and 47"));
    }
}

#[tokio::test]
async fn test_non_numeric_total_returns_400() {
    let app = app(false);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/permutations/many")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_large_total_returns_202_then_polls_to_completion() {
    let app = app(true);

    let (status, body) = get(&app, "/permutations/44").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let task_id = body["task_id"].as_str().unwrap().to_string();
    let poll_url = body["poll_url"].as_str().unwrap().to_string();
    assert_eq!(poll_url, format!("/tasks/{task_id}"));

    let mut last = serde_json::Value::Null;
    for _ in 0..200 {
        let (status, body) = get(&app, &poll_url).await;
        assert_eq!(status, StatusCode::OK);
        last = body;
        if last["status"] == "complete" {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    assert_eq!(last["status"], "complete");
    assert_eq!(last["total"], 44);
    assert_eq!(last["result"], counter::count(44));
}

#[tokio::test]
async fn test_unknown_task_returns_404() {
    let app = app(false);
    let (status, body) = get(&app, &format!("/tasks/{}", Uuid::new_v4())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("No task"));
}

#[tokio::test]
async fn test_pending_task_has_no_result_field() {
    // No worker running, so the task stays pending.
    let app = app(false);
    let (status, body) = get(&app, "/permutations/45").await;
    assert_eq!(status, StatusCode::ACCEPTED);

    let poll_url = body["poll_url"].as_str().unwrap().to_string();
    let (status, body) = get(&app, &poll_url).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert!(body.get("result").is_none());
}
