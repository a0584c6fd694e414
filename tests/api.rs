//! HTTP surface tests driven through the router without a socket

use std::{sync::Arc, time::Duration};

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use multi_timer::{
    coordinator::{IntervalTickSource, TimerCoordinator, TICK_PERIOD},
    create_router,
    services::{AlertChannel, AlertConfig, CommandAlert},
    tasks::tick_dispatch_task,
    AppState,
};

fn app(max_timers: usize, initial: usize) -> Router {
    let alert: Arc<dyn AlertChannel> = Arc::new(CommandAlert::new(AlertConfig::default()));
    let (source, ticks) = IntervalTickSource::new(TICK_PERIOD);
    let mut coordinator = TimerCoordinator::new(max_timers, alert, Arc::new(source));
    for _ in 0..initial {
        coordinator.add_slot().unwrap();
    }
    let coordinator = coordinator.into_shared();
    tokio::spawn(tick_dispatch_task(Arc::clone(&coordinator), ticks));

    create_router(Arc::new(AppState::new(coordinator, 0, "127.0.0.1".to_string())))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app(3, 0);
    let (status, body) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn adding_beyond_capacity_conflicts() {
    let app = app(3, 1);

    for expected_id in [2, 3] {
        let (status, body) = send(&app, "POST", "/timers", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], expected_id);
        assert_eq!(body["state"], "idle");
    }

    let (status, body) = send(&app, "POST", "/timers", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["status"], "error");

    let (_, status_body) = send(&app, "GET", "/status", None).await;
    assert_eq!(status_body["timers"].as_array().unwrap().len(), 3);
    assert_eq!(status_body["can_add_timer"], false);
    assert_eq!(status_body["last_action"], "add timer");
}

#[tokio::test]
async fn unknown_timer_is_not_found() {
    let app = app(3, 1);
    let (status, _) = send(&app, "POST", "/timers/99/start", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "POST", "/timers/1/preset/2h", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn start_without_duration_is_unchanged() {
    let app = app(3, 1);
    let (status, body) = send(&app, "POST", "/timers/1/start", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "unchanged");
    assert_eq!(body["timer"]["state"], "idle");
    assert_eq!(body["timer"]["controls"]["primary_enabled"], false);
}

#[tokio::test]
async fn preset_arms_and_formats_display() {
    let app = app(3, 1);
    let (status, body) = send(&app, "POST", "/timers/1/preset/5m", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "applied");
    assert_eq!(body["timer"]["total_seconds"], 300);
    assert_eq!(body["timer"]["display"], "05:00");

    let (_, presets) = send(&app, "GET", "/presets", None).await;
    assert_eq!(presets.as_array().unwrap().len(), 6);
    assert_eq!(presets[5]["label"], "1h");
}

#[tokio::test(start_paused = true)]
async fn toggle_runs_pauses_and_finishes() {
    let app = app(3, 1);
    send(&app, "POST", "/timers/1/duration", Some(json!({ "seconds": 3 }))).await;

    let (_, body) = send(&app, "POST", "/timers/1/toggle", None).await;
    assert_eq!(body["timer"]["state"], "running");
    assert_eq!(body["timer"]["live_subscription"], true);
    assert_eq!(body["timer"]["controls"]["primary"], "pause");

    tokio::time::sleep(Duration::from_millis(1500)).await;
    let (_, body) = send(&app, "POST", "/timers/1/toggle", None).await;
    assert_eq!(body["timer"]["state"], "paused");
    assert_eq!(body["timer"]["remaining_seconds"], 2);
    assert_eq!(body["timer"]["controls"]["primary"], "resume");

    // Duration changes are accepted while paused and ignored while running
    let (_, body) = send(&app, "POST", "/timers/1/start", None).await;
    assert_eq!(body["status"], "applied");
    let (_, body) = send(&app, "POST", "/timers/1/duration", Some(json!({ "seconds": 60 }))).await;
    assert_eq!(body["status"], "unchanged");

    tokio::time::sleep(Duration::from_millis(2500)).await;
    let (_, timers) = send(&app, "GET", "/timers", None).await;
    assert_eq!(timers[0]["state"], "finished");
    assert_eq!(timers[0]["display"], "00:00");
    assert_eq!(timers[0]["live_subscription"], false);

    let (_, body) = send(&app, "POST", "/timers/1/reset", None).await;
    assert_eq!(body["timer"]["state"], "idle");
    assert_eq!(body["timer"]["remaining_seconds"], 3);
}

#[tokio::test]
async fn removing_a_timer_frees_a_slot() {
    let app = app(1, 1);
    let (status, _) = send(&app, "POST", "/timers", None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = send(&app, "DELETE", "/timers/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "POST", "/timers", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 2);
}
