use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use pretty_assertions::assert_eq;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::{Value, json};
use tower::ServiceExt;

use lifeos::Database;
use lifeos::server::{AppState, create_router};

fn app() -> Router {
    let db = Database::open_in_memory().unwrap();
    create_router(Arc::new(AppState::with_rng(db, StdRng::seed_from_u64(42))))
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn health_reports_ok() {
    let app = app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
}

#[tokio::test]
async fn task_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/tasks",
        Some(json!({"title": "Write report", "priority": "high"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["priority"], "high");
    let id = created["id"].as_str().unwrap().to_string();

    let (status, done) = send(
        &app,
        "PATCH",
        &format!("/api/tasks/{}", id),
        Some(json!({"status": "completed"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(done["status"], "completed");
    assert!(done["completedAt"].is_string());

    let (status, reopened) = send(
        &app,
        "PATCH",
        &format!("/api/tasks/{}", id),
        Some(json!({"status": "pending"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(reopened["completedAt"].is_null());

    let (status, ack) = send(&app, "DELETE", &format!("/api/tasks/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["message"], "Task deleted successfully");

    let (status, list) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn invalid_bodies_are_bad_requests() {
    let app = app();

    let (status, body) = send(&app, "POST", "/api/tasks", Some(json!({"title": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Error creating task");
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "POST", "/api/wellness", Some(json!({"mood": 9}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    // Malformed JSON
    let request = Request::builder()
        .method("POST")
        .uri("/api/notes")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn missing_records_are_not_found() {
    let app = app();
    let (status, body) = send(&app, "PATCH", "/api/tasks/nope", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");

    let (status, _) = send(&app, "POST", "/api/notes/nope/summarize", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", "/api/calendar/events/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn chat_returns_both_messages_and_keeps_history() {
    let app = app();

    let (status, exchange) = send(
        &app,
        "POST",
        "/api/chat/messages",
        Some(json!({"content": "Help me plan my schedule"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(exchange["userMessage"]["role"], "user");
    assert_eq!(exchange["aiMessage"]["role"], "assistant");
    assert!(!exchange["aiMessage"]["content"].as_str().unwrap().is_empty());

    let (_, history) = send(&app, "GET", "/api/chat/messages", None).await;
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["role"], "user");

    let (_, limited) = send(&app, "GET", "/api/chat/messages?limit=1", None).await;
    assert_eq!(limited.as_array().unwrap().len(), 1);
    assert_eq!(limited[0]["role"], "assistant");

    let (status, _) = send(&app, "POST", "/api/chat/messages", Some(json!({"content": ""}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn summarize_appends_tags_once() {
    let app = app();
    let (_, note) = send(
        &app,
        "POST",
        "/api/notes",
        Some(json!({"title": "Sprint", "content": "Planning notes", "tags": ["work"]})),
    )
    .await;
    let uri = format!("/api/notes/{}/summarize", note["id"].as_str().unwrap());

    let (status, first) = send(&app, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(first["analysis"]["summary"].is_string());
    let (_, second) = send(&app, "POST", &uri, None).await;
    assert_eq!(second["note"]["tags"], json!(["work", "ai-processed", "summarized"]));
}

#[tokio::test]
async fn prioritize_counts_every_pending_task() {
    let app = app();
    for title in ["One", "Two", "Done"] {
        send(&app, "POST", "/api/tasks", Some(json!({"title": title}))).await;
    }
    let (_, tasks) = send(&app, "GET", "/api/tasks", None).await;
    let done_id = tasks[0]["id"].as_str().unwrap().to_string();
    send(
        &app,
        "PATCH",
        &format!("/api/tasks/{}", done_id),
        Some(json!({"status": "completed"})),
    )
    .await;

    let (status, outcome) = send(&app, "POST", "/api/tasks/prioritize", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(outcome["message"], "Tasks prioritized successfully");
    assert_eq!(outcome["count"], 2);
    let (_, first) = send(&app, "GET", "/api/tasks", None).await;

    let (_, again) = send(&app, "POST", "/api/tasks/prioritize", None).await;
    assert_eq!(again["count"], 2);
    let (_, second) = send(&app, "GET", "/api/tasks", None).await;

    for (before, after) in first.as_array().unwrap().iter().zip(second.as_array().unwrap()) {
        if after["status"] == "completed" {
            assert!(after["aiSuggestion"].is_null());
            continue;
        }
        assert!(after["aiSuggestion"].is_string());
        assert_eq!(after["aiSuggestion"], before["aiSuggestion"], "suggestions are kept");
        assert_ne!(after["updatedAt"], before["updatedAt"]);
    }
}

#[tokio::test]
async fn created_records_match_the_listing() {
    let app = app();
    let cases = [
        ("/api/tasks", json!({"title": "Plan sprint", "dueDate": "2030-05-01"})),
        ("/api/notes", json!({"title": "Retro", "content": "Ship smaller", "tags": ["team"]})),
        (
            "/api/calendar/events",
            json!({
                "title": "Review",
                "startTime": "2030-05-02T10:00:00.123456789Z",
                "endTime": "2030-05-02T11:00:00Z",
                "type": "focus-block"
            }),
        ),
        ("/api/wellness", json!({"mood": 4, "focusScore": 65})),
    ];

    for (uri, body) in cases {
        let (status, created) = send(&app, "POST", uri, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", uri);
        let (_, listed) = send(&app, "GET", uri, None).await;
        assert_eq!(listed, json!([created]), "{}", uri);
    }

    let (_, created) = send(&app, "POST", "/api/chat/messages", Some(json!({"content": "hi"}))).await;
    let (_, listed) = send(&app, "GET", "/api/chat/messages", None).await;
    assert_eq!(listed, json!([created["userMessage"], created["aiMessage"]]));
}

#[tokio::test]
async fn storage_failures_are_500_without_details() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifeos.db");
    let db = Database::new(&path).unwrap();
    let app = create_router(Arc::new(AppState::with_rng(db, StdRng::seed_from_u64(1))));

    // A row no build of the app would write
    let raw = rusqlite::Connection::open(&path).unwrap();
    raw.execute(
        "INSERT INTO tasks (id, title, priority, status, created_at, updated_at)
         VALUES ('bad', 'Broken', 'urgent', 'pending', '2030-01-01T00:00:00Z', '2030-01-01T00:00:00Z')",
        [],
    )
    .unwrap();

    let (status, body) = send(&app, "GET", "/api/tasks", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"message": "Error fetching tasks", "error": "internal server error"})
    );

    let (status, _) = send(&app, "GET", "/api/analytics/productivity", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn calendar_range_needs_both_bounds() {
    let app = app();
    for (title, start) in [
        ("Early", "2030-01-01T09:00:00Z"),
        ("Mid", "2030-01-10T09:00:00Z"),
        ("Late", "2030-02-01T09:00:00Z"),
    ] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/calendar/events",
            Some(json!({"title": title, "startTime": start, "endTime": start})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, all) = send(&app, "GET", "/api/calendar/events?startDate=2030-01-05", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, ranged) = send(
        &app,
        "GET",
        "/api/calendar/events?startDate=2030-01-05&endDate=2030-01-10",
        None,
    )
    .await;
    let titles: Vec<_> = ranged.as_array().unwrap().iter().map(|e| e["title"].clone()).collect();
    assert_eq!(titles, vec![json!("Mid")]);
}

#[tokio::test]
async fn wellness_and_analytics() {
    let app = app();
    for (mood, focus) in [(4, Some(80)), (3, Some(60)), (5, None)] {
        let mut body = json!({"mood": mood});
        if let Some(focus) = focus {
            body["focusScore"] = json!(focus);
        }
        let (status, _) = send(&app, "POST", "/api/wellness", Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, entries) = send(&app, "GET", "/api/wellness?limit=2", None).await;
    assert_eq!(entries.as_array().unwrap().len(), 2);

    let (status, report) = send(&app, "GET", "/api/analytics/productivity", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["stats"]["totalTasks"], 0);
    assert!(report["productivityScore"].is_number());
    assert!(report["focusTrend"].is_string());
}

#[tokio::test]
async fn user_profile_updates() {
    let app = app();
    let (_, user) = send(&app, "GET", "/api/user", None).await;
    assert_eq!(user["name"], "Ananya");

    let (status, renamed) = send(&app, "PATCH", "/api/user", Some(json!({"name": "Sam"}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Sam");
    assert_eq!(renamed["id"], user["id"]);
}
