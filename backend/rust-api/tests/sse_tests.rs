mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use common::{create_game, create_test_app, send, WALLET};
use http_body_util::BodyExt;
use serde_json::json;
use std::time::Duration;
use tokio::time::timeout;
use tower::ServiceExt;

/// Next SSE event block, skipping keep-alive comments. `None` once the body ends.
async fn next_event(body: &mut Body) -> Option<String> {
    while let Some(frame) = body.frame().await {
        let Ok(data) = frame.unwrap().into_data() else {
            continue;
        };
        let text = String::from_utf8_lossy(&data).to_string();
        if text.trim_start().starts_with(':') {
            continue;
        }
        return Some(text);
    }
    None
}

/// Reads events until one named `name` arrives.
async fn next_named(body: &mut Body, name: &str) -> String {
    let marker = format!("event: {}", name);
    let wait = async {
        loop {
            match next_event(body).await {
                Some(event) if event.contains(&marker) => return event,
                Some(_) => continue,
                None => panic!("stream ended before {}", name),
            }
        }
    };
    timeout(Duration::from_secs(30), wait)
        .await
        .unwrap_or_else(|_| panic!("no {} event", name))
}

async fn open_stream(app: &axum::Router, id: &str) -> Body {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/games/{}/stream", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    response.into_body()
}

#[tokio::test(start_paused = true)]
async fn test_stream_sends_snapshot_then_game_events() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    let base = format!("/api/v1/games/{}", id);
    send(&app, "POST", &format!("{}/start", base), Some(WALLET), None).await;

    let mut body = open_stream(&app, &id).await;

    let first = next_event(&mut body).await.unwrap();
    assert!(first.contains("event: snapshot"));
    assert!(first.contains("\"state\":\"playing\""));
    assert!(first.contains("\"time_left\":60"));

    let tick = next_named(&mut body, "timer-tick").await;
    assert!(tick.contains("\"remaining_seconds\":59"));
    assert!(tick.contains(&id));

    send(&app, "POST", &format!("{}/answer", base), None, Some(json!({ "label": "B" }))).await;
    send(&app, "POST", &format!("{}/submit", base), None, None).await;
    let submitted = next_named(&mut body, "answer-submitted").await;
    assert!(submitted.contains("\"correct\":true"));

    let advanced = next_named(&mut body, "question-advanced").await;
    assert!(advanced.contains("\"question_index\":1"));
}

#[tokio::test(start_paused = true)]
async fn test_stream_ends_when_game_is_deleted() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    let base = format!("/api/v1/games/{}", id);
    send(&app, "POST", &format!("{}/start", base), Some(WALLET), None).await;

    let mut body = open_stream(&app, &id).await;
    next_named(&mut body, "snapshot").await;
    next_named(&mut body, "timer-tick").await;

    let (status, _) = send(&app, "DELETE", &base, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // Whatever was already buffered drains, then the body finishes
    let drained = timeout(Duration::from_secs(30), async {
        while next_event(&mut body).await.is_some() {}
    })
    .await;
    assert!(drained.is_ok(), "stream stayed open after delete");
}

#[tokio::test]
async fn test_stream_for_unknown_game() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        "GET",
        "/api/v1/games/550e8400-e29b-41d4-a716-446655440000/stream",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);
}
