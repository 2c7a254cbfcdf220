mod common;

use axum::http::StatusCode;
use common::{create_game, create_test_app, create_test_app_with, question, send, WALLET};
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

#[tokio::test]
async fn test_create_game_starts_waiting() {
    let (app, _) = create_test_app();
    let (status, json) = send(&app, "POST", "/api/v1/games", None, None).await;

    assert_eq!(status, StatusCode::CREATED);
    assert!(json["game_id"].is_string());
    assert_eq!(json["game"]["state"], "waiting");
    assert_eq!(json["game"]["score"], 0);
    assert!(json["game"]["question"].is_null());
}

#[tokio::test]
async fn test_unknown_and_malformed_game_ids() {
    let (app, _) = create_test_app();

    let (status, json) = send(
        &app,
        "GET",
        "/api/v1/games/550e8400-e29b-41d4-a716-446655440000",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["status"], 404);

    let (status, _) = send(&app, "GET", "/api/v1/games/not-a-game", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_start_requires_wallet() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    let uri = format!("/api/v1/games/{}/start", id);

    let (status, json) = send(&app, "POST", &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["accepted"], false);
    assert_eq!(json["game"]["state"], "waiting");

    let (_, json) = send(&app, "POST", &uri, Some("0xnot-a-wallet"), None).await;
    assert_eq!(json["accepted"], false);

    let (_, json) = send(&app, "POST", &uri, Some(WALLET), None).await;
    assert_eq!(json["accepted"], true);
    assert_eq!(json["game"]["state"], "playing");
    assert_eq!(json["game"]["time_left"], 60);
    assert_eq!(json["game"]["question"]["options"][1], "B) Punk6529");
    assert!(json["game"]["question"]["correct_answer"].is_null());
}

#[tokio::test]
async fn test_invalid_question_bank_is_unprocessable() {
    let (app, _) = create_test_app_with(vec![question(1, 100, 60), question(2, 100, 0)]);
    let id = create_game(&app).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/api/v1/games/{}/start", id),
        Some(WALLET),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["message"].as_str().unwrap().contains("position 1"));

    let (_, json) = send(&app, "GET", &format!("/api/v1/games/{}", id), None, None).await;
    assert_eq!(json["state"], "waiting");
}

#[tokio::test]
async fn test_answer_body_is_validated() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    let uri = format!("/api/v1/games/{}/answer", id);

    let (status, _) = send(&app, "POST", &uri, None, Some(json!({ "label": "A".repeat(17) }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = send(&app, "POST", &uri, None, Some(json!({ "wrong": 1 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["status"], 400);

    // Valid body, but nothing to answer yet
    let (status, json) = send(&app, "POST", &uri, None, Some(json!({ "label": "A" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["accepted"], false);
}

#[tokio::test]
async fn test_hints_are_capped_at_three() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    send(&app, "POST", &format!("/api/v1/games/{}/start", id), Some(WALLET), None).await;

    let uri = format!("/api/v1/games/{}/hints", id);
    let expected = ["Not the founder", "Collects punks", "Number in the name"];
    for (i, hint) in expected.iter().enumerate() {
        let (status, json) = send(&app, "POST", &uri, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["accepted"], true);
        assert_eq!(json["hint"], *hint);
        assert_eq!(json["hints_used"], i + 1);
        assert_eq!(json["cost"], 10);
    }

    let (_, json) = send(&app, "POST", &uri, None, None).await;
    assert_eq!(json["accepted"], false);
    assert!(json["hint"].is_null());
    assert_eq!(json["hints_remaining"], 0);
    assert_eq!(json["game"]["revealed_hints"].as_array().unwrap().len(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_full_game_credits_wallet() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    let base = format!("/api/v1/games/{}", id);

    send(&app, "POST", &format!("{}/start", base), Some(WALLET), None).await;

    // Question 1: correct with the clock untouched
    send(&app, "POST", &format!("{}/answer", base), None, Some(json!({ "label": "B" }))).await;
    let (_, json) = send(&app, "POST", &format!("{}/submit", base), None, None).await;
    assert_eq!(json["accepted"], true);
    assert_eq!(json["outcome"]["points_earned"], 200);
    assert_eq!(json["outcome"]["reason"], "correct");
    assert_eq!(json["game"]["question"]["correct_answer"], "B");

    // A second submit for the same question is ignored
    let (_, json) = send(&app, "POST", &format!("{}/submit", base), None, None).await;
    assert_eq!(json["accepted"], false);
    assert_eq!(json["game"]["score"], 200);

    sleep(Duration::from_millis(3_100)).await;
    let (_, json) = send(&app, "GET", &base, None, None).await;
    assert_eq!(json["current_index"], 1);
    assert_eq!(json["time_left"], 30);

    // Question 2: correct after one hint and ten seconds
    send(&app, "POST", &format!("{}/hints", base), None, None).await;
    sleep(Duration::from_millis(10_500)).await;
    send(&app, "POST", &format!("{}/answer", base), None, Some(json!({ "label": "B" }))).await;
    let (_, json) = send(&app, "POST", &format!("{}/submit", base), None, None).await;
    // 150 + floor(20/30*100) - 10
    assert_eq!(json["outcome"]["points_earned"], 206);

    sleep(Duration::from_millis(3_100)).await;
    let (_, json) = send(&app, "GET", &base, None, None).await;
    assert_eq!(json["state"], "finished");
    assert_eq!(json["stats"]["total_points"], 406);
    assert_eq!(json["stats"]["correct_answers"], 2);
    assert_eq!(json["stats"]["accuracy"], 100.0);

    let (status, json) = send(&app, "GET", &format!("/api/v1/accounts/{}", WALLET), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["points"], 406);
    assert_eq!(json["games_played"], 1);
    assert_eq!(json["level"], 1);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_locks_question_and_advances() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    let base = format!("/api/v1/games/{}", id);
    send(&app, "POST", &format!("{}/start", base), Some(WALLET), None).await;

    sleep(Duration::from_millis(60_500)).await;
    let (_, json) = send(&app, "GET", &base, None, None).await;
    assert_eq!(json["time_left"], 0);
    assert_eq!(json["is_submitted"], true);
    assert_eq!(json["score"], 0);
    assert_eq!(json["last_outcome"]["reason"], "timeout");

    sleep(Duration::from_secs(2)).await;
    let (_, json) = send(&app, "GET", &base, None, None).await;
    assert_eq!(json["current_index"], 1);
    assert_eq!(json["is_submitted"], false);
}

#[tokio::test(start_paused = true)]
async fn test_pause_and_resume() {
    let (app, _) = create_test_app();
    let id = create_game(&app).await;
    let base = format!("/api/v1/games/{}", id);

    let (_, json) = send(&app, "POST", &format!("{}/pause", base), None, None).await;
    assert_eq!(json["accepted"], false);

    send(&app, "POST", &format!("{}/start", base), Some(WALLET), None).await;
    sleep(Duration::from_millis(5_500)).await;

    let (_, json) = send(&app, "POST", &format!("{}/pause", base), None, None).await;
    assert_eq!(json["accepted"], true);
    assert_eq!(json["game"]["state"], "paused");

    sleep(Duration::from_secs(20)).await;
    let (_, json) = send(&app, "POST", &format!("{}/answer", base), None, Some(json!({ "label": "B" }))).await;
    assert_eq!(json["accepted"], false);

    let (_, json) = send(&app, "POST", &format!("{}/resume", base), None, None).await;
    assert_eq!(json["accepted"], true);
    assert_eq!(json["game"]["time_left"], 55);
}

#[tokio::test]
async fn test_reset_and_delete() {
    let (app, state) = create_test_app();
    let id = create_game(&app).await;
    let base = format!("/api/v1/games/{}", id);
    send(&app, "POST", &format!("{}/start", base), Some(WALLET), None).await;

    let (_, json) = send(&app, "POST", &format!("{}/reset", base), None, None).await;
    assert_eq!(json["accepted"], true);
    assert_eq!(json["game"]["state"], "waiting");
    assert_eq!(json["game"]["total_questions"], 0);

    let (status, _) = send(&app, "DELETE", &base, None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(state.games.read().await.is_empty());

    let (status, _) = send(&app, "GET", &base, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
