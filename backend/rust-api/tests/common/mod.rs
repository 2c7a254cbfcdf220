#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;
use whale_trivia_api::{
    config::{AlertConfig, Config, GameConfig},
    create_router,
    models::{AnswerOption, Difficulty, Question},
    services::{question_bank::StaticQuestionBank, AppState},
};

pub const WALLET: &str = "0x00000000000000000000000000000000000000aa";
pub const METRICS_AUTH: &str = "metrics:secret";

pub fn test_config() -> Config {
    Config {
        bind_addr: "127.0.0.1:0".to_string(),
        game: GameConfig::default(),
        questions_path: None,
        alerts: AlertConfig::default(),
        metrics_auth: METRICS_AUTH.to_string(),
    }
}

pub fn question(id: u32, points: u32, time_limit: u32) -> Question {
    Question {
        id,
        question: format!("Which whale moved first in round {}?", id),
        options: vec![
            AnswerOption::new("A", "Vitalik.eth"),
            AnswerOption::new("B", "Punk6529"),
            AnswerOption::new("C", "WhaleShark"),
        ],
        correct_answer: "B".to_string(),
        difficulty: Difficulty::Easy,
        category: "whales".to_string(),
        points,
        time_limit,
        hint1: "Not the founder".to_string(),
        hint2: "Collects punks".to_string(),
        hint3: "Number in the name".to_string(),
    }
}

pub fn create_test_app_with(questions: Vec<Question>) -> (Router, Arc<AppState>) {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let state = Arc::new(AppState::with_bank(
        test_config(),
        Arc::new(StaticQuestionBank::new(questions)),
    ));
    (create_router(state.clone()), state)
}

/// Two questions: 100 points / 60s, then 150 points / 30s.
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(vec![question(1, 100, 60), question(2, 150, 30)])
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    wallet: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(wallet) = wallet {
        builder = builder.header("x-wallet-address", wallet);
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, json)
}

/// Creates a game and returns its id.
pub async fn create_game(app: &Router) -> String {
    let (status, json) = send(app, "POST", "/api/v1/games", None, None).await;
    assert_eq!(status, StatusCode::CREATED);
    json["game_id"].as_str().unwrap().to_string()
}
