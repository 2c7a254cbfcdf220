use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

use crate::models::session::GameState;

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]
    )
    .unwrap();

    // Game Metrics
    pub static ref GAMES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "games_total",
        "Total number of game lifecycle transitions",
        &["status"]
    )
    .unwrap();

    pub static ref GAMES_ACTIVE: IntGauge = register_int_gauge!(
        "games_active",
        "Number of games currently playing or paused"
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Total number of answers submitted",
        &["correct"]
    )
    .unwrap();

    pub static ref ANSWERS_TIMED_OUT_TOTAL: IntCounter = register_int_counter!(
        "answers_timed_out_total",
        "Total number of questions that ran out of time"
    )
    .unwrap();

    pub static ref HINTS_REQUESTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "hints_requested_total",
        "Total number of hints requested",
        &["hint_level"]
    )
    .unwrap();

    pub static ref POINTS_AWARDED_TOTAL: IntCounter = register_int_counter!(
        "points_awarded_total",
        "Total points reported to hosts by finished games"
    )
    .unwrap();

    pub static ref SSE_CONNECTIONS_ACTIVE: IntGauge = register_int_gauge!(
        "sse_connections_active",
        "Number of active SSE connections"
    )
    .unwrap();

    // Whale alert feed
    pub static ref WHALE_ALERTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "whale_alerts_total",
        "Total number of whale alerts produced",
        &["severity"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

fn is_active(state: GameState) -> bool {
    matches!(state, GameState::Playing | GameState::Paused)
}

/// Helper: record a game moving from `before` to `after`
pub fn track_game_transition(before: GameState, after: GameState) {
    if before == after {
        return;
    }

    let status = match after {
        GameState::Playing if before == GameState::Paused => "resumed",
        GameState::Playing => "started",
        GameState::Paused => "paused",
        GameState::Finished => "finished",
        GameState::Waiting => "reset",
    };
    GAMES_TOTAL.with_label_values(&[status]).inc();

    match (is_active(before), is_active(after)) {
        (false, true) => GAMES_ACTIVE.inc(),
        (true, false) => GAMES_ACTIVE.dec(),
        _ => {}
    }
}
