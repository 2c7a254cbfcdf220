use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use std::sync::Arc;

use crate::services::AppState;

/// GET /api/v1/alerts - most recent whale alerts, newest first
pub async fn list_alerts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.alerts.render(Utc::now()))
}
