use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::ApiError;
use crate::{
    extractors::AppJson,
    models::{
        answer::{CommandResponse, SelectAnswerRequest, SubmitAnswerResponse},
        hint::RequestHintResponse,
        CreateGameResponse,
    },
    services::{
        game_runtime::GameRuntime,
        identity::{IdentityProvider, WalletIdentity},
        scoring::HINT_PENALTY,
        AppState,
    },
};

async fn find_game(state: &AppState, game_id: &str) -> Result<Arc<GameRuntime>, ApiError> {
    let id = Uuid::parse_str(game_id)
        .map_err(|_| ApiError::bad_request(format!("Invalid game id: {}", game_id)))?;
    state
        .game(id)
        .await
        .ok_or_else(|| ApiError::not_found("Game not found"))
}

async fn command(game: &GameRuntime, accepted: bool) -> Json<CommandResponse> {
    Json(CommandResponse {
        accepted,
        game: game.snapshot().await,
    })
}

/// POST /api/v1/games
pub async fn create_game(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let game = state.create_game().await;
    tracing::info!("Created game {}", game.id());

    (
        StatusCode::CREATED,
        Json(CreateGameResponse {
            game_id: game.id(),
            game: game.snapshot().await,
        }),
    )
}

/// GET /api/v1/games/{id}
pub async fn get_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    Ok(Json(game.snapshot().await))
}

/// DELETE /api/v1/games/{id}
pub async fn delete_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    // Timers are aborted once the last handle to the runtime is gone
    game.reset().await;
    state.remove_game(game.id()).await;
    tracing::info!("Deleted game {}", game.id());
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/games/{id}/start
pub async fn start_game(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<WalletIdentity>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    let reporter = state
        .ledger
        .reporter_for(identity.address().unwrap_or_default());

    let accepted = game.start_game(&identity, reporter).await.map_err(|e| {
        tracing::error!("Failed to start game {}: {}", game.id(), e);
        ApiError::Unprocessable(e.to_string())
    })?;

    Ok(command(&game, accepted).await)
}

/// POST /api/v1/games/{id}/answer
pub async fn select_answer(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
    AppJson(req): AppJson<SelectAnswerRequest>,
) -> Result<impl IntoResponse, ApiError> {
    req.validate()
        .map_err(|e| ApiError::bad_request(format!("Validation error: {}", e)))?;

    let game = find_game(&state, &game_id).await?;
    let accepted = game.select_answer(&req.label).await;
    Ok(command(&game, accepted).await)
}

/// POST /api/v1/games/{id}/submit
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    let outcome = game.submit_answer().await;

    Ok(Json(SubmitAnswerResponse {
        accepted: outcome.is_some(),
        outcome,
        game: game.snapshot().await,
    }))
}

/// POST /api/v1/games/{id}/hints
pub async fn request_hint(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    let hint = game.request_hint().await;
    let snapshot = game.snapshot().await;

    Ok(Json(RequestHintResponse {
        accepted: hint.is_some(),
        hint,
        hints_used: snapshot.hints_used,
        hints_remaining: snapshot.hints_remaining,
        cost: HINT_PENALTY,
        game: snapshot,
    }))
}

/// POST /api/v1/games/{id}/pause
pub async fn pause_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    let accepted = game.pause().await;
    Ok(command(&game, accepted).await)
}

/// POST /api/v1/games/{id}/resume
pub async fn resume_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    let accepted = game.resume().await;
    Ok(command(&game, accepted).await)
}

/// POST /api/v1/games/{id}/reset
pub async fn reset_game(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let game = find_game(&state, &game_id).await?;
    let accepted = game.reset().await;
    Ok(command(&game, accepted).await)
}
