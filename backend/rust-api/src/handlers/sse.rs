use axum::{
    extract::{Path, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
};
use futures::stream::{self, Stream, StreamExt};
use std::convert::Infallible;
use std::sync::Arc;
use tokio::sync::broadcast::{error::RecvError, Receiver};
use uuid::Uuid;

use super::ApiError;
use crate::{
    metrics::SSE_CONNECTIONS_ACTIVE,
    models::{session::GameSnapshot, timer::GameEvent},
    services::AppState,
};

/// Keeps the connection gauge accurate however the stream ends.
struct ConnectionGuard;

impl ConnectionGuard {
    fn open() -> Self {
        SSE_CONNECTIONS_ACTIVE.inc();
        ConnectionGuard
    }
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        SSE_CONNECTIONS_ACTIVE.dec();
    }
}

/// SSE endpoint for game events
/// GET /api/v1/games/{id}/stream
pub async fn game_stream(
    State(state): State<Arc<AppState>>,
    Path(game_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = Uuid::parse_str(&game_id)
        .map_err(|_| ApiError::bad_request(format!("Invalid game id: {}", game_id)))?;
    let game = state
        .game(id)
        .await
        .ok_or_else(|| ApiError::not_found("Game not found"))?;

    tracing::info!("Client connected to SSE stream: game={}", id);

    let receiver = game.subscribe();
    let snapshot = game.snapshot().await;
    let stream = stream::once(async move { Ok::<_, Infallible>(snapshot_event(&snapshot)) })
        .chain(create_event_stream(id, receiver));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}

fn snapshot_event(snapshot: &GameSnapshot) -> Event {
    let data = serde_json::to_string(snapshot).unwrap_or_else(|_| "{}".to_string());
    Event::default().event("snapshot").data(data)
}

fn create_event_stream(
    game_id: Uuid,
    receiver: Receiver<GameEvent>,
) -> impl Stream<Item = Result<Event, Infallible>> {
    stream::unfold(
        (receiver, ConnectionGuard::open()),
        move |(mut receiver, guard)| async move {
            loop {
                match receiver.recv().await {
                    Ok(game_event) => {
                        let event = Event::default()
                            .event(game_event.event_name())
                            .data(game_event.to_sse_data());
                        return Some((Ok(event), (receiver, guard)));
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!("SSE client lagging: game={}, skipped={}", game_id, skipped);
                    }
                    Err(RecvError::Closed) => {
                        tracing::info!("Game closed, ending SSE stream: game={}", game_id);
                        return None;
                    }
                }
            }
        },
    )
}
