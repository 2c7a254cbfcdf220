use axum::{
    http::{header, HeaderName, Method},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The game UI is served from another origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(middlewares::wallet::WALLET_HEADER),
        ])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        // Metrics endpoint with Basic Auth protection
        .route(
            "/metrics",
            get(handlers::metrics_handler).layer(middleware::from_fn_with_state(
                app_state.clone(),
                handlers::metrics_auth_middleware,
            )),
        )
        .nest(
            "/api/v1/games",
            games_routes().layer(middleware::from_fn(
                middlewares::wallet::wallet_middleware,
            )),
        )
        .route("/api/v1/alerts", get(handlers::alerts::list_alerts))
        .route(
            "/api/v1/accounts/{address}",
            get(handlers::accounts::get_account),
        )
        .with_state(app_state)
        .layer(cors)
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(middleware::from_fn(
            middlewares::trace::trace_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn games_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(handlers::games::create_game))
        .route(
            "/{id}",
            get(handlers::games::get_game).delete(handlers::games::delete_game),
        )
        .route("/{id}/start", post(handlers::games::start_game))
        .route("/{id}/answer", post(handlers::games::select_answer))
        .route("/{id}/submit", post(handlers::games::submit_answer))
        .route("/{id}/hints", post(handlers::games::request_hint))
        .route("/{id}/pause", post(handlers::games::pause_game))
        .route("/{id}/resume", post(handlers::games::resume_game))
        .route("/{id}/reset", post(handlers::games::reset_game))
        .route("/{id}/stream", get(handlers::sse::game_stream))
}
