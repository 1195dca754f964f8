pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommend::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Static option data
        .route("/api/v1/options/genres", get(handlers::handle_list_genres))
        .route("/api/v1/options/levels", get(handlers::handle_list_levels))
        .route(
            "/api/v1/options/moods/:genre",
            get(handlers::handle_list_moods),
        )
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        .route(
            "/api/v1/sessions/:id/genre",
            post(handlers::handle_set_genre),
        )
        .route("/api/v1/sessions/:id/mood", post(handlers::handle_set_mood))
        .route(
            "/api/v1/sessions/:id/level",
            post(handlers::handle_set_level),
        )
        .route(
            "/api/v1/sessions/:id/recommendations",
            post(handlers::handle_fetch_recommendations),
        )
        .with_state(state)
}
