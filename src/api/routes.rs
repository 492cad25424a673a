use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .with_state(state)
}

/// Routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog
        .route("/movies", get(handlers::list_movies))
        .route("/movies/:movie_id", get(handlers::get_movie))
        // Users and ratings
        .route("/users", get(handlers::list_users))
        .route("/users/:user_id/ratings", get(handlers::get_user_ratings))
        .route("/ratings", post(handlers::rate_movie))
        .route("/reload", post(handlers::reload))
        // Recommendations
        .route(
            "/recommend/collaborative/:user_id",
            get(handlers::collaborative),
        )
        .route("/recommend/content/:movie_id", get(handlers::content))
        .route("/recommend/hybrid/:user_id", get(handlers::hybrid))
}
