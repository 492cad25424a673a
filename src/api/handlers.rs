use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    models::{Movie, MovieId, Recommendation, SimilarMovie, UserId, UserRatingEntry},
};

use super::AppState;

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct CountQuery {
    pub n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct RateMovieRequest {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: i64,
}

#[derive(Debug, Serialize)]
pub struct ReloadResponse {
    pub movies: usize,
    pub users: usize,
    pub ratings: usize,
    pub built_at: chrono::DateTime<chrono::Utc>,
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Get the whole catalog
pub async fn list_movies(State(state): State<AppState>) -> Json<Vec<Movie>> {
    Json(state.engine.list_movies())
}

/// Get a single movie
pub async fn get_movie(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
) -> AppResult<Json<Movie>> {
    Ok(Json(state.engine.get_movie_info(movie_id)?))
}

/// Get all users with ratings
pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserId>> {
    Json(state.engine.list_users())
}

/// Get a user's ratings
pub async fn get_user_ratings(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
) -> AppResult<Json<Vec<UserRatingEntry>>> {
    Ok(Json(state.engine.get_user_ratings(user_id)?))
}

/// Store a rating and rebuild the models
pub async fn rate_movie(
    State(state): State<AppState>,
    Json(request): Json<RateMovieRequest>,
) -> AppResult<Json<Value>> {
    tracing::info!(
        user_id = request.user_id,
        movie_id = request.movie_id,
        rating = request.rating,
        "Processing rating"
    );

    state
        .engine
        .submit_rating(request.user_id, request.movie_id, request.rating)
        .await?;

    Ok(Json(json!({ "success": true, "message": "Rating saved" })))
}

/// Re-read the data source and rebuild the models
pub async fn reload(State(state): State<AppState>) -> AppResult<Json<ReloadResponse>> {
    let snapshot = state.engine.reload().await?;

    Ok(Json(ReloadResponse {
        movies: snapshot.catalog().len(),
        users: snapshot.user_matrix().users().len(),
        ratings: snapshot.ratings().len(),
        built_at: snapshot.built_at(),
    }))
}

/// Collaborative filtering recommendations for a user
pub async fn collaborative(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let n = state.count(query.n);
    tracing::info!(user_id, n, "Collaborative recommendation request");

    let recommendations = or_empty(state.engine.collaborative_filtering(user_id, n))?;
    Ok(Json(recommendations))
}

/// Movies similar to a given movie by genre
pub async fn content(
    State(state): State<AppState>,
    Path(movie_id): Path<MovieId>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<SimilarMovie>>> {
    let n = state.count(query.n);
    tracing::info!(movie_id, n, "Content-based recommendation request");

    Ok(Json(state.engine.content_based_filtering(movie_id, n)?))
}

/// Hybrid recommendations for a user
pub async fn hybrid(
    State(state): State<AppState>,
    Path(user_id): Path<UserId>,
    Query(query): Query<CountQuery>,
) -> AppResult<Json<Vec<Recommendation>>> {
    let n = state.count(query.n);
    tracing::info!(user_id, n, "Hybrid recommendation request");

    let recommendations = or_empty(state.engine.hybrid_recommendation(user_id, n))?;
    Ok(Json(recommendations))
}

/// No viable candidates is reported as an empty list rather than an error status
fn or_empty(result: AppResult<Vec<Recommendation>>) -> AppResult<Vec<Recommendation>> {
    match result {
        Err(AppError::NoRecommendations(user_id)) => {
            tracing::info!(user_id, "No recommendations available");
            Ok(Vec::new())
        }
        other => other,
    }
}
