use serde::Serialize;

use super::{Genres, Movie, MovieId};

/// A scored recommendation returned by the collaborative and hybrid queries
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Genres,
    /// Rounded to two decimal places
    pub score: f64,
}

impl Recommendation {
    pub fn new(movie: &Movie, score: f64) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
            score: round_score(score),
        }
    }
}

/// A content-based neighbour of a movie
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SimilarMovie {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Genres,
}

impl From<&Movie> for SimilarMovie {
    fn from(movie: &Movie) -> Self {
        Self {
            movie_id: movie.movie_id,
            title: movie.title.clone(),
            genres: movie.genres.clone(),
        }
    }
}

/// One of a user's ratings, joined with the catalog
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserRatingEntry {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Genres,
    pub rating: u8,
}

pub(crate) fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
