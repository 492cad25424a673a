use serde::{Deserialize, Serialize};

use super::MovieId;
use crate::error::{AppError, AppResult};

/// Identifier of a rating user
pub type UserId = i64;

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// A single (user, movie, rating) observation
///
/// Deserialized rows go through [`Rating::new`], so stored values outside
/// 1..=5 are rejected at load time.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "RatingRow")]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: u8,
}

/// Unvalidated rating row as stored
#[derive(Debug, Deserialize)]
struct RatingRow {
    user_id: UserId,
    movie_id: MovieId,
    rating: i64,
}

impl TryFrom<RatingRow> for Rating {
    type Error = AppError;

    fn try_from(row: RatingRow) -> AppResult<Self> {
        Rating::new(row.user_id, row.movie_id, row.rating).map_err(|_| {
            AppError::InvalidInput(format!(
                "user {} movie {}: rating {} outside {}..={}",
                row.user_id, row.movie_id, row.rating, MIN_RATING, MAX_RATING
            ))
        })
    }
}

impl Rating {
    /// Builds a rating submitted by a caller, rejecting values outside 1..=5
    pub fn new(user_id: UserId, movie_id: MovieId, rating: i64) -> AppResult<Self> {
        if rating < MIN_RATING as i64 || rating > MAX_RATING as i64 {
            return Err(AppError::InvalidInput(format!(
                "Rating must be between {} and {}, got {}",
                MIN_RATING, MAX_RATING, rating
            )));
        }

        Ok(Self {
            user_id,
            movie_id,
            rating: rating as u8,
        })
    }

    /// Whether this row is for the same (user, movie) pair
    pub fn same_pair(&self, other: &Rating) -> bool {
        self.user_id == other.user_id && self.movie_id == other.movie_id
    }
}
