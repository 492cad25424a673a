use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::cosine_similarity;
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, Rating, UserId},
};

/// Dense user x movie rating matrix with unrated cells read as zero.
///
/// Rows are the users present in the ratings and columns the movies that
/// were rated at least once, both in ascending id order. Treating an
/// unrated cell as zero means "unrated" and "disliked" look alike to the
/// similarity measure.
#[derive(Debug, Clone, PartialEq)]
pub struct UserRatingMatrix {
    users: Vec<UserId>,
    movies: Vec<MovieId>,
    user_index: HashMap<UserId, usize>,
    movie_index: HashMap<MovieId, usize>,
    cells: Vec<Vec<f64>>,
}

impl UserRatingMatrix {
    pub fn from_ratings(ratings: &[Rating]) -> Self {
        let users: Vec<UserId> = ratings
            .iter()
            .map(|r| r.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let movies: Vec<MovieId> = ratings
            .iter()
            .map(|r| r.movie_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index: HashMap<UserId, usize> =
            users.iter().enumerate().map(|(i, &id)| (id, i)).collect();
        let movie_index: HashMap<MovieId, usize> =
            movies.iter().enumerate().map(|(i, &id)| (id, i)).collect();

        let mut cells = vec![vec![0.0; movies.len()]; users.len()];
        for rating in ratings {
            cells[user_index[&rating.user_id]][movie_index[&rating.movie_id]] =
                f64::from(rating.rating);
        }

        Self {
            users,
            movies,
            user_index,
            movie_index,
            cells,
        }
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn movies(&self) -> &[MovieId] {
        &self.movies
    }

    pub fn contains_user(&self, user_id: UserId) -> bool {
        self.user_index.contains_key(&user_id)
    }

    /// Cell value; zero when the pair is unrated or either id is unknown
    pub fn rating(&self, user_id: UserId, movie_id: MovieId) -> f64 {
        match (self.user_index.get(&user_id), self.movie_index.get(&movie_id)) {
            (Some(&u), Some(&m)) => self.cells[u][m],
            _ => 0.0,
        }
    }

    /// The user's non-zero cells
    pub fn ratings_for(&self, user_id: UserId) -> AppResult<BTreeMap<MovieId, u8>> {
        let row = self.row(user_id)?;
        Ok(self
            .movies
            .iter()
            .zip(row)
            .filter(|(_, &value)| value > 0.0)
            .map(|(&movie_id, &value)| (movie_id, value as u8))
            .collect())
    }

    /// Movies (columns) the user has not rated
    pub fn unrated_movies(&self, user_id: UserId) -> AppResult<Vec<MovieId>> {
        let row = self.row(user_id)?;
        Ok(self
            .movies
            .iter()
            .zip(row)
            .filter(|(_, &value)| value == 0.0)
            .map(|(&movie_id, _)| movie_id)
            .collect())
    }

    /// Cosine similarity of the two users' zero-filled rows
    pub fn user_similarity(&self, user_a: UserId, user_b: UserId) -> AppResult<f64> {
        Ok(cosine_similarity(self.row(user_a)?, self.row(user_b)?))
    }

    /// The `k` other users most similar to `user_id`.
    ///
    /// Sorted by similarity descending; equal scores keep ascending user id.
    pub fn neighbours(&self, user_id: UserId, k: usize) -> AppResult<Vec<(UserId, f64)>> {
        let row = self.row(user_id)?;

        let mut scored: Vec<(UserId, f64)> = self
            .users
            .iter()
            .zip(&self.cells)
            .filter(|(&other, _)| other != user_id)
            .map(|(&other, other_row)| (other, cosine_similarity(row, other_row)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        Ok(scored)
    }

    fn row(&self, user_id: UserId) -> AppResult<&[f64]> {
        self.user_index
            .get(&user_id)
            .map(|&idx| self.cells[idx].as_slice())
            .ok_or_else(|| AppError::NotFound(format!("user {}", user_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rating(user_id: UserId, movie_id: MovieId, value: u8) -> Rating {
        Rating {
            user_id,
            movie_id,
            rating: value,
        }
    }

    fn matrix() -> UserRatingMatrix {
        UserRatingMatrix::from_ratings(&[
            rating(1, 1, 5),
            rating(1, 2, 4),
            rating(2, 1, 5),
            rating(2, 2, 5),
            rating(2, 3, 1),
            rating(3, 4, 2),
        ])
    }

    #[test]
    fn test_columns_only_cover_rated_movies() {
        let matrix = matrix();
        assert_eq!(matrix.users(), &[1, 2, 3]);
        assert_eq!(matrix.movies(), &[1, 2, 3, 4]);
        assert_eq!(matrix.rating(1, 3), 0.0);
        assert_eq!(matrix.rating(2, 3), 1.0);
    }

    #[test]
    fn test_ratings_for_user() {
        let matrix = matrix();
        let ratings = matrix.ratings_for(1).unwrap();
        assert_eq!(ratings.len(), 2);
        assert_eq!(ratings[&1], 5);
        assert_eq!(ratings[&2], 4);
    }

    #[test]
    fn test_unknown_user() {
        let matrix = matrix();
        assert!(matches!(matrix.ratings_for(9), Err(AppError::NotFound(_))));
        assert!(matches!(matrix.user_similarity(1, 9), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_unrated_movies() {
        let matrix = matrix();
        assert_eq!(matrix.unrated_movies(1).unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_user_similarity() {
        let matrix = matrix();
        let expected = (25.0 + 20.0) / ((41f64).sqrt() * (51f64).sqrt());
        assert!((matrix.user_similarity(1, 2).unwrap() - expected).abs() < 1e-12);
        assert_eq!(matrix.user_similarity(1, 3).unwrap(), 0.0);
        assert_eq!(
            matrix.user_similarity(1, 2).unwrap(),
            matrix.user_similarity(2, 1).unwrap()
        );
    }

    #[test]
    fn test_neighbours_exclude_self() {
        let matrix = matrix();
        let neighbours = matrix.neighbours(1, 3).unwrap();
        let ids: Vec<UserId> = neighbours.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![2, 3]);
    }
}
