use std::collections::{BTreeSet, HashMap};

use crate::models::{MovieId, Rating, UserId};

/// The current set of ratings, at most one per (user, movie) pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RatingStore {
    ratings: Vec<Rating>,
    positions: HashMap<(UserId, MovieId), usize>,
}

impl RatingStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from raw rows; a later row for the same pair wins
    pub fn from_rows(rows: Vec<Rating>) -> Self {
        let mut store = Self::new();
        store.reload(rows);
        store
    }

    /// Replaces every rating with `rows`
    pub fn reload(&mut self, rows: Vec<Rating>) {
        self.ratings.clear();
        self.positions.clear();
        for rating in rows {
            self.upsert(rating);
        }
    }

    /// Inserts a rating, overwriting the value of an existing pair in place.
    ///
    /// Returns `true` when an existing rating was replaced.
    pub fn upsert(&mut self, rating: Rating) -> bool {
        let key = (rating.user_id, rating.movie_id);
        match self.positions.get(&key) {
            Some(&idx) => {
                self.ratings[idx].rating = rating.rating;
                true
            }
            None => {
                self.positions.insert(key, self.ratings.len());
                self.ratings.push(rating);
                false
            }
        }
    }

    pub fn get(&self, user_id: UserId, movie_id: MovieId) -> Option<u8> {
        self.positions
            .get(&(user_id, movie_id))
            .map(|&idx| self.ratings[idx].rating)
    }

    /// Ratings in load order
    pub fn all(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn for_user(&self, user_id: UserId) -> impl Iterator<Item = &Rating> {
        self.ratings.iter().filter(move |r| r.user_id == user_id)
    }

    /// Distinct users with at least one rating, ascending
    pub fn users(&self) -> Vec<UserId> {
        self.ratings
            .iter()
            .map(|r| r.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }
}
