use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Catalog identifier of a movie
pub type MovieId = i64;

/// Ordered genre tokens of a movie, parsed once from the pipe-delimited form
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct Genres(Vec<String>);

impl Genres {
    pub const SEPARATOR: char = '|';

    /// Splits a raw `Action|Drama` field into tokens.
    ///
    /// Surrounding whitespace is trimmed and empty tokens are dropped.
    /// Returns `None` when nothing is left.
    pub fn parse(raw: &str) -> Option<Self> {
        let tokens: Vec<String> = raw
            .split(Self::SEPARATOR)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect();

        if tokens.is_empty() {
            None
        } else {
            Some(Self(tokens))
        }
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    /// Number of distinct tokens present in both genre lists.
    ///
    /// Tokens compare exactly, so `Action` and `action` do not match here
    /// even though the genre similarity model folds case.
    pub fn shared_with(&self, other: &Genres) -> usize {
        let mut seen: Vec<&String> = Vec::with_capacity(self.0.len());
        for token in &self.0 {
            if other.0.contains(token) && !seen.contains(&token) {
                seen.push(token);
            }
        }
        seen.len()
    }
}

impl Display for Genres {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.join("|"))
    }
}

impl From<Genres> for String {
    fn from(genres: Genres) -> Self {
        genres.to_string()
    }
}

/// A catalog entry
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Movie {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: Genres,
}

/// Raw catalog row as supplied by a data source
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRow {
    pub movie_id: MovieId,
    pub title: String,
    pub genres: String,
}

impl MovieRow {
    pub fn new(movie_id: MovieId, title: &str, genres: &str) -> Self {
        Self {
            movie_id,
            title: title.to_string(),
            genres: genres.to_string(),
        }
    }
}
