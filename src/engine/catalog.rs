use std::collections::HashMap;

use crate::{
    error::{AppError, AppResult},
    models::{Genres, Movie, MovieId, MovieRow},
};

/// Movies of one load cycle, kept in load order
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    movies: Vec<Movie>,
    index: HashMap<MovieId, usize>,
}

impl Catalog {
    /// Parses raw rows into a catalog.
    ///
    /// Fails with `InvalidCatalog` on a duplicated `movie_id` or a movie
    /// whose genre field holds no tokens.
    pub fn load(rows: Vec<MovieRow>) -> AppResult<Self> {
        let mut movies = Vec::with_capacity(rows.len());
        let mut index = HashMap::with_capacity(rows.len());

        for row in rows {
            let genres = Genres::parse(&row.genres).ok_or_else(|| {
                AppError::InvalidCatalog(format!("movie {} has no genres", row.movie_id))
            })?;

            if index.insert(row.movie_id, movies.len()).is_some() {
                return Err(AppError::InvalidCatalog(format!(
                    "duplicate movie_id {}",
                    row.movie_id
                )));
            }

            movies.push(Movie {
                movie_id: row.movie_id,
                title: row.title,
                genres,
            });
        }

        Ok(Self { movies, index })
    }

    pub fn get(&self, movie_id: MovieId) -> AppResult<&Movie> {
        self.find(movie_id)
            .ok_or_else(|| AppError::NotFound(format!("movie {}", movie_id)))
    }

    pub fn find(&self, movie_id: MovieId) -> Option<&Movie> {
        self.index.get(&movie_id).map(|&idx| &self.movies[idx])
    }

    /// Load-order position of a movie, which is also its row in the genre matrix
    pub fn index_of(&self, movie_id: MovieId) -> AppResult<usize> {
        self.index
            .get(&movie_id)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("movie {}", movie_id)))
    }

    pub fn contains(&self, movie_id: MovieId) -> bool {
        self.index.contains_key(&movie_id)
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}
