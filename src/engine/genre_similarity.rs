use std::collections::HashMap;

use super::{cosine_similarity, Catalog};
use crate::{
    error::{AppError, AppResult},
    models::MovieId,
};

/// Movie x movie cosine similarity over genre indicator vectors.
///
/// Rows and columns follow the catalog's load order. Genre tokens are
/// compared case-insensitively, so `Sci-Fi` and `sci-fi` share a dimension.
#[derive(Debug, Clone)]
pub struct GenreSimilarityModel {
    movie_ids: Vec<MovieId>,
    index: HashMap<MovieId, usize>,
    vocabulary: Vec<String>,
    matrix: Vec<Vec<f64>>,
}

impl GenreSimilarityModel {
    pub fn build(catalog: &Catalog) -> Self {
        let mut vocabulary: Vec<String> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for movie in catalog.movies() {
            for token in movie.genres.tokens() {
                let token = token.to_lowercase();
                if !positions.contains_key(&token) {
                    positions.insert(token.clone(), vocabulary.len());
                    vocabulary.push(token);
                }
            }
        }

        let vectors: Vec<Vec<f64>> = catalog
            .movies()
            .iter()
            .map(|movie| {
                let mut vector = vec![0.0; vocabulary.len()];
                for token in movie.genres.tokens() {
                    vector[positions[&token.to_lowercase()]] += 1.0;
                }
                vector
            })
            .collect();

        let n = vectors.len();
        let mut matrix = vec![vec![0.0; n]; n];
        for i in 0..n {
            matrix[i][i] = 1.0;
            for j in (i + 1)..n {
                let score = cosine_similarity(&vectors[i], &vectors[j]);
                matrix[i][j] = score;
                matrix[j][i] = score;
            }
        }

        let movie_ids: Vec<MovieId> = catalog.movies().iter().map(|m| m.movie_id).collect();
        let index = movie_ids
            .iter()
            .enumerate()
            .map(|(idx, &id)| (id, idx))
            .collect();

        tracing::debug!(
            movies = n,
            genres = vocabulary.len(),
            "Built genre similarity matrix"
        );

        Self {
            movie_ids,
            index,
            vocabulary,
            matrix,
        }
    }

    pub fn similarity(&self, movie_a: MovieId, movie_b: MovieId) -> AppResult<f64> {
        let a = self.position(movie_a)?;
        let b = self.position(movie_b)?;
        Ok(self.matrix[a][b])
    }

    /// The `k` movies most similar to `movie_id`, excluding itself.
    ///
    /// Sorted by score descending; equal scores keep catalog order.
    pub fn most_similar(&self, movie_id: MovieId, k: usize) -> AppResult<Vec<(MovieId, f64)>> {
        let row = self.position(movie_id)?;

        let mut scored: Vec<(usize, f64)> = self.matrix[row]
            .iter()
            .copied()
            .enumerate()
            .filter(|&(idx, _)| idx != row)
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored.truncate(k);

        Ok(scored
            .into_iter()
            .map(|(idx, score)| (self.movie_ids[idx], score))
            .collect())
    }

    /// Distinct lower-cased genre tokens in first-seen order
    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    pub fn len(&self) -> usize {
        self.movie_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movie_ids.is_empty()
    }

    fn position(&self, movie_id: MovieId) -> AppResult<usize> {
        self.index
            .get(&movie_id)
            .copied()
            .ok_or_else(|| AppError::NotFound(format!("movie {}", movie_id)))
    }
}
