use tokio::sync::RwLock;

use super::DataSource;
use crate::{
    error::AppResult,
    models::{MovieRow, Rating},
};

/// Keeps both tables in memory
#[derive(Default)]
pub struct InMemoryDataSource {
    movies: RwLock<Vec<MovieRow>>,
    ratings: RwLock<Vec<Rating>>,
}

impl InMemoryDataSource {
    pub fn new(movies: Vec<MovieRow>, ratings: Vec<Rating>) -> Self {
        Self {
            movies: RwLock::new(movies),
            ratings: RwLock::new(ratings),
        }
    }

    /// Replaces the catalog; takes effect on the engine's next reload
    pub async fn replace_catalog(&self, movies: Vec<MovieRow>) {
        *self.movies.write().await = movies;
    }
}

#[async_trait::async_trait]
impl DataSource for InMemoryDataSource {
    async fn load_catalog(&self) -> AppResult<Vec<MovieRow>> {
        Ok(self.movies.read().await.clone())
    }

    async fn load_ratings(&self) -> AppResult<Vec<Rating>> {
        Ok(self.ratings.read().await.clone())
    }

    async fn upsert_rating(&self, rating: Rating) -> AppResult<()> {
        let mut ratings = self.ratings.write().await;
        match ratings.iter_mut().find(|r| r.same_pair(&rating)) {
            Some(existing) => existing.rating = rating.rating,
            None => ratings.push(rating),
        }
        Ok(())
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
