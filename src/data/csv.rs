use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::Mutex;

use super::DataSource;
use crate::{
    error::{AppError, AppResult},
    models::{MovieRow, Rating},
};

/// Reads `movie_id,title,genres` and `user_id,movie_id,rating` CSV files
pub struct CsvDataSource {
    movies_path: PathBuf,
    ratings_path: PathBuf,
    write_lock: Mutex<()>,
}

impl CsvDataSource {
    pub fn new(movies_path: impl Into<PathBuf>, ratings_path: impl Into<PathBuf>) -> Self {
        Self {
            movies_path: movies_path.into(),
            ratings_path: ratings_path.into(),
            write_lock: Mutex::new(()),
        }
    }
}

#[async_trait::async_trait]
impl DataSource for CsvDataSource {
    async fn load_catalog(&self) -> AppResult<Vec<MovieRow>> {
        let path = self.movies_path.clone();
        let movies = run_blocking(move || read_rows::<MovieRow>(&path)).await?;
        tracing::debug!(path = %self.movies_path.display(), count = movies.len(), "Loaded movies");
        Ok(movies)
    }

    async fn load_ratings(&self) -> AppResult<Vec<Rating>> {
        let path = self.ratings_path.clone();
        let ratings = run_blocking(move || read_ratings(&path)).await?;
        tracing::debug!(path = %self.ratings_path.display(), count = ratings.len(), "Loaded ratings");
        Ok(ratings)
    }

    async fn upsert_rating(&self, rating: Rating) -> AppResult<()> {
        let _guard = self.write_lock.lock().await;
        let path = self.ratings_path.clone();

        let updated = run_blocking(move || {
            let mut rows = read_ratings(&path)?;
            let updated = match rows.iter_mut().find(|r| r.same_pair(&rating)) {
                Some(existing) => {
                    existing.rating = rating.rating;
                    true
                }
                None => {
                    rows.push(rating);
                    false
                }
            };
            write_rows(&path, &rows)?;
            Ok(updated)
        })
        .await?;

        tracing::info!(
            user_id = rating.user_id,
            movie_id = rating.movie_id,
            rating = rating.rating,
            updated,
            "Rating saved"
        );

        Ok(())
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

async fn run_blocking<T, F>(task: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce() -> AppResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> AppResult<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    reader
        .deserialize()
        .map(|row| row.map_err(AppError::from))
        .collect()
}

/// A missing ratings file is an empty rating table.
///
/// A row rated outside 1..=5 fails the whole load.
fn read_ratings(path: &Path) -> AppResult<Vec<Rating>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    read_rows(path)
}

/// Writes to a sibling file first so readers never see a half-written table
fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> AppResult<()> {
    let tmp = path.with_extension("csv.tmp");
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp, path)?;
    Ok(())
}
