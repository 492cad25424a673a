use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::Mutex;

use super::{scoring, Snapshot};
use crate::{
    data::DataSource,
    error::{AppError, AppResult},
    models::{
        Movie, MovieId, Rating, Recommendation, SimilarMovie, UserId, UserRatingEntry,
    },
};

/// Answers recommendation queries against the latest published [`Snapshot`].
///
/// Reloads build a complete new snapshot before swapping it in, so a query
/// sees either the old models or the new ones, never a mix. A failed build
/// leaves the published snapshot in place.
pub struct RecommenderEngine {
    source: Arc<dyn DataSource>,
    current: RwLock<Arc<Snapshot>>,
    reload_lock: Mutex<()>,
}

impl RecommenderEngine {
    /// Loads both tables from `source` and builds the first snapshot
    pub async fn load(source: Arc<dyn DataSource>) -> AppResult<Self> {
        let movies = source.load_catalog().await?;
        let ratings = source.load_ratings().await?;
        let snapshot = Snapshot::build(movies, ratings)?;

        tracing::info!(source = source.name(), "Recommendation engine ready");

        Ok(Self {
            source,
            current: RwLock::new(Arc::new(snapshot)),
            reload_lock: Mutex::new(()),
        })
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-reads both tables and publishes freshly built models.
    ///
    /// Must be called after any change to the underlying ratings.
    pub async fn reload(&self) -> AppResult<Arc<Snapshot>> {
        let _guard = self.reload_lock.lock().await;

        let movies = self.source.load_catalog().await?;
        let ratings = self.source.load_ratings().await?;
        let previous = self.snapshot();

        let next = match Snapshot::rebuild(Some(&previous), movies, ratings) {
            Ok(snapshot) => Arc::new(snapshot),
            Err(e) => {
                tracing::warn!(error = %e, "Rebuild rejected, keeping current snapshot");
                return Err(e);
            }
        };

        *self.current.write().unwrap_or_else(PoisonError::into_inner) = next.clone();
        Ok(next)
    }

    /// Validates and stores a rating, then reloads.
    ///
    /// Out-of-range values and unknown movies are rejected before the data
    /// source is touched.
    pub async fn submit_rating(
        &self,
        user_id: UserId,
        movie_id: MovieId,
        rating: i64,
    ) -> AppResult<()> {
        let rating = Rating::new(user_id, movie_id, rating)?;
        if !self.snapshot().catalog().contains(movie_id) {
            return Err(AppError::UnknownMovie(movie_id));
        }

        self.source.upsert_rating(rating).await?;
        self.reload().await?;
        Ok(())
    }

    pub fn get_movie_info(&self, movie_id: MovieId) -> AppResult<Movie> {
        self.snapshot()
            .catalog()
            .find(movie_id)
            .cloned()
            .ok_or(AppError::UnknownMovie(movie_id))
    }

    /// The user's ratings in load order, joined with the catalog
    pub fn get_user_ratings(&self, user_id: UserId) -> AppResult<Vec<UserRatingEntry>> {
        let snapshot = self.snapshot();
        if !snapshot.user_matrix().contains_user(user_id) {
            return Err(AppError::UnknownUser(user_id));
        }

        Ok(snapshot
            .ratings()
            .for_user(user_id)
            .filter_map(|r| {
                snapshot.catalog().find(r.movie_id).map(|movie| UserRatingEntry {
                    movie_id: movie.movie_id,
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    rating: r.rating,
                })
            })
            .collect())
    }

    pub fn list_movies(&self) -> Vec<Movie> {
        self.snapshot().catalog().movies().to_vec()
    }

    /// Users with at least one rating, ascending
    pub fn list_users(&self) -> Vec<UserId> {
        self.snapshot().user_matrix().users().to_vec()
    }

    pub fn collaborative_filtering(
        &self,
        user_id: UserId,
        n: usize,
    ) -> AppResult<Vec<Recommendation>> {
        scoring::collaborative_filtering(&self.snapshot(), user_id, n)
    }

    pub fn content_based_filtering(
        &self,
        movie_id: MovieId,
        n: usize,
    ) -> AppResult<Vec<SimilarMovie>> {
        scoring::content_based_filtering(&self.snapshot(), movie_id, n)
    }

    pub fn hybrid_recommendation(
        &self,
        user_id: UserId,
        n: usize,
    ) -> AppResult<Vec<Recommendation>> {
        scoring::hybrid_recommendation(&self.snapshot(), user_id, n)
    }
}
