use std::sync::Arc;

use chrono::{DateTime, Utc};

use super::{Catalog, GenreSimilarityModel, RatingStore, UserRatingMatrix};
use crate::{
    error::AppResult,
    models::{MovieRow, Rating},
};

/// Everything a query needs, built together from one catalog and rating load
#[derive(Debug, Clone)]
pub struct Snapshot {
    catalog: Arc<Catalog>,
    genre_model: Arc<GenreSimilarityModel>,
    ratings: RatingStore,
    user_matrix: UserRatingMatrix,
    built_at: DateTime<Utc>,
}

impl Snapshot {
    /// Builds every model from scratch
    pub fn build(movies: Vec<MovieRow>, ratings: Vec<Rating>) -> AppResult<Self> {
        Self::rebuild(None, movies, ratings)
    }

    /// Builds a snapshot, reusing `previous`'s catalog and genre model when
    /// the catalog rows are unchanged.
    pub fn rebuild(
        previous: Option<&Snapshot>,
        movies: Vec<MovieRow>,
        ratings: Vec<Rating>,
    ) -> AppResult<Self> {
        let catalog = Catalog::load(movies)?;

        let (catalog, genre_model) = match previous {
            Some(prev) if *prev.catalog == catalog => {
                tracing::debug!("Catalog unchanged, reusing genre similarity model");
                (prev.catalog.clone(), prev.genre_model.clone())
            }
            _ => {
                let genre_model = GenreSimilarityModel::build(&catalog);
                (Arc::new(catalog), Arc::new(genre_model))
            }
        };

        let ratings = RatingStore::from_rows(ratings);
        let user_matrix = UserRatingMatrix::from_ratings(ratings.all());

        tracing::info!(
            movies = catalog.len(),
            users = user_matrix.users().len(),
            rated_movies = user_matrix.movies().len(),
            ratings = ratings.len(),
            "Built recommendation snapshot"
        );

        Ok(Self {
            catalog,
            genre_model,
            ratings,
            user_matrix,
            built_at: Utc::now(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn genre_model(&self) -> &GenreSimilarityModel {
        &self.genre_model
    }

    pub fn ratings(&self) -> &RatingStore {
        &self.ratings
    }

    pub fn user_matrix(&self) -> &UserRatingMatrix {
        &self.user_matrix
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    /// Whether the catalog-derived models are shared with `other`
    pub fn shares_catalog_with(&self, other: &Snapshot) -> bool {
        Arc::ptr_eq(&self.genre_model, &other.genre_model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn movies() -> Vec<MovieRow> {
        vec![
            MovieRow::new(1, "Alpha", "Action|Drama"),
            MovieRow::new(2, "Beta", "Action"),
            MovieRow::new(3, "Gamma", "Comedy"),
        ]
    }

    fn ratings() -> Vec<Rating> {
        vec![
            Rating::new(1, 1, 5).unwrap(),
            Rating::new(1, 2, 4).unwrap(),
            Rating::new(2, 1, 5).unwrap(),
        ]
    }

    #[test]
    fn test_build_snapshot() {
        let snapshot = Snapshot::build(movies(), ratings()).unwrap();
        assert_eq!(snapshot.catalog().len(), 3);
        assert_eq!(snapshot.genre_model().len(), 3);
        assert_eq!(snapshot.user_matrix().users(), &[1, 2]);
        assert_eq!(snapshot.ratings().len(), 3);
    }

    #[test]
    fn test_rebuild_reuses_unchanged_catalog() {
        let first = Snapshot::build(movies(), ratings()).unwrap();
        let second = Snapshot::rebuild(Some(&first), movies(), vec![]).unwrap();
        assert!(second.shares_catalog_with(&first));
        assert!(second.user_matrix().users().is_empty());
    }

    #[test]
    fn test_rebuild_with_changed_catalog() {
        let first = Snapshot::build(movies(), ratings()).unwrap();
        let mut changed = movies();
        changed.push(MovieRow::new(4, "Delta", "Drama"));
        let second = Snapshot::rebuild(Some(&first), changed, ratings()).unwrap();
        assert!(!second.shares_catalog_with(&first));
        assert_eq!(second.genre_model().len(), 4);
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let first = Snapshot::build(movies(), ratings()).unwrap();
        let second = Snapshot::build(movies(), ratings()).unwrap();
        assert_eq!(first.user_matrix(), second.user_matrix());
        for a in 1..=3 {
            for b in 1..=3 {
                assert_eq!(
                    first.genre_model().similarity(a, b).unwrap(),
                    second.genre_model().similarity(a, b).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_invalid_catalog_fails_build() {
        let mut rows = movies();
        rows.push(MovieRow::new(1, "Alpha again", "Drama"));
        assert!(matches!(
            Snapshot::build(rows, ratings()),
            Err(AppError::InvalidCatalog(_))
        ));
    }
}
