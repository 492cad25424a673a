//! Recommendation core: the in-memory models and the queries answered from them.
//!
//! Every structure here is rebuilt from complete catalog and rating tables.
//! Queries run against an immutable [`Snapshot`] that the
//! [`RecommenderEngine`] swaps atomically on reload.

pub mod catalog;
pub mod genre_similarity;
pub mod rating_store;
pub mod recommender;
pub mod scoring;
pub mod snapshot;
pub mod user_matrix;

pub use catalog::Catalog;
pub use genre_similarity::GenreSimilarityModel;
pub use rating_store::RatingStore;
pub use recommender::RecommenderEngine;
pub use snapshot::Snapshot;
pub use user_matrix::UserRatingMatrix;

/// Cosine similarity of two equally sized vectors.
///
/// Zero when either vector has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|y| y * y).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_identical_vectors() {
        let v = [5.0, 4.0, 0.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_cosine_orthogonal_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn test_cosine_zero_vector() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 2.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }
}
