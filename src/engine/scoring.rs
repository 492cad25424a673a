//! The three recommendation queries, evaluated against one [`Snapshot`].

use super::Snapshot;
use crate::{
    error::{AppError, AppResult},
    models::{MovieId, Recommendation, SimilarMovie, UserId},
};

/// Number of most similar users consulted for collaborative scores
pub const NEIGHBOURHOOD_SIZE: usize = 3;

/// Score added per genre shared between a candidate and one favourite
pub const GENRE_BOOST_WEIGHT: f64 = 0.1;

/// Ratings at or above this mark a favourite movie
pub const FAVOURITE_RATING: u8 = 4;

/// Movies the user has not rated, scored by the ratings of their
/// `NEIGHBOURHOOD_SIZE` most similar users.
///
/// A candidate's score is the similarity-weighted mean of the neighbours'
/// ratings, counting only neighbours who rated it. Candidates no
/// neighbour rated are left out.
pub fn collaborative_filtering(
    snapshot: &Snapshot,
    user_id: UserId,
    n: usize,
) -> AppResult<Vec<Recommendation>> {
    ensure_count(n)?;

    let matrix = snapshot.user_matrix();
    if !matrix.contains_user(user_id) {
        return Err(AppError::UnknownUser(user_id));
    }

    let neighbours = matrix.neighbours(user_id, NEIGHBOURHOOD_SIZE)?;
    let catalog = snapshot.catalog();

    let mut scored: Vec<(MovieId, f64)> = Vec::new();
    for movie_id in matrix.unrated_movies(user_id)? {
        let mut weighted_sum = 0.0;
        let mut similarity_sum = 0.0;

        for &(neighbour, similarity) in &neighbours {
            let rating = matrix.rating(neighbour, movie_id);
            if rating > 0.0 {
                weighted_sum += rating * similarity;
                similarity_sum += similarity;
            }
        }

        if similarity_sum <= 0.0 {
            continue;
        }

        if !catalog.contains(movie_id) {
            tracing::debug!(movie_id, "Skipping rated movie missing from catalog");
            continue;
        }

        scored.push((movie_id, weighted_sum / similarity_sum));
    }

    if scored.is_empty() {
        return Err(AppError::NoRecommendations(user_id));
    }

    scored.sort_by(|a, b| b.1.total_cmp(&a.1));
    scored.truncate(n);

    tracing::debug!(
        user_id,
        neighbours = neighbours.len(),
        returned = scored.len(),
        "Collaborative recommendations scored"
    );

    format_recommendations(snapshot, scored)
}

/// The `n` movies whose genres are closest to `movie_id`'s
pub fn content_based_filtering(
    snapshot: &Snapshot,
    movie_id: MovieId,
    n: usize,
) -> AppResult<Vec<SimilarMovie>> {
    ensure_count(n)?;

    if !snapshot.catalog().contains(movie_id) {
        return Err(AppError::UnknownMovie(movie_id));
    }

    snapshot
        .genre_model()
        .most_similar(movie_id, n)?
        .into_iter()
        .map(|(id, _)| snapshot.catalog().get(id).map(SimilarMovie::from))
        .collect()
}

/// Collaborative candidates boosted by genre overlap with the user's favourites.
///
/// Draws `2n` collaborative candidates, adds `GENRE_BOOST_WEIGHT` for every
/// genre a candidate shares with each movie the user rated
/// `FAVOURITE_RATING` or higher, and keeps the best `n`.
pub fn hybrid_recommendation(
    snapshot: &Snapshot,
    user_id: UserId,
    n: usize,
) -> AppResult<Vec<Recommendation>> {
    ensure_count(n)?;

    let candidates = collaborative_filtering(snapshot, user_id, n.saturating_mul(2))?;

    let favourites: Vec<_> = snapshot
        .ratings()
        .for_user(user_id)
        .filter(|r| r.rating >= FAVOURITE_RATING)
        .filter_map(|r| snapshot.catalog().find(r.movie_id))
        .collect();

    let mut boosted: Vec<(MovieId, f64)> = candidates
        .iter()
        .map(|candidate| {
            let shared: usize = favourites
                .iter()
                .map(|favourite| candidate.genres.shared_with(&favourite.genres))
                .sum();
            (
                candidate.movie_id,
                candidate.score + shared as f64 * GENRE_BOOST_WEIGHT,
            )
        })
        .collect();

    boosted.sort_by(|a, b| b.1.total_cmp(&a.1));
    boosted.truncate(n);

    tracing::debug!(
        user_id,
        favourites = favourites.len(),
        returned = boosted.len(),
        "Hybrid recommendations scored"
    );

    format_recommendations(snapshot, boosted)
}

fn format_recommendations(
    snapshot: &Snapshot,
    scored: Vec<(MovieId, f64)>,
) -> AppResult<Vec<Recommendation>> {
    scored
        .into_iter()
        .map(|(movie_id, score)| {
            snapshot
                .catalog()
                .get(movie_id)
                .map(|movie| Recommendation::new(movie, score))
        })
        .collect()
}

fn ensure_count(n: usize) -> AppResult<()> {
    if n == 0 {
        return Err(AppError::InvalidInput(
            "Number of recommendations must be positive".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MovieRow, Rating};

    fn rating(user_id: UserId, movie_id: MovieId, value: i64) -> Rating {
        Rating::new(user_id, movie_id, value).unwrap()
    }

    fn small_snapshot() -> Snapshot {
        Snapshot::build(
            vec![
                MovieRow::new(1, "Alpha", "Action|Drama"),
                MovieRow::new(2, "Beta", "Action"),
                MovieRow::new(3, "Gamma", "Comedy"),
            ],
            vec![
                rating(1, 1, 5),
                rating(1, 2, 4),
                rating(2, 1, 5),
                rating(2, 2, 5),
                rating(2, 3, 1),
            ],
        )
        .unwrap()
    }

    fn library_snapshot() -> Snapshot {
        Snapshot::build(
            vec![
                MovieRow::new(1, "The Matrix", "Action|Sci-Fi"),
                MovieRow::new(2, "Inception", "Action|Sci-Fi|Thriller"),
                MovieRow::new(3, "The Notebook", "Drama|Romance"),
                MovieRow::new(4, "Titanic", "Drama|Romance"),
                MovieRow::new(5, "Interstellar", "Adventure|Drama|Sci-Fi"),
                MovieRow::new(6, "The Hangover", "Comedy"),
                MovieRow::new(7, "Superbad", "Comedy"),
                MovieRow::new(8, "Alien", "Horror|Sci-Fi"),
            ],
            vec![
                rating(1, 1, 5),
                rating(1, 2, 5),
                rating(1, 6, 2),
                rating(2, 1, 4),
                rating(2, 2, 5),
                rating(2, 5, 5),
                rating(2, 8, 4),
                rating(3, 3, 5),
                rating(3, 4, 5),
                rating(3, 7, 3),
                rating(4, 1, 5),
                rating(4, 5, 3),
                rating(4, 7, 4),
                rating(5, 6, 5),
                rating(5, 7, 5),
                rating(5, 3, 1),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_collaborative_small_scenario() {
        let snapshot = small_snapshot();
        let recs = collaborative_filtering(&snapshot, 1, 1).unwrap();
        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].movie_id, 3);
        assert_eq!(recs[0].title, "Gamma");
        assert_eq!(recs[0].score, 1.0);
    }

    #[test]
    fn test_collaborative_never_recommends_rated_movies() {
        let snapshot = library_snapshot();
        for user_id in snapshot.user_matrix().users().to_vec() {
            let rated = snapshot.user_matrix().ratings_for(user_id).unwrap();
            match collaborative_filtering(&snapshot, user_id, 10) {
                Ok(recs) => {
                    for rec in recs {
                        assert!(!rated.contains_key(&rec.movie_id));
                    }
                }
                Err(AppError::NoRecommendations(_)) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
    }

    #[test]
    fn test_collaborative_sorted_descending_and_truncated() {
        let snapshot = library_snapshot();
        let recs = collaborative_filtering(&snapshot, 1, 2).unwrap();
        assert!(recs.len() <= 2);
        assert!(recs.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn test_collaborative_scores_are_weighted_means() {
        let snapshot = library_snapshot();
        let recs = collaborative_filtering(&snapshot, 1, 10).unwrap();
        for rec in recs {
            assert!(rec.score >= 1.0 && rec.score <= 5.0);
        }
    }

    #[test]
    fn test_collaborative_unknown_user() {
        let snapshot = small_snapshot();
        assert!(matches!(
            collaborative_filtering(&snapshot, 42, 5),
            Err(AppError::UnknownUser(42))
        ));
    }

    #[test]
    fn test_collaborative_no_recommendations() {
        // User 2 has rated every rated movie, so no candidates remain
        let snapshot = small_snapshot();
        assert!(matches!(
            collaborative_filtering(&snapshot, 2, 5),
            Err(AppError::NoRecommendations(2))
        ));
    }

    #[test]
    fn test_collaborative_ignores_dissimilar_neighbours() {
        let snapshot = Snapshot::build(
            vec![
                MovieRow::new(1, "Alpha", "Action"),
                MovieRow::new(2, "Beta", "Drama"),
            ],
            vec![rating(1, 1, 5), rating(2, 2, 3)],
        )
        .unwrap();
        assert!(matches!(
            collaborative_filtering(&snapshot, 1, 5),
            Err(AppError::NoRecommendations(1))
        ));
    }

    #[test]
    fn test_zero_count_rejected() {
        let snapshot = small_snapshot();
        assert!(matches!(
            collaborative_filtering(&snapshot, 1, 0),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            content_based_filtering(&snapshot, 1, 0),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            hybrid_recommendation(&snapshot, 1, 0),
            Err(AppError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_content_based_excludes_query_movie() {
        let snapshot = library_snapshot();
        for movie in snapshot.catalog().movies() {
            let similar = content_based_filtering(&snapshot, movie.movie_id, 3).unwrap();
            assert_eq!(similar.len(), 3);
            assert!(similar.iter().all(|m| m.movie_id != movie.movie_id));
        }
    }

    #[test]
    fn test_content_based_orders_by_genre_overlap() {
        let snapshot = library_snapshot();
        let similar = content_based_filtering(&snapshot, 3, 2).unwrap();
        assert_eq!(similar[0].movie_id, 4);
        assert_eq!(similar[0].title, "Titanic");
    }

    #[test]
    fn test_content_based_small_catalog_returns_fewer() {
        let snapshot = small_snapshot();
        let similar = content_based_filtering(&snapshot, 1, 10).unwrap();
        let ids: Vec<MovieId> = similar.iter().map(|m| m.movie_id).collect();
        assert_eq!(ids, vec![2, 3]);
    }

    #[test]
    fn test_content_based_unknown_movie() {
        let snapshot = small_snapshot();
        assert!(matches!(
            content_based_filtering(&snapshot, 99, 3),
            Err(AppError::UnknownMovie(99))
        ));
    }

    #[test]
    fn test_hybrid_never_below_collaborative_score() {
        let snapshot = library_snapshot();
        for user_id in snapshot.user_matrix().users().to_vec() {
            let Ok(hybrid) = hybrid_recommendation(&snapshot, user_id, 3) else {
                continue;
            };
            let collaborative = collaborative_filtering(&snapshot, user_id, 6).unwrap();
            for rec in hybrid {
                let base = collaborative
                    .iter()
                    .find(|c| c.movie_id == rec.movie_id)
                    .expect("hybrid candidates come from the collaborative pool");
                assert!(rec.score >= base.score);
            }
        }
    }

    #[test]
    fn test_hybrid_boosts_shared_genres() {
        // User 1 loves action sci-fi; Interstellar and Alien share Sci-Fi with both favourites
        let snapshot = library_snapshot();
        let collaborative = collaborative_filtering(&snapshot, 1, 10).unwrap();
        let hybrid = hybrid_recommendation(&snapshot, 1, 5).unwrap();

        let base = collaborative.iter().find(|r| r.movie_id == 8).unwrap().score;
        let boosted = hybrid.iter().find(|r| r.movie_id == 8).unwrap().score;
        assert!((boosted - (base + 0.2)).abs() < 1e-9);
    }

    #[test]
    fn test_hybrid_propagates_collaborative_errors() {
        let snapshot = small_snapshot();
        assert!(matches!(
            hybrid_recommendation(&snapshot, 42, 3),
            Err(AppError::UnknownUser(42))
        ));
        assert!(matches!(
            hybrid_recommendation(&snapshot, 2, 3),
            Err(AppError::NoRecommendations(2))
        ));
    }
}
