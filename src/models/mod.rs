pub mod movie;
pub mod rating;
pub mod recommendation;

pub use movie::{Genres, Movie, MovieId, MovieRow};
pub use rating::{Rating, UserId, MAX_RATING, MIN_RATING};
pub use recommendation::{Recommendation, SimilarMovie, UserRatingEntry};
