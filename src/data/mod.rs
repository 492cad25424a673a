//! Sources of the catalog and rating tables.
//!
//! The engine only needs full-table reads plus a rating upsert. How rows
//! are stored is up to the implementation.
use crate::{
    error::AppResult,
    models::{MovieRow, Rating},
};

pub mod csv;
pub mod memory;

pub use self::csv::CsvDataSource;
pub use self::memory::InMemoryDataSource;

/// Trait for catalog and rating storage
///
/// Loads return the complete table every time; there is no incremental diff.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait DataSource: Send + Sync {
    /// Every movie, in storage order
    async fn load_catalog(&self) -> AppResult<Vec<MovieRow>>;

    /// Every rating, in storage order
    async fn load_ratings(&self) -> AppResult<Vec<Rating>>;

    /// Stores a rating, replacing any existing rating for the same (user, movie) pair
    async fn upsert_rating(&self, rating: Rating) -> AppResult<()>;

    /// Source name for logging
    fn name(&self) -> &'static str;
}
