/// Movie metadata provider abstraction
///
/// The recommender only needs two things from a provider: the titles matching a
/// keyword, and the descriptive record for one title. Keeping that behind a trait
/// lets the corpus builder run against OMDb in production and an in-memory
/// catalog in tests.
use crate::{error::AppResult, models::MovieRecord};

pub mod omdb;

pub use omdb::OmdbProvider;

/// Trait for movie metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Search one page of titles matching a keyword or year
    ///
    /// Returns an empty list when the provider has no (more) matches.
    async fn search(&self, keyword: &str, page: u32) -> AppResult<Vec<String>>;

    /// Fetch the descriptive record for a title
    ///
    /// `Ok(None)` means the provider doesn't know the title. Errors are reserved for
    /// transport, decoding and credential failures.
    async fn get_details(&self, title: &str) -> AppResult<Option<MovieRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
