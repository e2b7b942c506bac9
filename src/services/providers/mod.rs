/// Game metadata provider abstraction
///
/// Enrichment sources (RAWG today) sit behind this trait so the gateway,
/// the fan-out coordinator and their tests never depend on a concrete API.
use crate::{error::AppResult, models::EnrichedGame};

pub mod rawg;

pub use rawg::RawgProvider;

/// Trait for game metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait GameMetadataProvider: Send + Sync {
    /// Looks up a game by its exact name
    ///
    /// Returns `Ok(None)` when the source has no match. Transport and
    /// protocol failures are returned as errors; deciding what to do with
    /// them is the caller's job.
    async fn lookup(&self, name: &str) -> AppResult<Option<EnrichedGame>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
