use std::sync::Arc;

use crate::{
    error::AppResult,
    models::{Candidate, EnrichedGame, UserProfile},
    services::{
        catalog::Catalog,
        fanout::FanOutCoordinator,
        ranker,
        text_index::{CatalogVectors, TextIndex},
    },
};

/// Number of catalog entries selected per recommendation
pub const DEFAULT_RECOMMENDATION_COUNT: usize = 10;

/// Generates game recommendations from a user's recorded interests
///
/// Ranks the catalog against the profile with TF-IDF cosine similarity, then
/// enriches the best matches with external metadata. The catalog, the fitted
/// index and the catalog vectors are built once and only read afterwards.
#[derive(Clone)]
pub struct Recommender {
    catalog: Arc<Catalog>,
    index: Arc<TextIndex>,
    vectors: Arc<CatalogVectors>,
    coordinator: FanOutCoordinator,
    count: usize,
}

impl Recommender {
    /// Fits the text index over the catalog descriptions
    pub fn new(catalog: Catalog, coordinator: FanOutCoordinator) -> AppResult<Self> {
        let (index, vectors) = TextIndex::fit_transform(catalog.descriptions())?;

        Ok(Self {
            catalog: Arc::new(catalog),
            index: Arc::new(index),
            vectors: Arc::new(vectors),
            coordinator,
            count: DEFAULT_RECOMMENDATION_COUNT,
        })
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Selects the catalog entries closest to the profile, best first
    ///
    /// An empty profile has no query vector and yields no candidates.
    pub fn candidates(&self, profile: &UserProfile) -> Vec<Candidate> {
        if profile.is_empty() {
            return Vec::new();
        }

        let query = self.index.transform(&profile.query_text());
        ranker::top_k(&query, &self.catalog, &self.vectors, self.count)
    }

    /// Recommends enriched games for a profile
    pub async fn recommend(&self, profile: &UserProfile) -> AppResult<Vec<EnrichedGame>> {
        if profile.is_empty() {
            tracing::debug!("Empty profile, skipping recommendation");
            return Ok(Vec::new());
        }

        let candidates = self.candidates(profile);

        tracing::info!(
            terms = profile.len(),
            candidates = candidates.len(),
            top = candidates.first().map(|c| c.name.as_str()).unwrap_or_default(),
            "Ranked catalog against profile"
        );

        let games = self.coordinator.enrich_all(&candidates).await;

        tracing::info!(
            candidates = candidates.len(),
            enriched = games.len(),
            "Recommendations ready"
        );

        Ok(games)
    }
}
