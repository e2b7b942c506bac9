/// RAWG video game database provider
///
/// Searches `GET {api_url}/games?key=..&search=..&page_size=1` and maps the
/// first hit into an [`EnrichedGame`].
use crate::{
    error::{AppError, AppResult},
    models::{EnrichedGame, RawgSearchResponse},
    services::providers::GameMetadataProvider,
};
use reqwest::Client as HttpClient;
use std::time::Duration;
use tracing::instrument;

const PAGE_SIZE: &str = "1";

#[derive(Clone)]
pub struct RawgProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl RawgProvider {
    /// Creates a provider whose HTTP client gives up after `timeout`
    pub fn new(api_key: String, api_url: String, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait::async_trait]
impl GameMetadataProvider for RawgProvider {
    #[instrument(skip(self), fields(provider = "rawg"))]
    async fn lookup(&self, name: &str) -> AppResult<Option<EnrichedGame>> {
        let url = format!("{}/games", self.api_url);

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("key", self.api_key.as_str()),
                ("search", name),
                ("page_size", PAGE_SIZE),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "RAWG API returned status {}: {}",
                status, body
            )));
        }

        let response_text = response.text().await?;
        let search: RawgSearchResponse = serde_json::from_str(&response_text).map_err(|e| {
            tracing::debug!(response = %response_text, "Unparseable RAWG response");
            AppError::ExternalApi(format!("Failed to parse RAWG response: {}", e))
        })?;

        let game = search.results.into_iter().next().map(EnrichedGame::from);

        tracing::debug!(
            query = %name,
            found = game.is_some(),
            provider = "rawg",
            "Game lookup completed"
        );

        Ok(game)
    }

    fn name(&self) -> &'static str {
        "rawg"
    }
}
