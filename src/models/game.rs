use serde::{Deserialize, Serialize};

/// A recommended game, enriched with external metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnrichedGame {
    pub name: String,
    pub image: String,
    pub rating: f64,
    pub genres: Vec<String>,
}

// ============================================================================
// RAWG API Types
// ============================================================================

/// Response from RAWG `GET /games`
#[derive(Debug, Clone, Deserialize)]
pub struct RawgSearchResponse {
    #[serde(default)]
    pub results: Vec<RawgGame>,
}

/// A single RAWG search hit
#[derive(Debug, Clone, Deserialize)]
pub struct RawgGame {
    pub name: String,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub genres: Option<Vec<RawgGenre>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawgGenre {
    pub name: String,
}

impl From<RawgGame> for EnrichedGame {
    fn from(game: RawgGame) -> Self {
        EnrichedGame {
            name: game.name,
            image: game.background_image.unwrap_or_default(),
            rating: game.rating.unwrap_or(0.0),
            genres: game
                .genres
                .unwrap_or_default()
                .into_iter()
                .map(|genre| genre.name)
                .collect(),
        }
    }
}
