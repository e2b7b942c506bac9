use serde::{Deserialize, Serialize};

/// A single row of the game catalog
///
/// Identity is the record's position in the catalog, which never changes
/// once the catalog is loaded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogRecord {
    pub name: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
}

impl CatalogRecord {
    pub fn new(
        name: impl Into<String>,
        genre: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            genre: genre.into(),
            description: description.into(),
        }
    }
}

/// A catalog entry selected for enrichment during one request
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Candidate {
    /// Position of the entry in the catalog
    pub index: usize,
    pub name: String,
    pub genre: String,
    /// Cosine similarity between the user profile and the entry description
    pub score: f64,
}

impl Candidate {
    pub fn from_record(index: usize, record: &CatalogRecord, score: f64) -> Self {
        Self {
            index,
            name: record.name.clone(),
            genre: record.genre.clone(),
            score,
        }
    }
}
