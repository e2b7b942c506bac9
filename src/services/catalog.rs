use std::io::Read;
use std::path::Path;

use crate::{
    error::{AppError, AppResult},
    models::CatalogRecord,
};

const REQUIRED_COLUMNS: [&str; 3] = ["name", "genre", "description"];

/// Immutable, in-memory table of games
///
/// Loaded once at startup and shared read-only by every request.
#[derive(Debug, Clone)]
pub struct Catalog {
    records: Vec<CatalogRecord>,
}

impl Catalog {
    /// Builds a catalog from records already in memory
    pub fn from_records(records: Vec<CatalogRecord>) -> AppResult<Self> {
        if records.is_empty() {
            return Err(AppError::Catalog("Catalog contains no games".to_string()));
        }
        Ok(Self { records })
    }

    /// Loads the catalog from a CSV file
    pub fn from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::Headers)
            .from_path(path)
            .map_err(|e| {
                AppError::Catalog(format!("Failed to open {}: {}", path.display(), e))
            })?;
        let catalog = Self::from_csv(reader)?;

        tracing::info!(
            path = %path.display(),
            games = catalog.len(),
            "Loaded game catalog"
        );

        Ok(catalog)
    }

    /// Loads the catalog from any CSV source with a header row
    pub fn from_reader<R: Read>(reader: R) -> AppResult<Self> {
        Self::from_csv(
            csv::ReaderBuilder::new()
                .trim(csv::Trim::Headers)
                .from_reader(reader),
        )
    }

    fn from_csv<R: Read>(mut reader: csv::Reader<R>) -> AppResult<Self> {
        let headers = reader
            .headers()
            .map_err(|e| AppError::Catalog(format!("Failed to read CSV header: {}", e)))?;

        for column in REQUIRED_COLUMNS {
            if !headers.iter().any(|header| header == column) {
                return Err(AppError::Catalog(format!(
                    "Catalog is missing required column '{}'",
                    column
                )));
            }
        }

        let records = reader
            .deserialize::<CatalogRecord>()
            .enumerate()
            .map(|(row, record)| {
                record.map_err(|e| {
                    AppError::Catalog(format!("Malformed catalog row {}: {}", row + 1, e))
                })
            })
            .collect::<AppResult<Vec<_>>>()?;

        Self::from_records(records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&CatalogRecord> {
        self.records.get(index)
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    /// Descriptions in catalog order, used to fit the text index
    pub fn descriptions(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|record| record.description.as_str())
    }
}
