//! TF-IDF vector space over the catalog descriptions
//!
//! The index is fit once at startup. Its vocabulary and IDF weights are
//! frozen after that; later text is projected into the same space and terms
//! outside the vocabulary contribute nothing.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::error::{AppError, AppResult};

mod stop_words;
mod tokenizer;

pub use tokenizer::Tokenizer;

/// Sparse vector over the frozen vocabulary, entries sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_unsorted(mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(term, _)| *term);
        Self { entries }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.iter().all(|(_, weight)| *weight == 0.0)
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, term: usize) -> f64 {
        self.entries
            .binary_search_by_key(&term, |(t, _)| *t)
            .map(|pos| self.entries[pos].1)
            .unwrap_or(0.0)
    }

    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|(_, weight)| weight * weight)
            .sum::<f64>()
            .sqrt()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let mut sum = 0.0;
        while i < self.entries.len() && j < other.entries.len() {
            let (a_term, a_weight) = self.entries[i];
            let (b_term, b_weight) = other.entries[j];
            match a_term.cmp(&b_term) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += a_weight * b_weight;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    /// Cosine of the angle between two vectors; zero when either has no weight
    pub fn cosine_similarity(&self, other: &SparseVector) -> f64 {
        let denominator = self.norm() * other.norm();
        if denominator == 0.0 {
            return 0.0;
        }
        self.dot(other) / denominator
    }

    fn normalize(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, weight) in &mut self.entries {
                *weight /= norm;
            }
        }
        self
    }
}

/// One vector per catalog record, in catalog order
#[derive(Debug, Clone, Default)]
pub struct CatalogVectors {
    vectors: Vec<SparseVector>,
}

impl CatalogVectors {
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SparseVector> {
        self.vectors.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &SparseVector> {
        self.vectors.iter()
    }
}

impl FromIterator<SparseVector> for CatalogVectors {
    fn from_iter<I: IntoIterator<Item = SparseVector>>(iter: I) -> Self {
        Self {
            vectors: iter.into_iter().collect(),
        }
    }
}

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone)]
pub struct TextIndex {
    tokenizer: Tokenizer,
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TextIndex {
    /// Fits the vocabulary and IDF weights over a corpus
    pub fn fit<I, S>(corpus: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::fit_transform(corpus).map(|(index, _)| index)
    }

    /// Fits the index and returns the vectors of the fitted documents
    pub fn fit_transform<I, S>(corpus: I) -> AppResult<(Self, CatalogVectors)>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let tokenizer = Tokenizer::english()?;
        let documents: Vec<Vec<String>> = corpus
            .into_iter()
            .map(|document| tokenizer.tokenize(document.as_ref()))
            .collect();

        if documents.is_empty() {
            return Err(AppError::Index(
                "Cannot fit text index on an empty corpus".to_string(),
            ));
        }

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tokens in &documents {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(AppError::Index(
                "Empty vocabulary; corpus only contains stop-words".to_string(),
            ));
        }

        // Smoothed IDF, as if one extra document contained every term
        let n = documents.len() as f64;
        let mut vocabulary = HashMap::with_capacity(document_frequency.len());
        let mut idf = Vec::with_capacity(document_frequency.len());
        for (position, (term, df)) in document_frequency.into_iter().enumerate() {
            vocabulary.insert(term.to_string(), position);
            idf.push(((1.0 + n) / (1.0 + df as f64)).ln() + 1.0);
        }

        let index = Self {
            tokenizer,
            vocabulary,
            idf,
        };

        let vectors = documents
            .iter()
            .map(|tokens| index.weigh(tokens))
            .collect::<CatalogVectors>();

        tracing::info!(
            documents = vectors.len(),
            vocabulary = index.vocabulary_size(),
            "Fitted text index"
        );

        Ok((index, vectors))
    }

    /// Projects arbitrary text into the fitted vector space
    pub fn transform(&self, text: &str) -> SparseVector {
        self.weigh(&self.tokenizer.tokenize(text))
    }

    pub fn vocabulary_size(&self) -> usize {
        self.idf.len()
    }

    pub fn term_index(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for token in tokens {
            if let Some(&term) = self.vocabulary.get(token) {
                *counts.entry(term).or_insert(0.0) += 1.0;
            }
        }

        SparseVector::from_unsorted(
            counts
                .into_iter()
                .map(|(term, count)| (term, count * self.idf[term]))
                .collect(),
        )
        .normalize()
    }
}
