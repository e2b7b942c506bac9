use std::cmp::Ordering;

use crate::{
    models::Candidate,
    services::{
        catalog::Catalog,
        text_index::{CatalogVectors, SparseVector},
    },
};

/// Scores a query against every catalog vector and keeps the best `k`
///
/// Results are ordered by descending cosine similarity. Entries with equal
/// scores keep catalog order, so the lower index always comes first.
pub fn top_k(
    query: &SparseVector,
    catalog: &Catalog,
    vectors: &CatalogVectors,
    k: usize,
) -> Vec<Candidate> {
    let mut scored: Vec<(usize, f64)> = vectors
        .iter()
        .enumerate()
        .map(|(index, vector)| (index, query.cosine_similarity(vector)))
        .collect();

    scored.sort_by(|(a_index, a_score), (b_index, b_score)| {
        b_score
            .partial_cmp(a_score)
            .unwrap_or(Ordering::Equal)
            .then(a_index.cmp(b_index))
    });
    scored.truncate(k);

    scored
        .into_iter()
        .filter_map(|(index, score)| {
            catalog
                .get(index)
                .map(|record| Candidate::from_record(index, record, score))
        })
        .collect()
}
