use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The interests recorded for a user, as free-text terms
///
/// Terms are kept in a sorted set so the query text built from a profile is
/// the same for every request with the same interests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    terms: BTreeSet<String>,
}

impl UserProfile {
    pub fn new<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            terms: terms
                .into_iter()
                .map(Into::into)
                .filter(|term: &String| !term.trim().is_empty())
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.terms.iter().map(String::as_str)
    }

    /// Joins every term into a single query document
    pub fn query_text(&self) -> String {
        self.terms().collect::<Vec<_>>().join(" ")
    }
}

/// User document as stored in the profile store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDocument {
    #[serde(default)]
    pub search_history: Vec<String>,
    #[serde(default)]
    pub click_history: Vec<String>,
}

impl From<UserDocument> for UserProfile {
    fn from(document: UserDocument) -> Self {
        UserProfile::new(
            document
                .search_history
                .into_iter()
                .chain(document.click_history),
        )
    }
}
