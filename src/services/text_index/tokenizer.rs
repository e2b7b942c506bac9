use regex::Regex;
use std::collections::HashSet;

use crate::error::{AppError, AppResult};

use super::stop_words;

/// Words of two or more word characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

/// Splits text into lower-case terms, dropping stop-words
#[derive(Debug, Clone)]
pub struct Tokenizer {
    pattern: Regex,
    stop_words: HashSet<&'static str>,
}

impl Tokenizer {
    pub fn english() -> AppResult<Self> {
        let pattern = Regex::new(TOKEN_PATTERN)
            .map_err(|e| AppError::Index(format!("Invalid token pattern: {}", e)))?;

        Ok(Self {
            pattern,
            stop_words: stop_words::english(),
        })
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str())
            .filter(|token| !self.stop_words.contains(token))
            .map(str::to_string)
            .collect()
    }
}
