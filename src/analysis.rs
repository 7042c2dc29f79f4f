//! Text analysis: turning raw file content into index terms.
//!
//! A term is a maximal run of alphabetic characters, lower-cased. Everything
//! that is not alphabetic is a delimiter and never appears in a term.

use std::sync::Arc;

use regex::Regex;

use crate::error::{Result, WordserveError};

/// Tokenizer that extracts lower-cased alphabetic runs.
///
/// Cheap to clone; the compiled pattern is shared.
#[derive(Clone, Debug)]
pub struct AlphaTokenizer {
    pattern: Arc<Regex>,
}

impl AlphaTokenizer {
    /// Create a new tokenizer.
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(r"[a-z]+")
            .map_err(|e| WordserveError::analysis(format!("Invalid token pattern: {e}")))?;

        Ok(AlphaTokenizer {
            pattern: Arc::new(pattern),
        })
    }

    /// Tokenize the given text into lower-cased terms, in order of appearance.
    ///
    /// Empty tokens cannot occur: the pattern only matches non-empty runs.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let lowered = text.to_lowercase();
        self.pattern
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .collect()
    }
}

impl Default for AlphaTokenizer {
    fn default() -> Self {
        Self::new().expect("default token pattern should be valid")
    }
}
