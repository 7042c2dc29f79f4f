//! In-memory inverted word index.
//!
//! [`WordIndex`] maps each recorded word to the documents it occurs in and the
//! occurrence count per document. Every stored count is at least 1; a
//! (word, document) pair with no occurrences is simply absent.
//!
//! The index is built single-threaded during the startup crawl and is never
//! written to afterwards. The server shares it read-only behind an `Arc`,
//! which is why concurrent lookups need no locking — preserving that
//! "no writer after startup" invariant is a hard requirement for callers.

use std::collections::HashMap;

/// A single ranked search result: a document and the number of matched
/// occurrences in it.
///
/// Results are ordered by descending rank; documents with equal ranks are
/// ordered by ascending document name so that output is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    /// Document identifier (the file path recorded during the crawl).
    pub doc_name: String,

    /// Aggregate occurrence count used to order results.
    pub rank: usize,
}

impl SearchHit {
    /// Create a new search hit.
    pub fn new<S: Into<String>>(doc_name: S, rank: usize) -> Self {
        SearchHit {
            doc_name: doc_name.into(),
            rank,
        }
    }
}

/// Inverted index over words and the documents that contain them.
#[derive(Debug, Default)]
pub struct WordIndex {
    /// word -> (document -> occurrence count), every count >= 1.
    words: HashMap<String, HashMap<String, usize>>,
}

impl WordIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        WordIndex::default()
    }

    /// Number of distinct words ever recorded.
    pub fn num_words(&self) -> usize {
        self.words.len()
    }

    /// Whether the index holds no words at all.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Record one occurrence of `word` in `doc_name`, creating entries as
    /// needed.
    pub fn record(&mut self, word: &str, doc_name: &str) {
        let documents = self.words.entry(word.to_string()).or_default();
        *documents.entry(doc_name.to_string()).or_insert(0) += 1;
    }

    /// Look up a single word, returning every document containing it together
    /// with the occurrence count, highest rank first.
    ///
    /// Returns an empty vector for a word that was never recorded.
    pub fn lookup_word(&self, word: &str) -> Vec<SearchHit> {
        let mut hits: Vec<SearchHit> = match self.words.get(word) {
            Some(documents) => documents
                .iter()
                .map(|(doc_name, &count)| SearchHit::new(doc_name.as_str(), count))
                .collect(),
            None => Vec::new(),
        };

        sort_hits(&mut hits);
        hits
    }

    /// Look up a multi-term query with AND semantics.
    ///
    /// `terms` is an ordered sequence; duplicates are meaningful. Each term
    /// contributes its per-document occurrence count to that document's rank
    /// and bumps the document's matched-term tally by one. Only documents
    /// whose tally equals the number of terms processed are returned, so a
    /// document must contain every term — counting a repeated term as an
    /// independent requirement. An empty term list yields no results.
    pub fn lookup_query(&self, terms: &[String]) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        if terms.is_empty() {
            return hits;
        }

        let mut total_ranks: HashMap<&str, usize> = HashMap::new();
        let mut matched_terms: HashMap<&str, usize> = HashMap::new();

        for term in terms {
            if let Some(documents) = self.words.get(term.as_str()) {
                for (doc_name, &count) in documents {
                    *total_ranks.entry(doc_name.as_str()).or_insert(0) += count;
                    *matched_terms.entry(doc_name.as_str()).or_insert(0) += 1;
                }
            }
        }

        for (doc_name, rank) in total_ranks {
            if matched_terms[doc_name] == terms.len() {
                hits.push(SearchHit::new(doc_name, rank));
            }
        }

        sort_hits(&mut hits);
        hits
    }
}

/// Rank descending, then document name ascending.
fn sort_hits(hits: &mut [SearchHit]) {
    hits.sort_unstable_by(|a, b| {
        b.rank
            .cmp(&a.rank)
            .then_with(|| a.doc_name.cmp(&b.doc_name))
    });
}
