use crate::error::{Error, Result};
use crate::key::{subset_count, subset_keys, WordSet};
use crate::tokenizer::Tokenizer;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Insertion-order position of a document
pub type DocId = usize;

/// Index build options
#[derive(Debug, Clone)]
pub struct IndexOptions {
    /// Index the empty word left behind by tokens made only of punctuation
    pub keep_empty_tokens: bool,
    /// Distinct-word count above which a document is logged as expensive
    pub word_warn_threshold: usize,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            keep_empty_tokens: false,
            word_warn_threshold: 16,
        }
    }
}

/// Inverted index: word subset -> set of document IDs.
///
/// Every non-empty subset of a document's words is stored as its own key,
/// so an AND query is a single exact lookup. The price is memory: a document
/// with k distinct words produces 2^k - 1 keys, which only works for short
/// texts such as tweets or log lines.
#[derive(Debug, Clone)]
pub struct InvertedSubsetIndex {
    documents: Vec<String>,
    postings: HashMap<WordSet, HashSet<DocId>>,
    tokenizer: Tokenizer,
    options: IndexOptions,
}

impl InvertedSubsetIndex {
    pub fn new() -> Self {
        Self::with_options(IndexOptions::default())
    }

    pub fn with_options(options: IndexOptions) -> Self {
        Self {
            documents: Vec::new(),
            postings: HashMap::new(),
            tokenizer: Tokenizer::new().keep_empty_tokens(options.keep_empty_tokens),
            options,
        }
    }

    /// Store a document and index it under every subset of its words
    pub fn add(&mut self, text: impl Into<String>) -> DocId {
        let text = text.into();
        let id = self.documents.len();

        let words: Vec<String> = self.tokenizer.unique_words(&text).into_iter().collect();
        if words.len() > self.options.word_warn_threshold {
            tracing::warn!(
                doc_id = id,
                words = words.len(),
                keys = ?subset_count(words.len()),
                "document exceeds word threshold, subset indexing is exponential"
            );
        }

        let mut keys = 0usize;
        for key in subset_keys(&words) {
            self.postings.entry(key).or_default().insert(id);
            keys += 1;
        }
        tracing::debug!(doc_id = id, words = words.len(), keys, "indexed document");

        self.documents.push(text);
        id
    }

    /// Documents that produced exactly this word set, empty if none did
    pub fn find<I, S>(&self, words: I) -> HashSet<DocId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let key: WordSet = words.into_iter().collect();
        self.find_key(&key).cloned().unwrap_or_default()
    }

    /// Borrow the posting list of a key
    pub fn find_key(&self, key: &WordSet) -> Option<&HashSet<DocId>> {
        self.postings.get(key)
    }

    /// Raw text of a document, as it was passed to `add`
    pub fn entry(&self, id: DocId) -> Result<&str> {
        self.documents
            .get(id)
            .map(String::as_str)
            .ok_or(Error::OutOfRange {
                id,
                len: self.documents.len(),
            })
    }

    /// Get total number of indexed documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Number of distinct word-set keys
    pub fn key_count(&self) -> usize {
        self.postings.len()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        let total_postings: usize = self.postings.values().map(HashSet::len).sum();
        IndexStats {
            total_documents: self.documents.len(),
            total_keys: self.postings.len(),
            total_postings,
            avg_docs_per_key: if self.postings.is_empty() {
                0.0
            } else {
                total_postings as f64 / self.postings.len() as f64
            },
        }
    }
}

impl Default for InvertedSubsetIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexStats {
    pub total_documents: usize,
    pub total_keys: usize,
    pub total_postings: usize,
    pub avg_docs_per_key: f64,
}
