use crate::error::Result;
use crate::index::{DocId, IndexOptions, IndexStats, InvertedSubsetIndex};
use crate::query::Query;
use serde::Serialize;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Search options
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    pub limit: Option<usize>,
    pub offset: usize,
}

/// One matching document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hit {
    pub id: DocId,
    pub text: String,
}

/// Search result
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// Matches in ascending id order, after pagination
    pub hits: Vec<Hit>,
    /// Match count before pagination
    pub total: usize,
}

/// Shareable search engine.
///
/// Writers take the lock for a whole document, so a reader never observes a
/// document whose subsets are only partly indexed.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    index: Arc<RwLock<InvertedSubsetIndex>>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::with_options(IndexOptions::default())
    }

    pub fn with_options(options: IndexOptions) -> Self {
        Self {
            index: Arc::new(RwLock::new(InvertedSubsetIndex::with_options(options))),
        }
    }

    // A panic mid-add leaves at worst a document missing from some keys;
    // the index stays usable, so poisoning is not propagated.
    fn read(&self) -> RwLockReadGuard<'_, InvertedSubsetIndex> {
        self.index.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, InvertedSubsetIndex> {
        self.index.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert a document
    pub fn add_document(&self, text: impl Into<String>) -> DocId {
        self.write().add(text)
    }

    /// Batch insert documents under a single write lock
    pub fn add_documents<I, S>(&self, docs: I) -> Vec<DocId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = self.write();
        let ids: Vec<DocId> = docs.into_iter().map(|doc| index.add(doc)).collect();
        tracing::info!(documents = ids.len(), total = index.len(), "batch indexed");
        ids
    }

    /// Get a document by ID
    pub fn get_document(&self, id: DocId) -> Result<String> {
        self.read().entry(id).map(str::to_string)
    }

    /// Search for documents
    pub fn search(&self, query: &Query, options: &SearchOptions) -> Result<SearchResult> {
        let index = self.read();

        let mut ids: Vec<DocId> = query.resolve(&index).into_iter().collect();
        ids.sort_unstable();
        let total = ids.len();

        let start = options.offset.min(total);
        let end = match options.limit {
            Some(limit) => start.saturating_add(limit).min(total),
            None => total,
        };

        let hits = ids[start..end]
            .iter()
            .map(|&id| {
                index.entry(id).map(|text| Hit {
                    id,
                    text: text.to_string(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(SearchResult { hits, total })
    }

    /// Get total document count
    pub fn document_count(&self) -> usize {
        self.read().len()
    }

    /// Get index statistics
    pub fn stats(&self) -> IndexStats {
        self.read().stats()
    }
}
