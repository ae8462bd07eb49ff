// Re-export main components
pub mod engine;
pub mod error;
pub mod index;
pub mod key;
pub mod query;
pub mod tokenizer;

// Re-export commonly used types
pub use engine::{Hit, SearchEngine, SearchOptions, SearchResult};
pub use error::{Error, Result};
pub use index::{DocId, IndexOptions, IndexStats, InvertedSubsetIndex};
pub use key::WordSet;
pub use query::Query;
pub use tokenizer::Tokenizer;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_workflow() -> Result<()> {
        let mut index = InvertedSubsetIndex::new();
        index.add("This is a tweet about rust");
        index.add("This is a tweet about python");

        let query = Query::parse(["tweet", "-python"])?;
        let ids: Vec<DocId> = query.resolve(&index).into_iter().collect();

        assert_eq!(ids, vec![0]);
        assert_eq!(index.entry(ids[0])?, "This is a tweet about rust");

        Ok(())
    }
}
