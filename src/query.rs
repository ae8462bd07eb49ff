use crate::error::{Error, Result};
use crate::index::{DocId, InvertedSubsetIndex};
use crate::key::WordSet;
use std::collections::{BTreeSet, HashSet};

/// Prefix marking a term that must not appear
pub const NEGATION_MARKER: char = '-';

/// AND query with optional negated terms
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    positive: WordSet,
    negative: BTreeSet<String>,
}

impl Query {
    /// Build a query from raw terms. Terms starting with `-` are negative,
    /// with the marker removed once; duplicates collapse.
    pub fn parse<I, S>(terms: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut positive = WordSet::new();
        let mut negative = BTreeSet::new();
        let mut seen = false;

        for term in terms {
            seen = true;
            let term = term.as_ref();
            match term.strip_prefix(NEGATION_MARKER) {
                Some(word) => {
                    negative.insert(word.to_string());
                }
                None => {
                    positive.insert(term);
                }
            }
        }

        if !seen {
            return Err(Error::NoTerms);
        }
        if positive.is_empty() {
            return Err(Error::NoPositiveTerms);
        }

        Ok(Self { positive, negative })
    }

    pub fn positive(&self) -> &WordSet {
        &self.positive
    }

    pub fn negative(&self) -> &BTreeSet<String> {
        &self.negative
    }

    /// Ids of documents holding every positive word and none of the negative ones.
    ///
    /// Positive words are one exact key lookup; each negative word is looked up
    /// on its own and subtracted.
    pub fn resolve(&self, index: &InvertedSubsetIndex) -> HashSet<DocId> {
        let mut result = match index.find_key(&self.positive) {
            Some(ids) => ids.clone(),
            None => return HashSet::new(),
        };

        for word in &self.negative {
            if let Some(excluded) = index.find_key(&WordSet::from([word.as_str()])) {
                result.retain(|id| !excluded.contains(id));
            }
        }

        tracing::debug!(
            positive = self.positive.len(),
            negative = self.negative.len(),
            matched = result.len(),
            "resolved query"
        );
        result
    }
}
