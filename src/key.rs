use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Index key: an unordered, duplicate-free set of words.
///
/// Backed by a `BTreeSet` so equality and hashing depend only on the
/// words present, never on the order they were supplied in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WordSet(BTreeSet<String>);

impl WordSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.0.contains(word)
    }

    pub fn insert(&mut self, word: impl Into<String>) -> bool {
        self.0.insert(word.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for WordSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for WordSet {
    fn from(words: [&str; N]) -> Self {
        words.into_iter().collect()
    }
}

impl From<BTreeSet<String>> for WordSet {
    fn from(words: BTreeSet<String>) -> Self {
        Self(words)
    }
}

/// Number of non-empty subsets of `k` words, `None` if it does not fit in a u64
pub fn subset_count(k: usize) -> Option<u64> {
    if k >= 64 {
        return None;
    }
    Some((1u64 << k) - 1)
}

/// Every non-empty subset of `words` as a fresh `WordSet`, smallest first.
///
/// `words` is expected to hold distinct words; duplicates only produce
/// repeated keys. The output grows as 2^k - 1.
pub fn subset_keys(words: &[String]) -> SubsetKeys<'_> {
    SubsetKeys {
        words,
        size: 1,
        indices: vec![0],
        done: words.is_empty(),
    }
}

/// Iterator returned by [`subset_keys`]; walks combinations size by size
/// in lexicographic position order.
#[derive(Debug)]
pub struct SubsetKeys<'a> {
    words: &'a [String],
    size: usize,
    indices: Vec<usize>,
    done: bool,
}

impl SubsetKeys<'_> {
    fn advance(&mut self) {
        let n = self.words.len();
        let r = self.size;

        // Rightmost index that can still move forward
        let mut i = r;
        while i > 0 {
            i -= 1;
            if self.indices[i] != i + n - r {
                self.indices[i] += 1;
                for j in i + 1..r {
                    self.indices[j] = self.indices[j - 1] + 1;
                }
                return;
            }
        }

        if r == n {
            self.done = true;
        } else {
            self.size += 1;
            self.indices = (0..self.size).collect();
        }
    }
}

impl Iterator for SubsetKeys<'_> {
    type Item = WordSet;

    fn next(&mut self) -> Option<WordSet> {
        if self.done {
            return None;
        }
        let key = self
            .indices
            .iter()
            .map(|&i| self.words[i].clone())
            .collect();
        self.advance();
        Some(key)
    }
}
