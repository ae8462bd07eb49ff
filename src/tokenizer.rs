use std::collections::BTreeSet;

/// Characters trimmed from token edges, applied one at a time in this order
const PUNCTUATION: [char; 6] = [' ', '\n', ',', '.', ':', ';'];

/// Splits raw text into words. Case and unicode are left untouched.
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    keep_empty: bool,
}

impl Tokenizer {
    pub fn new() -> Self {
        Self { keep_empty: false }
    }

    /// Keep tokens that punctuation stripping reduced to `""`
    pub fn keep_empty_tokens(mut self, keep: bool) -> Self {
        self.keep_empty = keep;
        self
    }

    /// Strip the punctuation set from both edges of a token.
    ///
    /// Each character is trimmed in its own pass, so `"a,."` loses the `.`
    /// but keeps the `,` that was hidden behind it.
    fn strip(&self, token: &str) -> String {
        PUNCTUATION
            .iter()
            .fold(token, |word, &c| word.trim_matches(c))
            .to_string()
    }

    /// Tokenize text into words, in document order, duplicates kept
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(' ')
            .map(|token| self.strip(token))
            .filter(|word| self.keep_empty || !word.is_empty())
            .collect()
    }

    /// Distinct words of a text (for indexing)
    pub fn unique_words(&self, text: &str) -> BTreeSet<String> {
        self.tokenize(text).into_iter().collect()
    }
}
