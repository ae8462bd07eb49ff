use thiserror::Error;

/// Errors raised by the index and the query layer
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// `entry` was asked for an id that `add` never handed out
    #[error("document id {id} out of range (index holds {len} documents)")]
    OutOfRange { id: usize, len: usize },

    #[error("no query terms given")]
    NoTerms,

    /// Every term was negated, nothing left to look up
    #[error("no positive query terms given")]
    NoPositiveTerms,
}

impl Error {
    /// Usage errors come from the caller's input, not from the index
    pub fn is_usage(&self) -> bool {
        matches!(self, Error::NoTerms | Error::NoPositiveTerms)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
