use thiserror::Error;

/// Why a single-result lookup could not produce a match.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrefixError {
    /// The prefix matches no stored key.
    #[error("prefix not found")]
    NotFound,

    /// The prefix matches two or more stored keys.
    #[error("prefix ambiguous")]
    Ambiguous,
}

/// Errors raised while bulk-loading an index from a word list.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Reading the source failed.
    #[error("failed to read word list: {0}")]
    Io(#[from] std::io::Error),
}
